use crate::piece::{Piece, PieceKind};
use crate::position::Square;
use crate::board::CastlingRights;

use thiserror::Error;

/// Marker for moves with side effects beyond "piece travels from A to B".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    CastleLeft,
    CastleRight,
    EnPassant,
    Promote(PieceKind),
}

/// A single move. `piece` and `captured` are optional on construction and are
/// filled in by the board when the move is applied.
///
/// For castling, `from`/`to` record the king's movement; the rook relocation
/// is implied by the `Special` tag.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Option<Piece>,
    pub captured: Option<Piece>,
    pub special: Option<Special>,
}

/// Equality compares endpoints only, so a user-entered (from, to) pair can be
/// matched against the legal-move list without knowing piece or capture.
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        (self.from, self.to) == (other.from, other.to)
    }
}

impl Eq for Move {}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            piece: None,
            captured: None,
            special: None,
        }
    }

    pub fn with_piece(from: Square, to: Square, piece: Piece) -> Self {
        Self {
            piece: Some(piece),
            ..Self::new(from, to)
        }
    }

    pub fn with_special(from: Square, to: Square, piece: Piece, special: Special) -> Self {
        Self {
            piece: Some(piece),
            special: Some(special),
            ..Self::new(from, to)
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from.to_algebraic(), self.to.to_algebraic())?;
        if let Some(captured) = self.captured {
            write!(f, " x {}", captured.to_char())?;
        }
        if let Some(special) = self.special {
            write!(f, " *{:?}*", special)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("move must be four characters like e2e4, got {0:?}")]
    WrongLength(String),
    #[error("invalid square {0:?}")]
    InvalidSquare(String),
}

/// Parses a four-character endpoint pair like "e2e4" into (from, to).
/// Whitespace and commas are tolerated, matching lenient terminal input.
pub fn parse_endpoints(input: &str) -> Result<(Square, Square), MoveParseError> {
    let cleaned: Vec<char> = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if cleaned.len() != 4 {
        return Err(MoveParseError::WrongLength(input.to_string()));
    }
    let from_str: String = cleaned[..2].iter().collect();
    let to_str: String = cleaned[2..].iter().collect();
    let from = Square::from_algebraic(&from_str)
        .ok_or(MoveParseError::InvalidSquare(from_str))?;
    let to = Square::from_algebraic(&to_str)
        .ok_or(MoveParseError::InvalidSquare(to_str))?;
    Ok((from, to))
}

/// Everything needed to exactly invert one applied move: the piece as it
/// stood before the move (pre-promotion), the captured piece and the square
/// it stood on (which differs from `to` for en passant), and the special-move
/// flags as they were before the move.
#[derive(Debug, Clone, Copy)]
pub struct UndoRecord {
    pub moved: Piece,
    pub captured: Option<Piece>,
    pub captured_at: Square,
    pub rights: CastlingRights,
    pub en_passant: Option<Square>,
}

/// A move together with its undo record, owned by the board's history stack.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub mv: Move,
    pub undo: UndoRecord,
}
