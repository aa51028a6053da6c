use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::moves::{HistoryEntry, Move, Special, UndoRecord};
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Square;
use crate::rules;

pub const SIZE: usize = 8;

/// Score reported for a decisive result (king captured). Large enough to
/// dominate every heuristic term the evaluator can produce.
pub const WIN_SCORE: i32 = 20_000;

/// Games longer than this many plies are declared drawn.
pub const PLY_CAP: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_left: bool,
    pub white_right: bool,
    pub black_left: bool,
    pub black_right: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_left: true,
            white_right: true,
            black_left: true,
            black_right: true,
        }
    }
}

impl CastlingRights {
    fn get(&self, color: Color, special: Special) -> bool {
        match (color, special) {
            (Color::White, Special::CastleLeft) => self.white_left,
            (Color::White, Special::CastleRight) => self.white_right,
            (Color::Black, Special::CastleLeft) => self.black_left,
            (Color::Black, Special::CastleRight) => self.black_right,
            _ => false,
        }
    }

    fn clear_both(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_left = false;
                self.white_right = false;
            }
            Color::Black => {
                self.black_left = false;
                self.black_right = false;
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridParseError {
    #[error("expected {SIZE} rows, got {0}")]
    WrongRowCount(usize),
    #[error("row {row} has {found} cells, expected {SIZE}")]
    WrongColCount { row: usize, found: usize },
    #[error("unknown piece character {0:?}")]
    UnknownPiece(char),
}

/// The chess board state machine.
///
/// The grid is the ground truth; `piece_index` mirrors its non-empty cells so
/// "all my pieces" is a scan of at most 32 entries instead of 64 squares. The
/// two are kept in sync by funnelling every cell mutation through `put`/`take`.
///
/// Castling rights and the en-passant target encode irreversible history and
/// are not derivable from the grid, so each applied move snapshots them into
/// its undo record.
#[derive(Debug, Clone)]
pub struct ChessBoard {
    cells: [[Option<Piece>; SIZE]; SIZE],
    piece_index: BTreeSet<(Piece, Square)>,
    turn: Color,
    rights: CastlingRights,
    en_passant: Option<Square>,
    history: Vec<HistoryEntry>,
}

impl ChessBoard {
    /// A board with the standard starting position, white to move.
    pub fn new() -> Self {
        let mut board = Self::empty();
        let back_row = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (col, &kind) in back_row.iter().enumerate() {
            let col = col as u8;
            board.put(Square { row: 0, col }, Piece::new(kind, Color::Black));
            board.put(Square { row: 1, col }, Piece::new(PieceKind::Pawn, Color::Black));
            board.put(Square { row: 6, col }, Piece::new(PieceKind::Pawn, Color::White));
            board.put(Square { row: 7, col }, Piece::new(kind, Color::White));
        }
        board
    }

    /// An empty board, white to move, all castling rights still set.
    pub fn empty() -> Self {
        Self {
            cells: [[None; SIZE]; SIZE],
            piece_index: BTreeSet::new(),
            turn: Color::White,
            rights: CastlingRights::default(),
            en_passant: None,
            history: Vec::new(),
        }
    }

    /// Parses the whitespace-separated grid format produced by `Display`:
    /// eight rows of eight one-character cells, `.` for empty.
    pub fn parse_grid(text: &str) -> Result<Self, GridParseError> {
        let rows: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        if rows.len() != SIZE {
            return Err(GridParseError::WrongRowCount(rows.len()));
        }
        let mut board = Self::empty();
        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<&str> = line.split_whitespace().collect();
            if cells.len() != SIZE {
                return Err(GridParseError::WrongColCount {
                    row,
                    found: cells.len(),
                });
            }
            for (col, cell) in cells.iter().enumerate() {
                let c = cell.chars().next().unwrap();
                if cell.len() != 1 {
                    return Err(GridParseError::UnknownPiece(c));
                }
                if c == '.' {
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(GridParseError::UnknownPiece(c))?;
                board.put(
                    Square {
                        row: row as u8,
                        col: col as u8,
                    },
                    piece,
                );
            }
        }
        Ok(board)
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.row as usize][sq.col as usize]
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Overrides the side to move. Useful when setting up positions.
    pub fn set_turn(&mut self, turn: Color) {
        self.turn = turn;
    }

    pub fn rights(&self) -> CastlingRights {
        self.rights
    }

    pub fn set_rights(&mut self, rights: CastlingRights) {
        self.rights = rights;
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    /// Sets the en-passant target square directly, as if the previous move
    /// had been a double pawn advance landing there.
    pub fn set_en_passant_target(&mut self, target: Option<Square>) {
        self.en_passant = target;
    }

    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last().map(|entry| &entry.mv)
    }

    /// All pieces of one side with their squares, in deterministic order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Piece, Square)> + '_ {
        self.piece_index
            .iter()
            .copied()
            .filter(move |(piece, _)| piece.color == color)
    }

    fn put(&mut self, sq: Square, piece: Piece) {
        if let Some(old) = self.cells[sq.row as usize][sq.col as usize] {
            self.piece_index.remove(&(old, sq));
        }
        self.cells[sq.row as usize][sq.col as usize] = Some(piece);
        self.piece_index.insert((piece, sq));
    }

    fn take(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.cells[sq.row as usize][sq.col as usize].take();
        if let Some(piece) = piece {
            self.piece_index.remove(&(piece, sq));
        }
        piece
    }

    /// Enumerates every pseudo-legal move for `turn` (defaulting to the side
    /// to move): piece-class destinations, pawn moves onto the last row
    /// expanded into promotions, then castles and en-passant captures.
    ///
    /// Moves that would leave the mover's own king capturable are NOT
    /// filtered out; "losing" is capture of the king itself.
    pub fn moves_for(&self, turn: Color) -> Vec<Move> {
        let mut all = Vec::new();
        for (piece, from) in self.pieces_of(turn) {
            for to in rules::destinations(self, from, piece) {
                if piece.kind == PieceKind::Pawn && to.row == Self::promotion_row(turn) {
                    for kind in [
                        PieceKind::Queen,
                        PieceKind::Rook,
                        PieceKind::Bishop,
                        PieceKind::Knight,
                    ] {
                        all.push(Move::with_special(from, to, piece, Special::Promote(kind)));
                    }
                } else {
                    all.push(Move::with_piece(from, to, piece));
                }
            }
        }
        all.extend(self.castle_moves(turn));
        all.extend(self.en_passant_moves(turn));
        all
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.moves_for(self.turn)
    }

    fn promotion_row(turn: Color) -> u8 {
        match turn {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    fn home_row(turn: Color) -> u8 {
        match turn {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Castle moves available to `turn`: the right must still be set and the
    /// home row must hold exactly the expected layout (king and rook on their
    /// original squares, intervening squares empty). Whether the king's path
    /// is attacked is not checked.
    pub fn castle_moves(&self, turn: Color) -> Vec<Move> {
        let row = Self::home_row(turn);
        let king = Piece::new(PieceKind::King, turn);
        let rook = Piece::new(PieceKind::Rook, turn);
        let at = |col: u8| self.piece_at(Square { row, col });

        let mut moves = Vec::new();
        if self.rights.get(turn, Special::CastleLeft)
            && at(0) == Some(rook)
            && at(1).is_none()
            && at(2).is_none()
            && at(3).is_none()
            && at(4) == Some(king)
        {
            moves.push(Move::with_special(
                Square { row, col: 4 },
                Square { row, col: 2 },
                king,
                Special::CastleLeft,
            ));
        }
        if self.rights.get(turn, Special::CastleRight)
            && at(4) == Some(king)
            && at(5).is_none()
            && at(6).is_none()
            && at(7) == Some(rook)
        {
            moves.push(Move::with_special(
                Square { row, col: 4 },
                Square { row, col: 6 },
                king,
                Special::CastleRight,
            ));
        }
        moves
    }

    /// En-passant captures available to `turn`: the target square must be set
    /// (a double pawn advance landed there last ply) and a pawn of `turn`
    /// must stand directly beside it. The capture lands behind the passed
    /// pawn, not on it.
    pub fn en_passant_moves(&self, turn: Color) -> Vec<Move> {
        let Some(spot) = self.en_passant else {
            return Vec::new();
        };
        let pawn = Piece::new(PieceKind::Pawn, turn);
        let mut moves = Vec::new();
        for dc in [-1, 1] {
            let Some(from) = spot.offset(0, dc) else {
                continue;
            };
            if self.piece_at(from) != Some(pawn) {
                continue;
            }
            let to = spot
                .offset(turn.forward(), 0)
                .expect("en-passant destination is in bounds");
            moves.push(Move {
                captured: self.piece_at(spot),
                ..Move::with_special(from, to, pawn, Special::EnPassant)
            });
        }
        moves
    }

    /// Applies a move: mutates the grid, performs special-move side effects,
    /// updates castling rights and the en-passant target, flips the turn, and
    /// pushes the fully-populated move onto the history stack.
    ///
    /// Panics if `from` is empty — that is a programmer error, and recovering
    /// from it would desynchronize the board state.
    pub fn apply(&mut self, mut mv: Move) {
        let piece = self
            .piece_at(mv.from)
            .unwrap_or_else(|| panic!("apply: no piece at {}", mv.from.to_algebraic()));

        let captured_at = match mv.special {
            Some(Special::EnPassant) => self
                .en_passant
                .expect("apply: en-passant move without a target square"),
            _ => mv.to,
        };
        let captured = self.piece_at(captured_at);

        let undo = UndoRecord {
            moved: piece,
            captured,
            captured_at,
            rights: self.rights,
            en_passant: self.en_passant,
        };

        self.take(mv.from);
        if captured.is_some() {
            self.take(captured_at);
        }
        let placed = match mv.special {
            Some(Special::Promote(kind)) => Piece::new(kind, piece.color),
            _ => piece,
        };
        self.put(mv.to, placed);

        // Castling relocates the rook alongside the king's recorded move.
        match mv.special {
            Some(Special::CastleLeft) => self.relocate_rook(mv.from.row, 0, 3),
            Some(Special::CastleRight) => self.relocate_rook(mv.from.row, 7, 5),
            _ => {}
        }

        self.update_rights(piece, mv.from);

        // A double pawn advance arms en passant for exactly one ply.
        self.en_passant = if piece.kind == PieceKind::Pawn
            && (mv.from.row as i8 - mv.to.row as i8).abs() == 2
        {
            Some(mv.to)
        } else {
            None
        };

        self.turn = self.turn.opponent();

        mv.piece = Some(placed);
        mv.captured = captured;
        self.history.push(HistoryEntry { mv, undo });
    }

    /// Reverses the most recent move exactly: grid, captured piece, castling
    /// rights, en-passant target, relocated rook, demoted pawn, and turn.
    ///
    /// Panics if the history is empty.
    pub fn undo(&mut self) {
        let HistoryEntry { mv, undo } = self
            .history
            .pop()
            .expect("undo: no moves have been applied");

        self.take(mv.to);
        self.put(mv.from, undo.moved);
        if let Some(captured) = undo.captured {
            self.put(undo.captured_at, captured);
        }

        match mv.special {
            Some(Special::CastleLeft) => self.relocate_rook(mv.from.row, 3, 0),
            Some(Special::CastleRight) => self.relocate_rook(mv.from.row, 5, 7),
            _ => {}
        }

        self.rights = undo.rights;
        self.en_passant = undo.en_passant;
        self.turn = self.turn.opponent();
    }

    fn relocate_rook(&mut self, row: u8, from_col: u8, to_col: u8) {
        let from = Square { row, col: from_col };
        let rook = self
            .take(from)
            .unwrap_or_else(|| panic!("castle: no rook at {}", from.to_algebraic()));
        self.put(Square { row, col: to_col }, rook);
    }

    /// Rights are cleared when the king moves, or when a rook moves off its
    /// original corner. Once cleared a right never returns except through
    /// `undo` restoring the snapshot.
    fn update_rights(&mut self, piece: Piece, from: Square) {
        match piece.kind {
            PieceKind::King => self.rights.clear_both(piece.color),
            PieceKind::Rook => {
                if from.row == Self::home_row(piece.color) {
                    match (piece.color, from.col) {
                        (Color::White, 0) => self.rights.white_left = false,
                        (Color::White, 7) => self.rights.white_right = false,
                        (Color::Black, 0) => self.rights.black_left = false,
                        (Color::Black, 7) => self.rights.black_right = false,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    /// Reports game over by, in order: consecutive threefold repetition of
    /// the last two plies (draw), a missing king (decisive win for the side
    /// whose king survives), and the ply cap (forced draw). Observes only the
    /// current board and recorded history; no lookahead.
    pub fn is_terminal(&self) -> (i32, bool) {
        let n = self.history.len();
        if n >= 10 {
            let mv = |back: usize| &self.history[n - back].mv;
            if mv(1) == mv(5) && mv(5) == mv(9) && mv(2) == mv(6) && mv(6) == mv(10) {
                return (0, true);
            }
        }

        let king_alive = |color: Color| {
            self.pieces_of(color)
                .any(|(piece, _)| piece.kind == PieceKind::King)
        };
        if !king_alive(Color::Black) {
            return (WIN_SCORE, true);
        }
        if !king_alive(Color::White) {
            return (-WIN_SCORE, true);
        }

        if n > PLY_CAP {
            return (0, true);
        }

        (0, false)
    }

    /// Verifies the `cells`/`piece_index` synchronization invariant. Intended
    /// for tests and debug assertions.
    pub fn index_is_consistent(&self) -> bool {
        let mut from_cells = BTreeSet::new();
        for row in 0..SIZE as u8 {
            for col in 0..SIZE as u8 {
                let sq = Square { row, col };
                if let Some(piece) = self.piece_at(sq) {
                    from_cells.insert((piece, sq));
                }
            }
        }
        from_cells == self.piece_index
    }
}

impl Default for ChessBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChessBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: Vec<String> = row
                .iter()
                .map(|cell| cell.map_or(".".to_string(), |p| p.to_char().to_string()))
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
