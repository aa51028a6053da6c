//! Per-piece-class destination rules. These are pure functions of the board,
//! a square, and the moving side; they know nothing about castling rights or
//! en-passant state, which live on the board itself.

use crate::board::{ChessBoard, SIZE};
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Square;

pub const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (1, -2),
    (2, 1),
    (2, -1),
    (-1, 2),
    (-1, -2),
    (-2, 1),
    (-2, -1),
];

pub const KING_JUMPS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

pub const ROOK_STEPS: [(i8, i8); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

pub const BISHOP_STEPS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const QUEEN_STEPS: [(i8, i8); 8] = [
    (1, 0),
    (0, 1),
    (-1, 0),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Dispatches to the rule for the given piece's kind.
///
/// Destinations are pseudo-legal: they ignore whether the move would leave
/// the mover's own king capturable.
pub fn destinations(board: &ChessBoard, from: Square, piece: Piece) -> Vec<Square> {
    match piece.kind {
        PieceKind::Pawn => pawn_dests(board, from, piece.color),
        PieceKind::Knight => jumping_dests(board, from, piece.color, &KNIGHT_JUMPS),
        PieceKind::Bishop => sliding_dests(board, from, piece.color, &BISHOP_STEPS),
        PieceKind::Rook => sliding_dests(board, from, piece.color, &ROOK_STEPS),
        PieceKind::Queen => sliding_dests(board, from, piece.color, &QUEEN_STEPS),
        PieceKind::King => jumping_dests(board, from, piece.color, &KING_JUMPS),
    }
}

/// Walks each direction outward, stopping before a friendly piece and on an
/// enemy piece (which is included as a capture).
pub fn sliding_dests(
    board: &ChessBoard,
    from: Square,
    mover: Color,
    steps: &[(i8, i8)],
) -> Vec<Square> {
    let mut dests = Vec::new();
    for &(dr, dc) in steps {
        for i in 1..=SIZE as i8 {
            let Some(sq) = from.offset(i * dr, i * dc) else {
                break;
            };
            match board.piece_at(sq) {
                Some(p) if p.color == mover => break,
                Some(_) => {
                    dests.push(sq);
                    break;
                }
                None => dests.push(sq),
            }
        }
    }
    dests
}

/// Applies each fixed offset once, keeping in-bounds squares not occupied by
/// the mover's own pieces.
pub fn jumping_dests(
    board: &ChessBoard,
    from: Square,
    mover: Color,
    jumps: &[(i8, i8)],
) -> Vec<Square> {
    jumps
        .iter()
        .filter_map(|&(dr, dc)| from.offset(dr, dc))
        .filter(|&sq| board.piece_at(sq).map_or(true, |p| p.color != mover))
        .collect()
}

/// Pawns are the odd ones out: asymmetric by side, position-dependent, and
/// their captures are not their moves. Forward one if clear, forward two from
/// the home row if both squares are clear, diagonal only onto an enemy piece.
pub fn pawn_dests(board: &ChessBoard, from: Square, mover: Color) -> Vec<Square> {
    let dir = mover.forward();
    let home_row = match mover {
        Color::White => 6,
        Color::Black => 1,
    };

    let mut jumps: Vec<(i8, i8)> = Vec::new();
    if let Some(one) = from.offset(dir, 0) {
        if board.piece_at(one).is_none() {
            jumps.push((dir, 0));
            if from.row == home_row {
                let two = from.offset(2 * dir, 0).expect("home row double advance is in bounds");
                if board.piece_at(two).is_none() {
                    jumps.push((2 * dir, 0));
                }
            }
        }
    }
    for dc in [-1, 1] {
        if let Some(diag) = from.offset(dir, dc) {
            if board.piece_at(diag).is_some_and(|p| p.color != mover) {
                jumps.push((dir, dc));
            }
        }
    }

    jumping_dests(board, from, mover, &jumps)
}
