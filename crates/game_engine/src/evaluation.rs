use game_core::{ChessBoard, Color, GameState, Piece, PieceKind, Square, TicTacToeBoard};
use game_core::{SIZE, WIN_SCORE};

/// Maps a board to a signed score and a game-over flag.
///
/// Positive scores favor the reference side (white / x); the search treats
/// that side as the maximizer. Implementations must report terminal positions
/// before computing any heuristic terms.
pub trait Evaluator<G: GameState> {
    fn evaluate(&self, board: &G) -> (i32, bool);
}

// Piece values in centipawns (100 = 1 pawn), the conventional scale.
const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 320;
const BISHOP_VALUE: i32 = 330;
const ROOK_VALUE: i32 = 500;
const QUEEN_VALUE: i32 = 900;
const KING_VALUE: i32 = 20000;

/// Weight per legal-move difference when the mobility term is enabled.
const MOBILITY_WEIGHT: i32 = 10;

// Piece-square tables define bonuses/penalties for piece positions, from
// https://www.chessprogramming.org/Simplified_Evaluation_Function.
// Written from white's perspective with row 0 at the top of the printed
// board (black's back rank); black values mirror both axes and negate.

// Pawns: push toward promotion, hold the center, avoid lingering at home.
const PAWN_TABLE: [[i32; 8]; 8] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [10, 10, 20, 30, 30, 20, 10, 10],
    [5, 5, 10, 25, 25, 10, 5, 5],
    [0, 0, 0, 20, 20, 0, 0, 0],
    [5, -5, -10, 0, 0, -10, -5, 5],
    [5, 10, 10, -20, -20, 10, 10, 5],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

// Knights: strong in the center, weak on the rim.
const KNIGHT_TABLE: [[i32; 8]; 8] = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20, 0, 0, 0, 0, -20, -40],
    [-30, 0, 10, 15, 15, 10, 0, -30],
    [-30, 5, 15, 20, 20, 15, 5, -30],
    [-30, 0, 15, 20, 20, 15, 0, -30],
    [-30, 5, 10, 15, 15, 10, 5, -30],
    [-40, -20, 0, 5, 5, 0, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

// Bishops: long diagonals, stay off the edges.
const BISHOP_TABLE: [[i32; 8]; 8] = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 10, 10, 5, 0, -10],
    [-10, 5, 5, 10, 10, 5, 5, -10],
    [-10, 0, 10, 10, 10, 10, 0, -10],
    [-10, 10, 10, 10, 10, 10, 10, -10],
    [-10, 5, 0, 0, 0, 0, 5, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

// Rooks: seventh rank bonus, slight preference for central files.
const ROOK_TABLE: [[i32; 8]; 8] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 10, 10, 10, 10, 10, 10, 5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [0, 0, 0, 5, 5, 0, 0, 0],
];

// Queens: mild centralization, nothing dramatic.
const QUEEN_TABLE: [[i32; 8]; 8] = [
    [-20, -10, -10, -5, -5, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-5, 0, 5, 5, 5, 5, 0, -5],
    [0, 0, 5, 5, 5, 5, 0, -5],
    [-10, 5, 5, 5, 5, 5, 0, -10],
    [-10, 0, 5, 0, 0, 0, 0, -10],
    [-20, -10, -10, -5, -5, -10, -10, -20],
];

// King, middlegame shape: hide behind the pawn wall, reward castled corners.
const KING_TABLE: [[i32; 8]; 8] = [
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-20, -30, -30, -40, -40, -30, -30, -20],
    [-10, -20, -20, -20, -20, -20, -20, -10],
    [20, 20, 0, 0, 0, 0, 20, 20],
    [20, 30, 10, 0, 0, 10, 30, 20],
];

fn kind_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => KING_VALUE,
    }
}

fn kind_table(kind: PieceKind) -> &'static [[i32; 8]; 8] {
    match kind {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King => &KING_TABLE,
    }
}

fn material_value(piece: Piece) -> i32 {
    match piece.color {
        Color::White => kind_value(piece.kind),
        Color::Black => -kind_value(piece.kind),
    }
}

fn table_value(piece: Piece, sq: Square) -> i32 {
    let table = kind_table(piece.kind);
    match piece.color {
        Color::White => table[sq.row as usize][sq.col as usize],
        Color::Black => {
            -table[SIZE - 1 - sq.row as usize][SIZE - 1 - sq.col as usize]
        }
    }
}

/// Independently toggleable evaluation terms.
#[derive(Debug, Clone, Copy)]
pub struct EvalOptions {
    pub material: bool,
    pub piece_table: bool,
    pub mobility: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            material: true,
            piece_table: true,
            mobility: false,
        }
    }
}

/// The chess heuristic: a weighted sum of material, piece-square table, and
/// (optionally) mobility terms. Scores are roughly in centipawns.
#[derive(Debug, Clone, Default)]
pub struct ChessEvaluator {
    pub opts: EvalOptions,
}

impl ChessEvaluator {
    pub fn new(opts: EvalOptions) -> Self {
        Self { opts }
    }
}

impl Evaluator<ChessBoard> for ChessEvaluator {
    fn evaluate(&self, board: &ChessBoard) -> (i32, bool) {
        let (end_score, over) = board.is_terminal();
        if over {
            return (end_score, true);
        }

        let mut score = 0;
        for color in [Color::White, Color::Black] {
            for (piece, sq) in board.pieces_of(color) {
                if self.opts.material {
                    score += material_value(piece);
                }
                if self.opts.piece_table {
                    score += table_value(piece, sq);
                }
            }
        }

        if self.opts.mobility {
            let white = board.moves_for(Color::White).len() as i32;
            let black = board.moves_for(Color::Black).len() as i32;
            score += MOBILITY_WEIGHT * (white - black);
        }

        (score, false)
    }
}

/// Evaluation for the 3x3 variant: completed lines are decisive, everything
/// else is level. A full board with no winner is left for the search to
/// treat as a leaf.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToeEvaluator;

impl Evaluator<TicTacToeBoard> for TicTacToeEvaluator {
    fn evaluate(&self, board: &TicTacToeBoard) -> (i32, bool) {
        match board.winner() {
            Some(game_core::Mark::X) => (WIN_SCORE, true),
            Some(game_core::Mark::O) => (-WIN_SCORE, true),
            None => (0, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Mark, Move};

    fn sq(row: u8, col: u8) -> Square {
        Square { row, col }
    }

    #[test]
    fn start_position_is_level() {
        let board = ChessBoard::new();
        let eval = ChessEvaluator::default();
        assert_eq!(eval.evaluate(&board), (0, false));
    }

    #[test]
    fn empty_board_is_over() {
        let board = ChessBoard::empty();
        let eval = ChessEvaluator::default();
        assert!(eval.evaluate(&board).1);
    }

    #[test]
    fn first_center_push_improves_white() {
        let mut board = ChessBoard::new();
        board.apply(Move::new(sq(6, 4), sq(5, 4)));
        let eval = ChessEvaluator::default();
        let (score, over) = eval.evaluate(&board);
        assert!(!over);
        assert!(score > 0, "score was {}", score);
    }

    #[test]
    fn terminal_result_bypasses_toggles() {
        let board = ChessBoard::parse_grid(
            ". . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . K . . .\n",
        )
        .unwrap();
        let eval = ChessEvaluator::new(EvalOptions {
            material: false,
            piece_table: false,
            mobility: false,
        });
        assert_eq!(eval.evaluate(&board), (WIN_SCORE, true));
    }

    #[test]
    fn all_terms_disabled_scores_zero() {
        let mut board = ChessBoard::new();
        board.apply(Move::new(sq(6, 4), sq(4, 4)));
        let eval = ChessEvaluator::new(EvalOptions {
            material: false,
            piece_table: false,
            mobility: false,
        });
        assert_eq!(eval.evaluate(&board), (0, false));
    }

    #[test]
    fn material_term_counts_captures() {
        let board = ChessBoard::parse_grid(
            ". . . . k . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             Q . . . K . . .\n",
        )
        .unwrap();
        let eval = ChessEvaluator::new(EvalOptions {
            material: true,
            piece_table: false,
            mobility: false,
        });
        let (score, over) = eval.evaluate(&board);
        assert!(!over);
        assert_eq!(score, QUEEN_VALUE);
    }

    #[test]
    fn piece_tables_mirror_between_sides() {
        let kings_only = ". . . k . . . .\n\
                          . . . . . . . .\n\
                          . . . . . . . .\n\
                          . . . . . . . .\n\
                          . . . . . . . .\n\
                          . . . . . . . .\n\
                          . . . . . . . .\n\
                          . . . . K . . .\n";
        let eval = ChessEvaluator::new(EvalOptions {
            material: false,
            piece_table: true,
            mobility: false,
        });

        // the kings sit on mirrored squares and cancel exactly
        let board = ChessBoard::parse_grid(kings_only).unwrap();
        assert_eq!(eval.evaluate(&board).0, 0);

        // a white pawn on d4 is worth +20; the mirrored black pawn on e5
        // cancels it again
        let grid_white = ". . . k . . . .\n\
                          . . . . . . . .\n\
                          . . . . . . . .\n\
                          . . . . . . . .\n\
                          . . . P . . . .\n\
                          . . . . . . . .\n\
                          . . . . . . . .\n\
                          . . . . K . . .\n";
        let board = ChessBoard::parse_grid(grid_white).unwrap();
        assert_eq!(eval.evaluate(&board).0, 20);

        let grid_both = ". . . k . . . .\n\
                         . . . . . . . .\n\
                         . . . . . . . .\n\
                         . . . . p . . .\n\
                         . . . P . . . .\n\
                         . . . . . . . .\n\
                         . . . . . . . .\n\
                         . . . . K . . .\n";
        let board = ChessBoard::parse_grid(grid_both).unwrap();
        assert_eq!(eval.evaluate(&board).0, 0);
    }

    #[test]
    fn mobility_term_is_level_at_start() {
        let board = ChessBoard::new();
        let eval = ChessEvaluator::new(EvalOptions {
            material: false,
            piece_table: false,
            mobility: true,
        });
        assert_eq!(eval.evaluate(&board), (0, false));
    }

    #[test]
    fn tictactoe_lines_are_decisive() {
        let eval = TicTacToeEvaluator;
        let mut board = TicTacToeBoard::new();
        assert_eq!(eval.evaluate(&board), (0, false));

        for col in 0..3 {
            board.place(0, col, Mark::X);
        }
        assert_eq!(eval.evaluate(&board), (WIN_SCORE, true));

        let mut board = TicTacToeBoard::new();
        for row in 0..3 {
            board.place(row, 2, Mark::O);
        }
        assert_eq!(eval.evaluate(&board), (-WIN_SCORE, true));
    }
}
