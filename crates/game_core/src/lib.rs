// Board models and the game-state contract the search engine drives.
pub mod board;
pub mod game;
pub mod moves;
pub mod piece;
pub mod position;
pub mod rules;
pub mod tictactoe;

// Re-export main types for convenience
pub use board::{CastlingRights, ChessBoard, GridParseError, PLY_CAP, SIZE, WIN_SCORE};
pub use game::GameState;
pub use moves::{parse_endpoints, HistoryEntry, Move, MoveParseError, Special, UndoRecord};
pub use piece::{Color, Piece, PieceKind};
pub use position::Square;
pub use tictactoe::{Mark, TicTacToeBoard};
