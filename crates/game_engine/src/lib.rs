pub mod driver;
pub mod evaluation;
pub mod players;
pub mod search;

pub use driver::{play_game, GameOutcome};
pub use evaluation::{ChessEvaluator, EvalOptions, Evaluator, TicTacToeEvaluator};
pub use players::{EnginePlayer, Player, RandomPlayer};
pub use search::{SearchEngine, SearchOptions, TranspositionTable};
