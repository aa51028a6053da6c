use log::debug;
use rand::seq::SliceRandom;

use game_core::{ChessBoard, Move};

use crate::evaluation::{ChessEvaluator, EvalOptions};
use crate::search::{SearchEngine, SearchOptions};

/// A move source for one side of a chess game. Returning `None` means the
/// player has nothing to offer (no legal moves, or an exhausted input) and
/// ends the game.
pub trait Player {
    fn choose_move(&mut self, board: &mut ChessBoard) -> Option<Move>;
}

/// Search-backed player. Owns its engine (and therefore its transposition
/// cache) so concurrent games never share state.
pub struct EnginePlayer {
    engine: SearchEngine,
    evaluator: ChessEvaluator,
}

impl EnginePlayer {
    pub fn new(search: SearchOptions, eval: EvalOptions) -> Self {
        Self {
            engine: SearchEngine::new(search),
            evaluator: ChessEvaluator::new(eval),
        }
    }

    pub fn with_depth(depth: u32) -> Self {
        Self::new(
            SearchOptions {
                depth,
                ..SearchOptions::default()
            },
            EvalOptions::default(),
        )
    }
}

impl Player for EnginePlayer {
    fn choose_move(&mut self, board: &mut ChessBoard) -> Option<Move> {
        let (score, mv) = if self.engine.options().time_budget.is_some() {
            self.engine.iterative(board, &self.evaluator)
        } else {
            self.engine.best_move(board, &self.evaluator)
        };
        match mv {
            Some(mv) => debug!("engine plays {} (expected score {})", mv, score),
            None => debug!("engine has no move (score {})", score),
        }
        mv
    }
}

/// Uniform-random baseline opponent.
pub struct RandomPlayer {
    rng: rand::rngs::ThreadRng,
}

impl RandomPlayer {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for RandomPlayer {
    fn choose_move(&mut self, board: &mut ChessBoard) -> Option<Move> {
        board.legal_moves().choose(&mut self.rng).copied()
    }
}
