use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::debug;

use game_core::GameState;

use crate::evaluation::Evaluator;

/// Fall back to this budget when iterative deepening is run without one.
const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(10);

/// Clear the transposition cache rather than let it grow past this.
pub const DEFAULT_TT_CAPACITY: usize = 1_000_000;

/// Search configuration.
///
/// `explore_ratio` and `min_branches` drive breadth limiting: only the top
/// `max(ceil(n * explore_ratio), min_branches)` ordered candidates are
/// explored. This is an accuracy/speed tradeoff, not a correctness-preserving
/// optimization — it can prune the true best move. The defaults explore
/// everything.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Plies to look ahead.
    pub depth: u32,
    /// Fraction of ordered candidates to explore at each node.
    pub explore_ratio: f32,
    /// Floor on explored candidates when the ratio would cut too deep.
    pub min_branches: usize,
    /// Wall-clock budget for iterative deepening, checked between depths.
    pub time_budget: Option<Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            depth: 4,
            explore_ratio: 1.0,
            min_branches: 10,
            time_budget: None,
        }
    }
}

/// Cache of subtree scores keyed by serialized game state and remaining
/// depth. Values for a given key are deterministic, so overwriting is
/// harmless; when the map outgrows its capacity it is simply cleared.
#[derive(Debug)]
pub struct TranspositionTable {
    entries: HashMap<(String, u32), i32>,
    capacity: usize,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
        }
    }

    pub fn get(&self, key: &(String, u32)) -> Option<i32> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: (String, u32), score: i32) {
        if self.entries.len() >= self.capacity {
            debug!("clearing transposition table ({} entries)", self.entries.len());
            self.entries.clear();
        }
        self.entries.insert(key, score);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Minimax with alpha-beta pruning over any `GameState`.
///
/// The engine owns its transposition cache; nothing is shared between
/// instances, so concurrent searches each get their own engine (and their
/// own cloned board — apply/undo mutate in place).
#[derive(Debug)]
pub struct SearchEngine {
    opts: SearchOptions,
    tt: TranspositionTable,
}

impl SearchEngine {
    pub fn new(opts: SearchOptions) -> Self {
        Self {
            opts,
            tt: TranspositionTable::new(),
        }
    }

    pub fn with_depth(depth: u32) -> Self {
        Self::new(SearchOptions {
            depth,
            ..SearchOptions::default()
        })
    }

    pub fn options(&self) -> &SearchOptions {
        &self.opts
    }

    pub fn cache_len(&self) -> usize {
        self.tt.len()
    }

    /// Fixed-depth search at the configured depth with a full window.
    pub fn best_move<G, E>(&mut self, board: &mut G, evaluator: &E) -> (i32, Option<G::Move>)
    where
        G: GameState,
        E: Evaluator<G>,
    {
        let depth = self.opts.depth;
        self.minmax(board, evaluator, depth, i32::MIN, i32::MAX)
    }

    /// The core recursion. Returns the expected score down the chosen path
    /// and the move that starts it; `None` at leaves (terminal position,
    /// exhausted depth, or no legal moves).
    ///
    /// Every `apply` below is matched by an `undo` before the next sibling is
    /// touched — the board must come back to the caller unchanged.
    pub fn minmax<G, E>(
        &mut self,
        board: &mut G,
        evaluator: &E,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> (i32, Option<G::Move>)
    where
        G: GameState,
        E: Evaluator<G>,
    {
        let (score, over) = evaluator.evaluate(board);
        if over || depth == 0 {
            return (score, None);
        }

        let maximizing = board.maximizing_turn();

        let moves = board.legal_moves();
        if moves.is_empty() {
            // stalemate-like fallback: no moves but not flagged terminal
            return (score, None);
        }

        // Order candidates by their static evaluation one ply down. This is
        // a pruning heuristic only; it does not claim minimax accuracy.
        let mut scored: Vec<(G::Move, i32)> = moves
            .into_iter()
            .map(|mv| {
                board.apply(&mv);
                let (static_score, _) = evaluator.evaluate(board);
                board.undo();
                (mv, static_score)
            })
            .collect();
        scored.sort_by_key(|&(_, s)| if maximizing { -s } else { s });

        let limit = breadth_limit(scored.len(), self.opts.explore_ratio, self.opts.min_branches);
        scored.truncate(limit);

        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;

        for (mv, _) in scored {
            board.apply(&mv);
            let key = (board.transposition_key(), depth - 1);
            let score = match self.tt.get(&key) {
                Some(cached) => cached,
                None => {
                    let (score, _) = self.minmax(board, evaluator, depth - 1, alpha, beta);
                    self.tt.insert(key, score);
                    score
                }
            };
            board.undo();

            let improved = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if improved {
                best_score = score;
                best_move = Some(mv);
            }

            if maximizing {
                alpha = alpha.max(best_score);
            } else {
                beta = beta.min(best_score);
            }
            if beta <= alpha {
                // the parent will never choose this branch; remaining
                // siblings cannot change its decision
                break;
            }
        }

        (best_score, best_move)
    }

    /// Anytime wrapper: searches depths 0, 1, 2, ... up to the configured
    /// maximum, stopping before starting a new depth once the elapsed time
    /// exceeds the budget. Returns the last completed depth's result. A
    /// single deep iteration can overrun the budget; it is not cancellable
    /// mid-flight.
    pub fn iterative<G, E>(&mut self, board: &mut G, evaluator: &E) -> (i32, Option<G::Move>)
    where
        G: GameState,
        E: Evaluator<G>,
    {
        let budget = self.opts.time_budget.unwrap_or(DEFAULT_TIME_BUDGET);
        let start = Instant::now();

        let mut result = {
            let (score, _) = evaluator.evaluate(board);
            (score, None)
        };
        for depth in 0..=self.opts.depth {
            if start.elapsed() > budget {
                debug!("time budget exhausted before depth {}", depth);
                break;
            }
            let depth_start = Instant::now();
            result = self.minmax(board, evaluator, depth, i32::MIN, i32::MAX);
            debug!(
                "depth {} completed in {:?}, score {}",
                depth,
                depth_start.elapsed(),
                result.0
            );
        }
        result
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

fn breadth_limit(candidates: usize, explore_ratio: f32, min_branches: usize) -> usize {
    let scaled = (candidates as f32 * explore_ratio).ceil() as usize;
    scaled.max(min_branches).min(candidates)
}
