//! Self-play experiment harness: plays every pairing of a grid of player
//! configurations in parallel and appends one JSON record per finished game
//! to `experiments.jsonl`. The log is append-only, so an interrupted run can
//! be rerun and the records concatenated; nothing here reads the file back.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use game_engine::{play_game, EnginePlayer, EvalOptions, SearchOptions};

const RESULTS_FILE: &str = "experiments.jsonl";

#[derive(Debug, Clone, Serialize)]
struct PlayerConfig {
    depth: u32,
    explore_ratio: f32,
    min_branches: usize,
    piece_table: bool,
    mobility: bool,
}

impl PlayerConfig {
    fn build(&self) -> EnginePlayer {
        EnginePlayer::new(
            SearchOptions {
                depth: self.depth,
                explore_ratio: self.explore_ratio,
                min_branches: self.min_branches,
                time_budget: None,
            },
            EvalOptions {
                material: true,
                piece_table: self.piece_table,
                mobility: self.mobility,
            },
        )
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord<'a> {
    white: &'a PlayerConfig,
    black: &'a PlayerConfig,
    score: i32,
    plies: usize,
    final_board: String,
    finished_at: DateTime<Utc>,
}

/// The configuration grid under study: every combination of the evaluation
/// toggles at a fixed depth. Deeper settings exist but get expensive fast.
fn all_players() -> Vec<PlayerConfig> {
    let mut players = Vec::new();
    for depth in [3] {
        for explore_ratio in [1.0] {
            for piece_table in [true, false] {
                for mobility in [true, false] {
                    players.push(PlayerConfig {
                        depth,
                        explore_ratio,
                        min_branches: 10,
                        piece_table,
                        mobility,
                    });
                }
            }
        }
    }
    players
}

fn main() -> io::Result<()> {
    env_logger::init();

    let players = all_players();
    let matches: Vec<(&PlayerConfig, &PlayerConfig)> = players
        .iter()
        .flat_map(|white| players.iter().map(move |black| (white, black)))
        .collect();
    info!(
        "running {} matches over {} configurations",
        matches.len(),
        players.len()
    );

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(RESULTS_FILE)?;
    let writer = Mutex::new(BufWriter::new(file));

    matches.par_iter().for_each(|&(white_cfg, black_cfg)| {
        let mut white = white_cfg.build();
        let mut black = black_cfg.build();
        let outcome = play_game(&mut white, &mut black, false);
        info!(
            "finished: score {} in {} plies (white {:?} vs black {:?})",
            outcome.score, outcome.plies, white_cfg, black_cfg
        );

        let record = MatchRecord {
            white: white_cfg,
            black: black_cfg,
            score: outcome.score,
            plies: outcome.plies,
            final_board: outcome.final_board.to_string(),
            finished_at: Utc::now(),
        };
        match serde_json::to_string(&record) {
            Ok(line) => {
                let mut writer = writer.lock().expect("results writer poisoned");
                if let Err(err) = writeln!(writer, "{}", line) {
                    warn!("failed to append result record: {}", err);
                }
            }
            Err(err) => warn!("failed to serialize result record: {}", err),
        }
    });

    writer
        .into_inner()
        .expect("results writer poisoned")
        .flush()
}
