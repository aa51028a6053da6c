//! Terminal game loop: a human plays white from stdin against the engine.
//! Pass a depth argument to change the engine's lookahead, e.g.
//! `minmax-chess 3`.

use std::io::{self, BufRead, Write};

use log::info;

use game_core::{parse_endpoints, ChessBoard, Color, Move};
use game_engine::{ChessEvaluator, EnginePlayer, EvalOptions, Evaluator, Player, SearchOptions};

const DEFAULT_DEPTH: u32 = 4;

/// Reads four-character moves from stdin and matches them against the
/// legal-move list by endpoint equality, reprompting until one sticks.
struct HumanPlayer {
    input: io::Stdin,
}

impl HumanPlayer {
    fn new() -> Self {
        Self { input: io::stdin() }
    }
}

impl Player for HumanPlayer {
    fn choose_move(&mut self, board: &mut ChessBoard) -> Option<Move> {
        let legal = board.legal_moves();
        loop {
            print!("your move (e.g. e2e4): ");
            io::stdout().flush().ok();

            let mut line = String::new();
            match self.input.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return None, // input exhausted
                Ok(_) => {}
            }

            let (from, to) = match parse_endpoints(&line) {
                Ok(endpoints) => endpoints,
                Err(err) => {
                    println!("{}", err);
                    continue;
                }
            };
            let probe = Move::new(from, to);
            match legal.iter().find(|legal_mv| **legal_mv == probe) {
                Some(mv) => return Some(*mv),
                None => println!("Illegal move!"),
            }
        }
    }
}

fn main() {
    env_logger::init();

    let depth = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_DEPTH);
    info!("engine depth {}", depth);

    let mut human = HumanPlayer::new();
    let mut engine = EnginePlayer::new(
        SearchOptions {
            depth,
            ..SearchOptions::default()
        },
        EvalOptions::default(),
    );
    let evaluator = ChessEvaluator::default();

    let mut board = ChessBoard::new();
    println!("{}", board);

    loop {
        let (score, over) = board.is_terminal();
        if over {
            match score {
                0 => println!("Draw after {} plies.", board.ply_count()),
                s if s > 0 => println!("White wins."),
                _ => println!("Black wins."),
            }
            break;
        }

        let mover = board.turn();
        let chosen = match mover {
            Color::White => human.choose_move(&mut board),
            Color::Black => engine.choose_move(&mut board),
        };
        let Some(mv) = chosen else {
            println!("{:?} has no move; game over.", mover);
            break;
        };

        board.apply(mv);
        println!("----- {:?} played {}", mover, mv);
        println!("{}", board);
        println!("current score: {}", evaluator.evaluate(&board).0);
    }
}
