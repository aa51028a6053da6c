use log::info;

use game_core::{ChessBoard, Color};

use crate::players::Player;

/// How a finished game ended: the terminal score (positive = white won,
/// zero = draw), the number of plies played, and the final board.
#[derive(Debug)]
pub struct GameOutcome {
    pub score: i32,
    pub plies: usize,
    pub final_board: ChessBoard,
}

/// Alternates turns between the two players until the board reports game
/// over or a player has no move to offer. When `display` is set, the board
/// is printed after every ply.
pub fn play_game(white: &mut dyn Player, black: &mut dyn Player, display: bool) -> GameOutcome {
    let mut board = ChessBoard::new();

    loop {
        let (score, over) = board.is_terminal();
        if over {
            info!("game over after {} plies, score {}", board.ply_count(), score);
            return GameOutcome {
                score,
                plies: board.ply_count(),
                final_board: board,
            };
        }

        let mover = board.turn();
        let chosen = match mover {
            Color::White => white.choose_move(&mut board),
            Color::Black => black.choose_move(&mut board),
        };
        let Some(mv) = chosen else {
            // a side with nothing to play ends the game at its current value
            let (score, _) = board.is_terminal();
            info!("{:?} has no move after {} plies", mover, board.ply_count());
            return GameOutcome {
                score,
                plies: board.ply_count(),
                final_board: board,
            };
        };

        board.apply(mv);
        info!("{:?} played {}", mover, board.last_move().expect("move was applied"));
        if display {
            println!("----- {:?} played {}", mover, mv);
            println!("{}", board);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::{EnginePlayer, RandomPlayer};
    use game_core::{PLY_CAP, WIN_SCORE};

    #[test]
    fn random_game_terminates() {
        let mut white = RandomPlayer::new();
        let mut black = RandomPlayer::new();
        let outcome = play_game(&mut white, &mut black, false);
        assert!(outcome.plies <= PLY_CAP + 1);
        assert!(outcome.score == 0 || outcome.score.abs() == WIN_SCORE);
        assert!(outcome.final_board.index_is_consistent());
    }

    #[test]
    fn shallow_engines_finish_a_game() {
        let mut white = EnginePlayer::with_depth(1);
        let mut black = EnginePlayer::with_depth(1);
        let outcome = play_game(&mut white, &mut black, false);
        assert!(outcome.plies > 0);
        assert!(outcome.score == 0 || outcome.score.abs() == WIN_SCORE);
    }
}
