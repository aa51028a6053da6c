use crate::board::ChessBoard;
use crate::moves::Move;
use crate::piece::Color;

/// The contract the adversarial search engine drives a board through.
///
/// `apply` and `undo` must be used in strict stack discipline: every `apply`
/// on the way down the game tree is matched by exactly one `undo` on the way
/// back up. The board mutates in place, so it is not shareable across
/// concurrent search branches without cloning.
pub trait GameState {
    type Move: Clone + PartialEq + std::fmt::Debug;

    /// Every pseudo-legal move for the side to move. An empty result is a
    /// normal outcome, not an error.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Applies a move in place. Panics on precondition violations.
    fn apply(&mut self, mv: &Self::Move);

    /// Reverses the most recent move exactly. Panics on empty history.
    fn undo(&mut self);

    /// True when the reference side (the one positive scores favor) is to
    /// move — i.e. whether the search should maximize at this node.
    fn maximizing_turn(&self) -> bool;

    /// A serialization of the full game state, used as the transposition
    /// cache key. Two states with equal keys must have equal subtree values,
    /// so everything score-relevant belongs in here: cell contents, side to
    /// move, castling rights, en-passant target.
    fn transposition_key(&self) -> String;
}

impl GameState for ChessBoard {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        ChessBoard::legal_moves(self)
    }

    fn apply(&mut self, mv: &Move) {
        ChessBoard::apply(self, *mv);
    }

    fn undo(&mut self) {
        ChessBoard::undo(self);
    }

    fn maximizing_turn(&self) -> bool {
        self.turn() == Color::White
    }

    fn transposition_key(&self) -> String {
        let mut key = String::with_capacity(80);
        for row in 0..crate::board::SIZE as u8 {
            for col in 0..crate::board::SIZE as u8 {
                let sq = crate::position::Square { row, col };
                key.push(self.piece_at(sq).map_or('.', |p| p.to_char()));
            }
        }
        key.push(match self.turn() {
            Color::White => 'w',
            Color::Black => 'b',
        });
        let rights = self.rights();
        for (flag, c) in [
            (rights.white_left, 'Q'),
            (rights.white_right, 'K'),
            (rights.black_left, 'q'),
            (rights.black_right, 'k'),
        ] {
            key.push(if flag { c } else { '-' });
        }
        if let Some(target) = self.en_passant_target() {
            key.push_str(&target.to_algebraic());
        } else {
            key.push('-');
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;
    use crate::position::Square;

    fn sq(row: u8, col: u8) -> Square {
        Square { row, col }
    }

    #[test]
    fn key_distinguishes_rights_en_passant_and_turn() {
        let fresh = ChessBoard::new().transposition_key();

        // identical cells, en-passant target armed
        let mut armed = ChessBoard::new();
        armed.set_en_passant_target(Some(sq(4, 4)));
        assert_ne!(armed.transposition_key(), fresh);

        // identical cells, one castling right gone
        let mut no_castle = ChessBoard::new();
        let mut rights = no_castle.rights();
        rights.white_right = false;
        no_castle.set_rights(rights);
        assert_ne!(no_castle.transposition_key(), fresh);

        // identical cells, other side to move
        let mut black_turn = ChessBoard::new();
        black_turn.set_turn(Color::Black);
        assert_ne!(black_turn.transposition_key(), fresh);

        // a move and its undo restore the key exactly
        let mut board = ChessBoard::new();
        board.apply(Move::new(sq(6, 4), sq(4, 4)));
        assert_ne!(board.transposition_key(), fresh);
        board.undo();
        assert_eq!(board.transposition_key(), fresh);
    }

    #[test]
    fn trait_round_trip_matches_inherent_ops() {
        let mut board = ChessBoard::new();
        let moves = GameState::legal_moves(&board);
        assert_eq!(moves.len(), 20);
        let key = board.transposition_key();
        GameState::apply(&mut board, &moves[0]);
        GameState::undo(&mut board);
        assert_eq!(board.transposition_key(), key);
        assert!(board.maximizing_turn());
    }
}
