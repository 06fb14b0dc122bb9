use crate::game::{Board, Player};

use super::agent::Agent;
use super::negamax::MOVE_ORDER;
use super::random::RandomAgent;

/// One-ply agent: win if possible, otherwise block, otherwise the most central
/// open column.
pub struct TacticalAgent {
    fallback: RandomAgent,
}

impl TacticalAgent {
    pub fn new(fallback: RandomAgent) -> Self {
        TacticalAgent { fallback }
    }
}

impl Default for TacticalAgent {
    fn default() -> Self {
        Self::new(RandomAgent::new())
    }
}

impl Agent for TacticalAgent {
    fn select_column(&mut self, board: &Board, player: Player) -> Option<usize> {
        board
            .winning_column(player.to_cell(), &MOVE_ORDER)
            .or_else(|| board.winning_column(player.other().to_cell(), &MOVE_ORDER))
            .or_else(|| MOVE_ORDER.into_iter().find(|&col| !board.is_column_full(col)))
            .or_else(|| self.fallback.select_column(board, player))
    }

    fn name(&self) -> &str {
        "Tactical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;

    fn agent() -> TacticalAgent {
        TacticalAgent::new(RandomAgent::seeded(3))
    }

    #[test]
    fn takes_win_before_block() {
        let mut board = Board::new();
        for col in 0..3 {
            board.drop_piece(col, Cell::Yellow).unwrap();
            board.drop_piece(col, Cell::Red).unwrap();
        }
        // Red's row-1 threat in column 3 is not playable yet; Yellow wins there now.
        assert_eq!(agent().select_column(&board, Player::Yellow), Some(3));
    }

    #[test]
    fn blocks_vertical_threat() {
        let mut board = Board::new();
        for _ in 0..3 {
            board.drop_piece(5, Cell::Red).unwrap();
        }
        board.drop_piece(0, Cell::Yellow).unwrap();
        assert_eq!(agent().select_column(&board, Player::Yellow), Some(5));
    }

    #[test]
    fn prefers_center_when_quiet() {
        assert_eq!(agent().select_column(&Board::new(), Player::Red), Some(3));

        let mut board = Board::new();
        for i in 0..6 {
            let cell = if i % 2 == 0 { Cell::Red } else { Cell::Yellow };
            board.drop_piece(3, cell).unwrap();
        }
        assert_eq!(agent().select_column(&board, Player::Red), Some(2));
    }

    #[test]
    fn no_move_on_full_board() {
        let mut board = Board::new();
        for col in 0..7 {
            for _ in 0..6 {
                board.drop_piece(col, Cell::Red).unwrap();
            }
        }
        assert_eq!(agent().select_column(&board, Player::Yellow), None);
    }
}
