use crate::game::{Board, Player};

/// Universal interface for the bot's move-choosing strategies.
pub trait Agent {
    /// Select a column for `player` to drop into, or `None` when no column is
    /// open. A returned column is always legal on `board`.
    fn select_column(&mut self, board: &Board, player: Player) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Forget anything carried over from a previous game.
    fn new_game(&mut self) {}
}
