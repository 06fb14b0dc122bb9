//! Core Connect Four game logic: board primitives, player types, and a game
//! state machine for collaborators that own turn order.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, CELLS, CENTER, COLS, DIRECTIONS, ROWS};
pub use player::Player;
pub use state::{GameOutcome, GameState, MoveError};
