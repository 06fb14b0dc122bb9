use crate::config::AppConfig;
use crate::game::{Board, Player};

use super::agent::Agent;
use super::negamax::{SearchAgent, SearchConfig};
use super::opening_book::OpeningBook;
use super::random::RandomAgent;
use super::tactical::TacticalAgent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Map a menu level (1-3). Anything else plays at medium strength.
    pub fn from_level(level: u8) -> Self {
        match level {
            1 => Difficulty::Easy,
            3 => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

/// Entry point for the game loop: picks a column at the requested difficulty.
pub struct MoveSelector {
    easy: RandomAgent,
    medium: TacticalAgent,
    hard: SearchAgent,
}

impl MoveSelector {
    pub fn new(search: SearchConfig, book: OpeningBook, seed: Option<u64>) -> Self {
        MoveSelector {
            easy: RandomAgent::from_seed(seed),
            medium: TacticalAgent::new(RandomAgent::from_seed(seed.map(|s| s.wrapping_add(1)))),
            hard: SearchAgent::new(search, book),
        }
    }

    /// Build from application config, loading the opening book if configured.
    pub fn from_config(config: &AppConfig) -> Self {
        let book = OpeningBook::load_or_disabled(&config.book);
        Self::new(config.search.clone(), book, config.seed)
    }

    /// Choose a legal column for `player`, or `None` when the board is full.
    pub fn choose_column(&mut self, board: &Board, player: Player, difficulty: Difficulty) -> Option<usize> {
        let agent: &mut dyn Agent = match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        };
        let choice = agent.select_column(board, player);
        log::trace!("{} agent chose {choice:?} at ply {}", agent.name(), board.ply());
        choice
    }

    /// Reset per-game state such as the transposition cache.
    pub fn new_game(&mut self) {
        self.easy.new_game();
        self.medium.new_game();
        self.hard.new_game();
    }
}
