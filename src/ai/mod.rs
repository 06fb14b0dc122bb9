mod agent;
mod budget;
pub mod heuristic;
pub mod negamax;
pub mod opening_book;
mod random;
mod selector;
pub mod state_encoding;
mod tactical;
pub mod transposition;

pub use agent::Agent;
pub use budget::SearchBudget;
pub use heuristic::{Heuristic, ThreatHeuristic};
pub use negamax::{SearchAgent, SearchConfig, SearchReport, MOVE_ORDER, WIN_SCORE};
pub use opening_book::{BookConfig, BookEntry, BookOutcome, OpeningBook};
pub use random::RandomAgent;
pub use selector::{Difficulty, MoveSelector};
pub use state_encoding::{fingerprint, EncodedPosition};
pub use tactical::TacticalAgent;
pub use transposition::{Bound, TranspositionTable};
