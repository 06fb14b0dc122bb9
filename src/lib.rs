//! # Connect Four Engine
//!
//! A Connect Four bot with three strengths: random, one-ply tactical, and an
//! iterative-deepening negamax search backed by a transposition cache and a
//! read-only opening book.
//!
//! ## Modules
//!
//! - [`game`]: Board primitives, players, and a turn-tracking game state
//! - [`ai`]: Agents, heuristic evaluator, search, cache, opening book, move selector
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
