//! Engine contract shared by all games.
//!
//! Games implement `BoardGame` to define:
//! - The initial position and its display
//! - Legal actions and their notation
//! - How actions modify the position
//! - Terminal detection and rewards
//! - Feature planes for network input

pub mod engine;

pub use engine::{BoardGame, GameResult};
