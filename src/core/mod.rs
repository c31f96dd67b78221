//! Core types: colours, actions, grid helpers, RNG, errors, records.
//!
//! This module contains the building blocks shared by every game. Game
//! rules live in `games`; this module knows nothing about any one of them
//! except through `GameRecord`.

pub mod action;
pub mod board;
pub mod color;
pub mod error;
pub mod record;
pub mod rng;

pub use action::ActionId;
pub use color::{Color, ColorMap};
pub use error::{GameError, Result};
pub use record::GameRecord;
pub use rng::GameRng;
