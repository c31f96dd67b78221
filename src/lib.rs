//! # games
//!
//! Two-player board game engines for search and RL training:
//! TicTacToe, FlipTicTacToe, Reversi, AnimalShogi, Go and Geister.
//!
//! ## Design Principles
//!
//! 1. **One contract**: every engine implements `rules::BoardGame`; search,
//!    the harness and the Python bindings see nothing else.
//!
//! 2. **Positions are values**: a game value is its current position.
//!    Cloning is cheap (repetition history lives in `im` persistent sets),
//!    so search clones instead of undoing.
//!
//! 3. **Dense action ids**: each game numbers its moves in
//!    `0..action_length()` and owns the notation for them.
//!
//! ## Modules
//!
//! - `core`: colours, action ids, grid helpers, RNG, errors, records
//! - `rules`: the `BoardGame` trait and `GameResult`
//! - `games`: the engines and the `GameKind` registry
//! - `nn`: feature planes and the policy network seam
//! - `search`: exact minimax / alpha-beta
//! - `mcts`: Monte Carlo Tree Search
//! - `harness`: the smoke harness and playout drivers
//! - `python`: pyo3 bindings (feature `python`)

pub mod core;
pub mod games;
pub mod harness;
pub mod mcts;
pub mod nn;
pub mod rules;
pub mod search;

#[cfg(feature = "python")]
pub mod python;

pub use crate::core::{ActionId, Color, ColorMap, GameError, GameRecord, GameRng, Result};

pub use crate::games::{AnyGame, GameKind};

pub use crate::rules::{BoardGame, GameResult};

pub use crate::mcts::{MCTSConfig, MCTSSearch, SearchStats};

pub use crate::search::{alpha_beta, minimax, SearchResult};
