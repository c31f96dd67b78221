//! Neural network integration.
//!
//! - `EncodedState`: feature planes produced by `BoardGame::feature`
//! - `PolicyNetwork`: prior source for PUCT selection in MCTS
//! - `UniformPolicy`: baseline prior

pub mod traits;

pub use traits::{EncodedState, PolicyNetwork, UniformPolicy};
