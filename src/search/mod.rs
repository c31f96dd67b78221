//! Exact game-tree search for small games.
//!
//! `minimax` and `alpha_beta` return the same `SearchResult`; the latter
//! visits far fewer nodes. Both clone positions instead of undoing moves,
//! so they work on every engine. For anything larger than TicTacToe use
//! `mcts`.

pub mod minimax;

pub use minimax::{alpha_beta, minimax, SearchResult};
