//! Monte Carlo Tree Search over any `BoardGame`.
//!
//! ## Overview
//!
//! - **Two-player zero-sum**: a playout yields one `Outcome` (Black's
//!   score) and each edge keeps it from the view of the colour choosing it
//! - **Chance events**: `chance` runs after every play, both in the tree
//!   and in rollouts, so FlipTicTacToe searches like the others
//! - **Configurable policies**: selection (UCB1/PUCT) and simulation
//! - **Priors**: an optional `PolicyNetwork` fills PUCT priors
//! - **Serializable**: tree and config can be saved for inspection
//!
//! ## Usage
//!
//! ```rust
//! use games::games::Reversi;
//! use games::mcts::{MCTSConfig, MCTSSearch};
//! use games::rules::BoardGame;
//!
//! let state = Reversi::new();
//! let mut search = MCTSSearch::new(MCTSConfig::default().with_seed(7));
//!
//! let action = search.search(&state, 200).unwrap();
//! assert!(state.is_legal(action));
//!
//! let probs = search.action_probabilities();
//! assert_eq!(probs.len(), state.legal_actions().len());
//! ```
//!
//! ## Custom Policies
//!
//! ```rust
//! use games::games::Go;
//! use games::mcts::{MCTSConfig, MCTSSearch, PUCT};
//! use games::nn::UniformPolicy;
//!
//! let search: MCTSSearch<Go> = MCTSSearch::new(MCTSConfig::default())
//!     .with_selection(PUCT)
//!     .with_policy_network(UniformPolicy);
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

pub use config::MCTSConfig;
pub use node::{Edge, MCTSNode, NodeId, Outcome};
pub use policy::{RandomSimulation, SelectionPolicy, SimulationPolicy, PUCT, UCB1};
pub use search::MCTSSearch;
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
