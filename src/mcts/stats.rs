//! Per-search counters for diagnostics and tuning.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Counters collected during one `MCTSSearch::search` call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub iterations: u32,

    /// Nodes added to the tree.
    pub nodes_expanded: u32,

    /// Rollouts run from a fresh leaf.
    pub simulations: u32,

    /// Iterations that ended on a finished game inside the tree.
    pub terminal_hits: u32,

    /// Deepest node created.
    pub max_depth: u16,

    /// Wall time of the search in microseconds.
    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    #[must_use]
    pub fn simulations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.simulations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Nodes expanded per iteration.
    #[must_use]
    pub fn avg_nodes_per_iteration(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.nodes_expanded as f64 / self.iterations as f64
        }
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} iterations, {} nodes, {} rollouts, depth {}, {:.0} it/s",
            self.iterations,
            self.nodes_expanded,
            self.simulations,
            self.max_depth,
            self.iterations_per_second()
        )
    }
}
