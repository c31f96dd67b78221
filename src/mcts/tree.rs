//! Node arena for one search.
//!
//! The root is always the first node; children are appended as they are
//! expanded and the whole arena is dropped at the start of every search.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::node::{MCTSNode, NodeId};
use crate::core::{ActionId, Color};

/// Flat arena of search nodes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree {
    nodes: Vec<MCTSNode>,
}

impl MCTSTree {
    pub const ROOT: NodeId = NodeId(0);

    /// Tree holding a bare root, with room for `capacity` nodes.
    #[must_use]
    pub fn new(to_move: Color, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MCTSNode::new(to_move, 0));
        Self { nodes }
    }

    /// Start over from a bare root, keeping the allocation.
    pub fn reset(&mut self, to_move: Color) {
        self.nodes.clear();
        self.nodes.push(MCTSNode::new(to_move, 0));
    }

    pub fn push(&mut self, node: MCTSNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn root_node(&self) -> &MCTSNode {
        &self[Self::ROOT]
    }

    /// Most visited line from the root, stopping at the first leaf.
    #[must_use]
    pub fn principal_variation(&self) -> Vec<ActionId> {
        let mut line = Vec::new();
        let mut node = self.root_node();
        while let Some(edge) = node.most_visited().filter(|e| e.visits > 0) {
            line.push(edge.action);
            match edge.child {
                Some(child) => node = &self[child],
                None => break,
            }
        }
        line
    }

    /// Shape of the tree, in one pass over the arena.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        self.nodes.iter().fold(TreeStats::default(), |mut stats, node| {
            stats.node_count += 1;
            stats.max_depth = stats.max_depth.max(node.depth);
            stats.terminal_count += usize::from(node.is_terminal());
            stats.total_edges += node.edges.len();
            stats.expanded_edges += node.edges.iter().filter(|e| e.child.is_some()).count();
            stats
        })
    }
}

impl Index<NodeId> for MCTSTree {
    type Output = MCTSNode;

    fn index(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for MCTSTree {
    fn index_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.index()]
    }
}

/// Counts describing a finished search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,
    pub terminal_count: usize,
    pub total_edges: usize,
    pub expanded_edges: usize,
}

impl TreeStats {
    /// Share of edges that lead to an allocated child.
    #[must_use]
    pub fn expansion_ratio(&self) -> f64 {
        if self.total_edges == 0 {
            0.0
        } else {
            self.expanded_edges as f64 / self.total_edges as f64
        }
    }
}
