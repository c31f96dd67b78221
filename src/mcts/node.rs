//! Search tree nodes for two-player zero-sum games.
//!
//! Every edge keeps a single value sum, scored from the view of the colour
//! that chooses it. A playout produces one `Outcome` (Black's score) and
//! each edge on the path converts it for its own mover, so the same tree
//! serves both sides without storing a value per colour.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ActionId, Color};
use crate::rules::GameResult;

/// Index into the `MCTSTree` arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Black's share of one playout, in `[0, 1]`; White gets the rest.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome(pub f64);

impl Outcome {
    /// Drawn game, or a rollout cut off before the end.
    pub const DRAW: Outcome = Outcome(0.5);

    /// Score for `color`: 1 for a win, 0 for a loss.
    #[inline]
    #[must_use]
    pub fn for_color(self, color: Color) -> f64 {
        match color {
            Color::Black => self.0,
            Color::White => 1.0 - self.0,
        }
    }
}

impl From<GameResult> for Outcome {
    fn from(result: GameResult) -> Self {
        match result {
            GameResult::Winner(Color::Black) => Outcome(1.0),
            GameResult::Winner(Color::White) => Outcome(0.0),
            GameResult::Draw => Outcome::DRAW,
        }
    }
}

/// Move from a node, with the statistics of the subtree behind it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub action: ActionId,
    /// Set once the child has been allocated.
    pub child: Option<NodeId>,
    pub visits: u32,
    /// Sum of playout scores for the colour choosing this edge.
    pub value_sum: f64,
    /// PUCT prior, 1.0 without a network.
    pub prior: f32,
}

impl Edge {
    #[must_use]
    pub fn new(action: ActionId, prior: f32) -> Self {
        Self {
            action,
            child: None,
            visits: 0,
            value_sum: 0.0,
            prior,
        }
    }

    /// Mean score for the mover, 0 when unvisited.
    #[inline]
    #[must_use]
    pub fn q(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / f64::from(self.visits)
        }
    }

    /// Count one playout through this edge.
    pub fn record(&mut self, mover: Color, outcome: Outcome) {
        self.visits += 1;
        self.value_sum += outcome.for_color(mover);
    }
}

/// A position in the tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode {
    pub to_move: Color,
    /// Plies below the root.
    pub depth: u16,
    pub visits: u32,
    /// Final outcome when the game is over here.
    pub terminal: Option<Outcome>,
    /// One edge per legal action at expansion time.
    pub edges: SmallVec<[Edge; 8]>,
}

impl MCTSNode {
    #[must_use]
    pub fn new(to_move: Color, depth: u16) -> Self {
        Self {
            to_move,
            depth,
            visits: 0,
            terminal: None,
            edges: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn unexpanded_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.child.is_none())
            .map(|(i, _)| i)
    }

    #[must_use]
    pub fn has_unexpanded(&self) -> bool {
        self.unexpanded_edges().next().is_some()
    }

    /// Most visited edge; the first one wins ties.
    #[must_use]
    pub fn most_visited(&self) -> Option<&Edge> {
        self.edges
            .iter()
            .reduce(|best, e| if e.visits > best.visits { e } else { best })
    }

    /// Mean score over all edges for the colour to move, 0.5 when unsearched.
    #[must_use]
    pub fn value(&self) -> f64 {
        let (sum, visits) = self
            .edges
            .iter()
            .fold((0.0, 0u32), |(sum, visits), e| (sum + e.value_sum, visits + e.visits));
        if visits == 0 {
            Outcome::DRAW.0
        } else {
            sum / f64::from(visits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_per_color() {
        let win = Outcome::from(GameResult::Winner(Color::White));
        assert_eq!(win.for_color(Color::White), 1.0);
        assert_eq!(win.for_color(Color::Black), 0.0);

        let draw = Outcome::from(GameResult::Draw);
        assert_eq!(draw, Outcome::DRAW);
        assert_eq!(draw.for_color(Color::Black), draw.for_color(Color::White));
    }

    #[test]
    fn test_edge_records_for_mover() {
        let mut edge = Edge::new(ActionId(4), 1.0);
        assert_eq!(edge.q(), 0.0);
        assert!(edge.child.is_none());

        // Three Black wins and a White win, seen by White.
        for score in [1.0, 1.0, 1.0, 0.0] {
            edge.record(Color::White, Outcome(score));
        }
        assert_eq!(edge.visits, 4);
        assert_eq!(edge.q(), 0.25);
    }

    #[test]
    fn test_unexpanded_edges() {
        let mut node = MCTSNode::new(Color::Black, 0);
        assert!(!node.has_unexpanded());

        for a in 1..=3 {
            node.edges.push(Edge::new(ActionId(a), 1.0));
        }
        node.edges[1].child = Some(NodeId(10));

        assert!(node.has_unexpanded());
        assert_eq!(node.unexpanded_edges().collect::<Vec<_>>(), vec![0, 2]);

        node.edges[0].child = Some(NodeId(11));
        node.edges[2].child = Some(NodeId(12));
        assert!(!node.has_unexpanded());
    }

    #[test]
    fn test_most_visited_prefers_first_on_tie() {
        let mut node = MCTSNode::new(Color::Black, 0);
        assert!(node.most_visited().is_none());

        for (a, visits) in [(7, 5), (3, 5), (1, 2)] {
            let mut edge = Edge::new(ActionId(a), 1.0);
            edge.visits = visits;
            node.edges.push(edge);
        }
        assert_eq!(node.most_visited().map(|e| e.action), Some(ActionId(7)));
    }

    #[test]
    fn test_node_value() {
        let mut node = MCTSNode::new(Color::White, 0);
        assert_eq!(node.value(), 0.5);

        node.edges.push(Edge::new(ActionId(0), 1.0));
        node.edges.push(Edge::new(ActionId(1), 1.0));
        node.edges[0].record(Color::White, Outcome(0.0));
        node.edges[1].record(Color::White, Outcome(0.0));
        node.edges[1].record(Color::White, Outcome(1.0));

        assert!((node.value() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_terminal_node() {
        let mut node = MCTSNode::new(Color::Black, 3);
        assert!(!node.is_terminal());
        node.terminal = Some(Outcome::from(GameResult::Winner(Color::White)));
        assert!(node.is_terminal());
    }

    #[test]
    fn test_serialization() {
        let mut node = MCTSNode::new(Color::White, 2);
        node.edges.push(Edge::new(ActionId(5), 0.5));
        node.visits = 100;

        let json = serde_json::to_string(&node).unwrap();
        let restored: MCTSNode = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.to_move, Color::White);
        assert_eq!(restored.visits, 100);
        assert_eq!(restored.edges[0].action, ActionId(5));
        assert_eq!(restored.edges[0].prior, 0.5);
    }
}
