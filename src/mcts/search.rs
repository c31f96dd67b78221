//! Core MCTS search algorithm.
//!
//! Every node is expanded with all legal actions of the colour to move;
//! each edge scores playouts for the colour choosing it.
//! Each iteration replays the path from a clone of the root position and
//! calls `chance` after every play, which makes the tree open-loop for
//! stochastic games: an edge whose action is illegal after a different
//! chance outcome ends the descent with a rollout from where it stands.

use std::time::Instant;

use crate::core::{ActionId, Color, GameRng};
use crate::nn::PolicyNetwork;
use crate::rules::BoardGame;

use super::config::MCTSConfig;
use super::node::{Edge, MCTSNode, NodeId, Outcome};
use super::policy::{RandomSimulation, SelectionPolicy, SimulationPolicy, UCB1};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Main MCTS search context.
///
/// Generic over the game type. Owns the tree, the configuration and the
/// policies; `search` can be called repeatedly on different positions.
pub struct MCTSSearch<G: BoardGame> {
    config: MCTSConfig,
    tree: MCTSTree,

    /// Expansion order, rollouts and chance events.
    rng: GameRng,

    selection: Box<dyn SelectionPolicy>,
    simulation: Box<dyn SimulationPolicy<G>>,

    /// Prior source for new edges. Without one every prior is 1.0.
    policy_network: Option<Box<dyn PolicyNetwork>>,

    stats: SearchStats,
}

impl<G: BoardGame> MCTSSearch<G> {
    pub fn new(config: MCTSConfig) -> Self {
        let rng = GameRng::new(config.seed);
        let capacity = config.max_nodes.min(1 << 16);

        Self {
            tree: MCTSTree::new(Color::Black, capacity),
            config,
            rng,
            selection: Box::new(UCB1),
            simulation: Box::new(RandomSimulation),
            policy_network: None,
            stats: SearchStats::default(),
        }
    }

    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    pub fn with_simulation<S: SimulationPolicy<G> + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Take edge priors from `network`, normalised over the legal actions.
    pub fn with_policy_network<P: PolicyNetwork + 'static>(mut self, network: P) -> Self {
        self.policy_network = Some(Box::new(network));
        self
    }

    /// Run MCTS from `state` for up to `iterations` iterations.
    ///
    /// Returns `None` for a finished game or a position without legal
    /// actions. The RNG restarts from the configured seed, so the same
    /// position always yields the same search.
    pub fn search(&mut self, state: &G, iterations: u32) -> Option<ActionId> {
        let start = Instant::now();
        self.stats.reset();
        self.rng = GameRng::new(self.config.seed);

        self.tree.reset(state.to_move());
        self.expand_node(MCTSTree::ROOT, state);

        let root_node = self.tree.root_node();
        if root_node.is_terminal() || root_node.edges.is_empty() {
            return None;
        }
        if root_node.edges.len() == 1 {
            return Some(root_node.edges[0].action);
        }

        for _ in 0..iterations {
            self.iteration(state);
            self.stats.iterations += 1;

            if self.tree.len() >= self.config.max_nodes {
                break;
            }
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;
        tracing::debug!(
            game = state.name(),
            nodes = self.tree.len(),
            pv = %state.path_to_string(&self.tree.principal_variation()),
            "mcts search finished: {}",
            self.stats
        );

        self.best_action()
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    fn iteration(&mut self, root_state: &G) {
        let mut state = root_state.clone();
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut current = MCTSTree::ROOT;

        loop {
            if let Some(result) = state.result() {
                self.stats.terminal_hits += 1;
                self.backpropagate(&path, result.into());
                return;
            }

            let node = &self.tree[current];
            if self.config.max_depth > 0 && u32::from(node.depth) >= self.config.max_depth {
                self.backpropagate(&path, Outcome::DRAW);
                return;
            }
            if node.edges.is_empty() {
                self.backpropagate(&path, Outcome::DRAW);
                return;
            }

            let edge_idx = if node.has_unexpanded() {
                self.select_unexpanded(current)
            } else {
                self.selection.select(node, &self.config)
            };

            let edge = &self.tree[current].edges[edge_idx];
            let (action, child) = (edge.action, edge.child);
            if !state.is_legal(action) {
                let outcome = self.simulate(&mut state);
                self.backpropagate(&path, outcome);
                return;
            }

            path.push((current, edge_idx));
            state.play(action);
            state.chance(&mut self.rng);

            let Some(child) = child else {
                self.expand_child(current, edge_idx, &state);
                let outcome = self.simulate(&mut state);
                self.stats.simulations += 1;
                self.backpropagate(&path, outcome);
                return;
            };

            current = child;
        }
    }

    /// Mark `node_id` terminal or give it one edge per legal action.
    fn expand_node(&mut self, node_id: NodeId, state: &G) {
        if let Some(result) = state.result() {
            self.tree[node_id].terminal = Some(result.into());
            return;
        }

        let actions = state.legal_actions();
        let priors = self.priors(state, &actions);

        self.tree[node_id].edges.extend(
            actions
                .into_iter()
                .zip(priors)
                .map(|(action, prior)| Edge::new(action, prior)),
        );

        self.stats.nodes_expanded += 1;
    }

    fn priors(&self, state: &G, actions: &[ActionId]) -> Vec<f32> {
        let Some(network) = &self.policy_network else {
            return vec![1.0; actions.len()];
        };

        let output = network.predict(&state.feature(), state.action_length());
        let mut priors: Vec<f32> = actions
            .iter()
            .map(|a| output.get(a.index()).copied().unwrap_or(0.0).max(0.0))
            .collect();

        let total: f32 = priors.iter().sum();
        if total > 0.0 {
            priors.iter_mut().for_each(|p| *p /= total);
        } else {
            priors.fill(1.0 / actions.len().max(1) as f32);
        }
        priors
    }

    /// Pick an unexpanded edge uniformly at random.
    fn select_unexpanded(&mut self, node_id: NodeId) -> usize {
        let unexpanded: Vec<usize> = self.tree[node_id].unexpanded_edges().collect();
        self.rng.choose(&unexpanded).copied().unwrap_or(0)
    }

    fn expand_child(&mut self, parent_id: NodeId, edge_idx: usize, state: &G) -> NodeId {
        let depth = self.tree[parent_id].depth + 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let child_id = self.tree.push(MCTSNode::new(state.to_move(), depth));
        self.tree[parent_id].edges[edge_idx].child = Some(child_id);

        self.expand_node(child_id, state);
        child_id
    }

    /// Roll out on a forked stream so rollout length does not shift the
    /// tree's own random choices.
    fn simulate(&mut self, state: &mut G) -> Outcome {
        let mut sim_rng = self.rng.fork();
        self.simulation
            .simulate(state, &mut sim_rng, self.config.max_depth)
    }

    /// Credit every edge on `path` from the view of the colour that chose it.
    fn backpropagate(&mut self, path: &[(NodeId, usize)], outcome: Outcome) {
        for &(node_id, edge_idx) in path.iter().rev() {
            let node = &mut self.tree[node_id];
            node.visits += 1;
            let mover = node.to_move;
            node.edges[edge_idx].record(mover, outcome);
        }
    }

    /// Root action by visit count, or sampled with weights
    /// `visits^(1/temperature)` when the temperature is positive.
    fn best_action(&mut self) -> Option<ActionId> {
        let root = self.tree.root_node();

        if self.config.temperature > 0.0 {
            let exponent = 1.0 / self.config.temperature;
            let weights: Vec<f32> = root
                .edges
                .iter()
                .map(|e| (e.visits as f64).powf(exponent) as f32)
                .collect();
            if let Some(idx) = self.rng.choose_weighted(&weights) {
                return Some(root.edges[idx].action);
            }
        }

        root.most_visited().map(|e| e.action)
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn tree(&self) -> &MCTSTree {
        &self.tree
    }

    #[must_use]
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Mean score in `[0, 1]` of the root for the colour to move there.
    #[must_use]
    pub fn root_value(&self) -> f64 {
        self.tree.root_node().value()
    }

    /// Most visited line of play from the root.
    #[must_use]
    pub fn principal_variation(&self) -> Vec<ActionId> {
        self.tree.principal_variation()
    }

    /// Visit count per root action (for training).
    pub fn action_visits(&self) -> Vec<(ActionId, u32)> {
        self.tree
            .root_node()
            .edges
            .iter()
            .map(|e| (e.action, e.visits))
            .collect()
    }

    /// Visit distribution over root actions (for training).
    ///
    /// Uniform when the root was never searched.
    pub fn action_probabilities(&self) -> Vec<(ActionId, f64)> {
        let root = self.tree.root_node();
        let total: u32 = root.edges.iter().map(|e| e.visits).sum();

        if total == 0 {
            let uniform = 1.0 / root.edges.len().max(1) as f64;
            return root.edges.iter().map(|e| (e.action, uniform)).collect();
        }

        root.edges
            .iter()
            .map(|e| (e.action, e.visits as f64 / total as f64))
            .collect()
    }
}
