//! MCTS policies for selection and simulation.
//!
//! - `SelectionPolicy`: which edge to descend along (UCB1, PUCT)
//! - `SimulationPolicy`: how to finish a game from a new leaf
//!
//! Edge values are already scored for the colour choosing the edge, so a
//! policy only ever maximises.

use crate::core::GameRng;
use crate::rules::BoardGame;

use super::config::MCTSConfig;
use super::node::{MCTSNode, Outcome};

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which edge to explore.
pub trait SelectionPolicy: Send + Sync {
    /// Index of the edge to follow out of a fully expanded `node`.
    fn select(&self, node: &MCTSNode, config: &MCTSConfig) -> usize;
}

/// UCB1: `Q(a) + c * sqrt(ln(N) / n(a))`.
#[derive(Clone, Debug, Default)]
pub struct UCB1;

impl SelectionPolicy for UCB1 {
    fn select(&self, node: &MCTSNode, config: &MCTSConfig) -> usize {
        let ln_parent = f64::from(node.visits.max(1)).ln();

        argmax(node.edges.iter().map(|edge| {
            if edge.visits == 0 {
                return f64::INFINITY;
            }
            edge.q() + config.exploration_constant * (ln_parent / f64::from(edge.visits)).sqrt()
        }))
    }
}

/// PUCT: `Q(a) + c * P(a) * sqrt(N) / (1 + n(a))`.
///
/// Priors come from the edge, filled in by `MCTSSearch` from a
/// `PolicyNetwork` when one is attached.
#[derive(Clone, Debug, Default)]
pub struct PUCT;

impl SelectionPolicy for PUCT {
    fn select(&self, node: &MCTSNode, config: &MCTSConfig) -> usize {
        let sqrt_parent = f64::from(node.visits.max(1)).sqrt();

        argmax(node.edges.iter().map(|edge| {
            edge.q()
                + config.exploration_constant * f64::from(edge.prior) * sqrt_parent
                    / (1.0 + f64::from(edge.visits))
        }))
    }
}

/// Index of the first maximal score, 0 when empty.
fn argmax(scores: impl Iterator<Item = f64>) -> usize {
    scores
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best_i, best), (i, s)| {
            if s > best {
                (i, s)
            } else {
                (best_i, best)
            }
        })
        .0
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Policy for running rollouts from a leaf.
pub trait SimulationPolicy<G: BoardGame>: Send + Sync {
    /// Play `state` forward to an outcome.
    ///
    /// The state is consumed by the rollout.
    fn simulate(&self, state: &mut G, rng: &mut GameRng, max_depth: u32) -> Outcome;
}

/// Uniformly random rollouts.
///
/// Plays random legal actions, each followed by a chance event, until the
/// game ends or `max_depth` plies have been played. A cut-off rollout
/// scores as a draw.
#[derive(Clone, Debug, Default)]
pub struct RandomSimulation;

impl<G: BoardGame> SimulationPolicy<G> for RandomSimulation {
    fn simulate(&self, state: &mut G, rng: &mut GameRng, max_depth: u32) -> Outcome {
        let mut depth = 0;

        loop {
            if let Some(result) = state.result() {
                return result.into();
            }
            if max_depth > 0 && depth >= max_depth {
                return Outcome::DRAW;
            }

            let actions = state.legal_actions();
            let Some(&action) = rng.choose(&actions) else {
                return Outcome::DRAW;
            };
            state.play(action);
            state.chance(rng);

            depth += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ActionId, Color};
    use crate::games::{FlipTicTacToe, TicTacToe};
    use crate::mcts::node::Edge;
    use crate::rules::GameResult;

    /// Edges with Black-to-move scores 0.8 over 100 visits, 0.7 over 10,
    /// and one unvisited.
    fn make_test_node() -> MCTSNode {
        let mut node = MCTSNode::new(Color::Black, 0);
        for (action, visits, sum) in [(1, 100, 80.0), (2, 10, 7.0), (3, 0, 0.0)] {
            let mut edge = Edge::new(ActionId(action), 1.0);
            edge.visits = visits;
            edge.value_sum = sum;
            node.edges.push(edge);
        }
        node.visits = 110;
        node
    }

    #[test]
    fn test_ucb1_selects_unvisited() {
        let node = make_test_node();
        assert_eq!(UCB1.select(&node, &MCTSConfig::default()), 2);
    }

    #[test]
    fn test_ucb1_without_exploration_is_greedy() {
        let mut node = make_test_node();
        node.edges.truncate(2);
        let config = MCTSConfig::default().with_exploration(0.0);

        assert_eq!(UCB1.select(&node, &config), 0);
        node.edges[1].value_sum = 9.0;
        assert_eq!(UCB1.select(&node, &config), 1);
    }

    #[test]
    fn test_puct_uses_prior() {
        let mut node = MCTSNode::new(Color::Black, 0);
        for (action, prior) in [(1, 0.1), (2, 0.9)] {
            let mut edge = Edge::new(ActionId(action), prior);
            edge.visits = 10;
            edge.value_sum = 5.0;
            node.edges.push(edge);
        }
        node.visits = 20;

        assert_eq!(PUCT.select(&node, &MCTSConfig::default()), 1);
    }

    #[test]
    fn test_argmax_first_on_tie() {
        assert_eq!(argmax([1.0, 3.0, 3.0].into_iter()), 1);
        assert_eq!(argmax(std::iter::empty()), 0);
    }

    #[test]
    fn test_random_simulation_finishes() {
        let mut rng = GameRng::new(3);
        for _ in 0..20 {
            let mut state = TicTacToe::new();
            let outcome = RandomSimulation.simulate(&mut state, &mut rng, 0);

            assert!(state.is_terminal());
            let result = state.result().unwrap();
            assert_eq!(outcome, Outcome::from(result));
            if let GameResult::Winner(color) = result {
                assert_eq!(outcome.for_color(color), 1.0);
            }
        }
    }

    #[test]
    fn test_random_simulation_depth_limit() {
        let mut state = TicTacToe::new();
        let outcome = RandomSimulation.simulate(&mut state, &mut GameRng::new(0), 2);

        assert_eq!(state.record().len(), 2);
        assert_eq!(outcome, Outcome::DRAW);
    }

    #[test]
    fn test_random_simulation_applies_chance() {
        let mut state = FlipTicTacToe::new();
        RandomSimulation.simulate(&mut state, &mut GameRng::new(11), 0);

        assert!(state.is_terminal());
        assert_eq!(state.flips().len(), state.record().len());
    }
}
