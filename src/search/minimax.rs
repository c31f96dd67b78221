//! Exhaustive negamax search.
//!
//! Values are subjective rewards: a child's value is negated on the way up.
//! The root collects every action reaching the best value, so callers can
//! tell "the only winning move" from "one of several draws".

use serde::{Deserialize, Serialize};

use crate::core::ActionId;
use crate::rules::BoardGame;

/// Root children within this margin of the best value are kept by
/// `alpha_beta`.
const TIE_MARGIN: f32 = 1e-4;

/// Best actions at the root and their value for the side to move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Every root action achieving `value`, in generation order.
    pub best_actions: Vec<ActionId>,
    /// Game value from the mover's view.
    pub value: f32,
}

impl SearchResult {
    fn terminal<G: BoardGame>(state: &G) -> Self {
        Self {
            best_actions: Vec::new(),
            value: state.reward(true),
        }
    }

    fn offer(&mut self, action: ActionId, value: f32) {
        if value > self.value {
            self.value = value;
            self.best_actions.clear();
        }
        if value >= self.value {
            self.best_actions.push(action);
        }
    }
}

/// Plain negamax over the whole game tree.
pub fn minimax<G: BoardGame>(state: &G) -> SearchResult {
    if state.is_terminal() {
        return SearchResult::terminal(state);
    }
    let mut nodes = 1u64;
    let mut result = SearchResult {
        best_actions: Vec::new(),
        value: f32::NEG_INFINITY,
    };
    for action in state.legal_actions() {
        let mut child = state.clone();
        child.play(action);
        let value = -minimax_value(&child, &mut nodes);
        result.offer(action, value);
    }
    tracing::debug!(game = state.name(), nodes, value = result.value, "minimax finished");
    result
}

fn minimax_value<G: BoardGame>(state: &G, nodes: &mut u64) -> f32 {
    *nodes += 1;
    if state.is_terminal() {
        return state.reward(true);
    }
    let actions = state.legal_actions();
    if actions.is_empty() {
        return state.reward(true);
    }
    actions
        .into_iter()
        .map(|action| {
            let mut child = state.clone();
            child.play(action);
            -minimax_value(&child, nodes)
        })
        .fold(f32::NEG_INFINITY, f32::max)
}

/// Negamax with alpha-beta pruning.
///
/// Each root child is searched with the window `(-inf, -best + margin)`,
/// so children tying the best value are still proven exactly and kept.
pub fn alpha_beta<G: BoardGame>(state: &G) -> SearchResult {
    if state.is_terminal() {
        return SearchResult::terminal(state);
    }
    let mut nodes = 1u64;
    let mut result = SearchResult {
        best_actions: Vec::new(),
        value: f32::NEG_INFINITY,
    };
    for action in state.legal_actions() {
        let mut child = state.clone();
        child.play(action);
        let beta = -result.value + TIE_MARGIN;
        let value = -alpha_beta_value(&child, f32::NEG_INFINITY, beta, &mut nodes);
        result.offer(action, value);
    }
    tracing::debug!(game = state.name(), nodes, value = result.value, "alpha-beta finished");
    result
}

fn alpha_beta_value<G: BoardGame>(state: &G, mut alpha: f32, beta: f32, nodes: &mut u64) -> f32 {
    *nodes += 1;
    if state.is_terminal() {
        return state.reward(true);
    }
    let actions = state.legal_actions();
    if actions.is_empty() {
        return state.reward(true);
    }
    for action in actions {
        let mut child = state.clone();
        child.play(action);
        alpha = alpha.max(-alpha_beta_value(&child, -beta, -alpha, nodes));
        if alpha >= beta {
            return alpha;
        }
    }
    alpha
}
