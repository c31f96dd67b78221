//! MCTS integration tests across the engines.

use games::core::{Color, GameRng};
use games::games::{AnimalShogi, FlipTicTacToe, Geister, Go, GoConfig, Reversi, TicTacToe};
use games::mcts::{MCTSConfig, MCTSSearch, MCTSTree, PUCT};
use games::nn::UniformPolicy;
use games::rules::BoardGame;
use games::{AnyGame, GameKind};

// =============================================================================
// Basic Search Tests
// =============================================================================

#[test]
fn test_mcts_returns_legal_action_for_every_game() {
    for kind in GameKind::ALL {
        let state = kind.create();
        let mut search: MCTSSearch<AnyGame> = MCTSSearch::new(MCTSConfig::default());

        let action = search.search(&state, 100);

        let action = action.unwrap_or_else(|| panic!("{kind}: no action"));
        assert!(state.is_legal(action), "{kind}: illegal {action}");
    }
}

#[test]
fn test_mcts_with_low_iterations() {
    let state = Reversi::new();
    let mut search = MCTSSearch::new(MCTSConfig::default());

    // Even with few iterations, should return something
    assert!(search.search(&state, 5).is_some());
}

#[test]
fn test_mcts_concrete_engine_matches_any_game() {
    let config = MCTSConfig::default().with_seed(9);
    let direct = MCTSSearch::new(config.clone()).search(&AnimalShogi::new(), 200);
    let wrapped = MCTSSearch::new(config).search(&GameKind::AnimalShogi.create(), 200);

    assert_eq!(direct, wrapped);
}

// =============================================================================
// Determinism Tests
// =============================================================================

#[test]
fn test_mcts_deterministic_with_seed() {
    let state = Geister::with_seed(4);
    let config = MCTSConfig::default().with_seed(12345);

    let mut search1 = MCTSSearch::new(config.clone());
    let mut search2 = MCTSSearch::new(config);

    let action1 = search1.search(&state, 200);
    let action2 = search2.search(&state, 200);

    assert_eq!(action1, action2, "Same seed should produce same action");
    assert_eq!(search1.action_visits(), search2.action_visits());
}

#[test]
fn test_mcts_chance_game_deterministic() {
    let mut state = FlipTicTacToe::new();
    state.plays("A1").unwrap();
    state.chance(&mut GameRng::new(1));

    let config = MCTSConfig::default().with_seed(5);
    let mut search1 = MCTSSearch::new(config.clone());
    let mut search2 = MCTSSearch::new(config);

    assert_eq!(search1.search(&state, 300), search2.search(&state, 300));
    assert_eq!(search1.action_visits(), search2.action_visits());
}

// =============================================================================
// Statistics Tests
// =============================================================================

#[test]
fn test_mcts_statistics() {
    let mut search = MCTSSearch::new(MCTSConfig::default());
    search.search(&Go::new(), 100);

    let stats = search.stats();
    assert_eq!(stats.iterations, 100);
    assert!(stats.simulations > 0);
    assert!(stats.nodes_expanded > 1);
    assert!(stats.max_depth >= 1);
}

#[test]
fn test_mcts_tree_stats() {
    let mut search = MCTSSearch::new(MCTSConfig::default());
    search.search(&Reversi::new(), 300);

    let tree_stats = search.tree().stats();
    assert!(tree_stats.node_count > 1);
    assert!(tree_stats.max_depth > 0);
    assert!(tree_stats.expansion_ratio() > 0.0);
}

#[test]
fn test_principal_variation_replays() {
    let state = Reversi::new();
    let mut search = MCTSSearch::new(MCTSConfig::default());
    let action = search.search(&state, 400).unwrap();

    let pv = search.principal_variation();
    assert_eq!(pv.first(), Some(&action));
    let mut line = state.clone();
    for a in pv {
        line.try_play(a).unwrap();
    }
}

// =============================================================================
// Training Targets
// =============================================================================

#[test]
fn test_action_probabilities_sum_to_one() {
    let state = AnimalShogi::new();
    let mut search = MCTSSearch::new(MCTSConfig::default());
    search.search(&state, 200);

    let probs = search.action_probabilities();
    assert_eq!(probs.len(), state.legal_actions().len());

    let sum: f64 = probs.iter().map(|(_, p)| p).sum();
    assert!((sum - 1.0).abs() < 1e-9, "sum was {sum}");
    assert!(probs.iter().all(|(_, p)| *p >= 0.0));
}

#[test]
fn test_action_visits() {
    let state = Reversi::new();
    let mut search = MCTSSearch::new(MCTSConfig::default());
    search.search(&state, 100);

    let visits = search.action_visits();
    let total: u32 = visits.iter().map(|(_, v)| v).sum();

    assert_eq!(total, 100);
    let actions: Vec<_> = visits.iter().map(|(a, _)| *a).collect();
    assert_eq!(actions, state.legal_actions());
}

// =============================================================================
// Policy Tests
// =============================================================================

#[test]
fn test_mcts_with_puct_and_priors() {
    let state = Go::with_config(GoConfig::new(5)).unwrap();
    let mut search = MCTSSearch::new(MCTSConfig::default())
        .with_selection(PUCT)
        .with_policy_network(UniformPolicy);

    let action = search.search(&state, 200).unwrap();
    assert!(state.is_legal(action));

    let root = search.tree().root_node();
    let prior_sum: f32 = root.edges.iter().map(|e| e.prior).sum();
    assert!((prior_sum - 1.0).abs() < 1e-4);
}

#[test]
fn test_mcts_agrees_with_alpha_beta() {
    // White threatens A2; every other Black move loses at once.
    let mut state = TicTacToe::new();
    state.plays("B2 A1 C3 A3").unwrap();
    let best = games::alpha_beta(&state);

    let mut search = MCTSSearch::new(MCTSConfig::default());
    let action = search.search(&state, 2000).unwrap();
    assert!(best.best_actions.contains(&action), "{}", state.action_to_string(action));
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_mcts_max_depth() {
    let config = MCTSConfig::default().with_max_depth(3);
    let mut search = MCTSSearch::new(config);
    search.search(&Reversi::new(), 300);

    assert!(search.tree().stats().max_depth <= 3);
}

#[test]
fn test_mcts_temperature_sampling() {
    let state = Reversi::new();
    let config = MCTSConfig::default().with_temperature(1.0);
    let mut search = MCTSSearch::new(config);

    for _ in 0..5 {
        let action = search.search(&state, 50).unwrap();
        assert!(state.is_legal(action));
    }
}

#[test]
fn test_mcts_config_serialization() {
    let config = MCTSConfig::default().with_seed(777).with_exploration(0.5);
    let json = serde_json::to_string(&config).unwrap();
    let restored: MCTSConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, restored);
}

#[test]
fn test_mcts_tree_serialization() {
    let mut search = MCTSSearch::new(MCTSConfig::default());
    search.search(&TicTacToe::new(), 50);

    let json = serde_json::to_string(search.tree()).unwrap();
    let restored: MCTSTree = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.len(), search.tree().len());
    assert_eq!(restored.root_node().visits, 50);
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn test_mcts_terminal_root() {
    let mut state = Go::new();
    state.plays("PASS PASS").unwrap();
    assert!(state.is_terminal());

    let mut search = MCTSSearch::new(MCTSConfig::default());
    assert_eq!(search.search(&state, 100), None);
}

#[test]
fn test_mcts_root_colour_follows_position() {
    let mut state = Go::new();
    state.plays("B2").unwrap();

    let mut search = MCTSSearch::new(MCTSConfig::default());
    search.search(&state, 20);
    assert_eq!(search.tree().root_node().to_move, Color::White);
}
