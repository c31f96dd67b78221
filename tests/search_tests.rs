//! Exact search integration tests.

use games::core::{ActionId, Color, GameRng};
use games::games::{Reversi, TicTacToe};
use games::rules::BoardGame;
use games::{alpha_beta, minimax, GameKind};

#[test]
fn test_tictactoe_is_a_draw() {
    let state = TicTacToe::new();
    let result = minimax(&state);

    assert_eq!(result.value, 0.0);
    assert_eq!(result.best_actions, state.legal_actions());
    assert_eq!(alpha_beta(&state), result);
}

#[test]
fn test_tictactoe_corner_reply_must_be_centre() {
    let mut state = TicTacToe::new();
    state.plays("A1").unwrap();

    let result = alpha_beta(&state);
    assert_eq!(result.value, 0.0);
    assert_eq!(result.best_actions, vec![ActionId(4)]);
}

#[test]
fn test_any_game_matches_concrete() {
    let mut concrete = TicTacToe::new();
    let mut any = GameKind::TicTacToe.create();
    concrete.plays("B2 A1 C3").unwrap();
    any.plays("B2 A1 C3").unwrap();

    assert_eq!(alpha_beta(&any), alpha_beta(&concrete));
}

fn empties(state: &Reversi) -> usize {
    36 - state.score(Color::Black) - state.score(Color::White)
}

#[test]
fn test_reversi_endgames_agree() {
    let mut rng = GameRng::new(21);
    for _ in 0..3 {
        let mut state = Reversi::new();
        // Few enough empty squares left for full-width search.
        while !state.is_terminal() && empties(&state) > 8 {
            let actions = state.legal_actions();
            state.play(*rng.choose(&actions).unwrap());
        }

        let exact = minimax(&state);
        let pruned = alpha_beta(&state);
        assert_eq!(pruned, exact, "{state}");

        if !state.is_terminal() {
            for action in &exact.best_actions {
                let mut child = state.clone();
                child.play(*action);
                assert_eq!(-minimax(&child).value, exact.value);
            }
        }
    }
}
