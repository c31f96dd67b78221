//! Smoke harness over the game registry.
//!
//! For each game name: construct the default position, print it, print
//! its legal action ids and print the notation of each of them. The
//! playout helpers drive whole games with random moves (optionally with
//! MCTS for Black) and tally the outcomes.

use std::fmt;

use crate::core::{ActionId, Color, GameRng, Result};
use crate::games::{AnyGame, GameKind};
use crate::mcts::{MCTSConfig, MCTSSearch};
use crate::rules::{BoardGame, GameResult};

/// Games the harness runs when no names are given, in order.
pub const GAME_NAMES: [&str; 5] = ["TicTacToe", "Reversi", "AnimalShogi", "Go", "Geister"];

/// What the harness prints for one game.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub name: &'static str,
    /// `Display` of the initial position.
    pub display: String,
    pub actions: Vec<ActionId>,
    /// Notation of each legal action, same order as `actions`.
    pub action_strings: Vec<String>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.display)?;
        let ids: Vec<String> = self.actions.iter().map(ToString::to_string).collect();
        writeln!(f, "[{}]", ids.join(", "))?;
        let strings: Vec<String> = self
            .action_strings
            .iter()
            .map(|s| format!("'{s}'"))
            .collect();
        write!(f, "[{}]", strings.join(", "))
    }
}

/// Describe a position: display, legal actions and their notation.
pub fn describe<G: BoardGame>(state: &G) -> Report {
    let actions = state.legal_actions();
    let action_strings = actions.iter().map(|&a| state.action_to_string(a)).collect();
    Report {
        name: state.name(),
        display: state.to_string(),
        actions,
        action_strings,
    }
}

/// Describe the default position of every named game.
///
/// Fails on the first name the registry does not know.
pub fn run<S: AsRef<str>>(names: &[S]) -> Result<Vec<Report>> {
    names
        .iter()
        .map(|name| {
            let kind: GameKind = name.as_ref().parse()?;
            let report = describe(&kind.create());
            tracing::info!(game = report.name, actions = report.actions.len(), "described");
            Ok(report)
        })
        .collect()
}

/// Play uniformly random moves, each followed by a chance event, until
/// the game ends.
pub fn random_playout<G: BoardGame>(state: &mut G, rng: &mut GameRng) -> GameResult {
    while !state.is_terminal() {
        let actions = state.legal_actions();
        let Some(&action) = rng.choose(&actions) else {
            break;
        };
        state.play(action);
        state.chance(rng);
    }
    state.result().unwrap_or(GameResult::Draw)
}

/// Outcome counts over a batch of playouts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayoutTally {
    pub game: GameKind,
    pub black_wins: u32,
    pub white_wins: u32,
    pub draws: u32,
    /// Plies summed over all games.
    pub plies: u64,
}

impl PlayoutTally {
    pub fn new(game: GameKind) -> Self {
        Self {
            game,
            black_wins: 0,
            white_wins: 0,
            draws: 0,
            plies: 0,
        }
    }

    pub fn add(&mut self, result: GameResult, plies: usize) {
        match result {
            GameResult::Winner(Color::Black) => self.black_wins += 1,
            GameResult::Winner(Color::White) => self.white_wins += 1,
            GameResult::Draw => self.draws += 1,
        }
        self.plies += plies as u64;
    }

    #[must_use]
    pub fn games(&self) -> u32 {
        self.black_wins + self.white_wins + self.draws
    }
}

impl fmt::Display for PlayoutTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let games = self.games();
        let avg = if games == 0 {
            0.0
        } else {
            self.plies as f64 / games as f64
        };
        write!(
            f,
            "{}: {} games, black {} / white {} / draw {}, {:.1} plies/game",
            self.game, games, self.black_wins, self.white_wins, self.draws, avg
        )
    }
}

/// Play `count` games of `kind`.
///
/// Game `i` starts from `create_seeded(seed + i)`. With
/// `mcts_iterations > 0` Black picks its moves with MCTS, White stays
/// random.
pub fn playouts(kind: GameKind, count: u32, seed: u64, mcts_iterations: u32) -> PlayoutTally {
    let mut tally = PlayoutTally::new(kind);
    let mut rng = GameRng::new(seed);
    let mut search: MCTSSearch<AnyGame> = MCTSSearch::new(MCTSConfig::default().with_seed(seed));

    for i in 0..count {
        let mut game = kind.create_seeded(seed.wrapping_add(u64::from(i)));
        let mut game_rng = rng.fork();

        let result = if mcts_iterations == 0 {
            random_playout(&mut game, &mut game_rng)
        } else {
            while !game.is_terminal() {
                let action = if game.to_move() == Color::Black {
                    search.search(&game, mcts_iterations)
                } else {
                    let actions = game.legal_actions();
                    game_rng.choose(&actions).copied()
                };
                let Some(action) = action else {
                    break;
                };
                game.play(action);
                game.chance(&mut game_rng);
            }
            game.result().unwrap_or(GameResult::Draw)
        };

        tracing::debug!(game = kind.name(), index = i, ?result, plies = game.record().len(), "playout finished");
        tally.add(result, game.record().len());
    }

    tally
}
