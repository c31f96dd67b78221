//! Game engines and the name registry.
//!
//! - `TicTacToe`, `FlipTicTacToe`: 3×3 line games
//! - `Reversi`: 6×6 disc flipping
//! - `AnimalShogi`: 4×3 shogi variant with drops
//! - `Go`: small-board Go with area scoring
//! - `Geister`: 6×6 ghost game with a seeded setup
//!
//! `GameKind` maps registry names to engines; `AnyGame` wraps any engine
//! behind one concrete type that itself implements `BoardGame`.

mod animal_shogi;
mod flip_tictactoe;
mod geister;
mod go;
mod reversi;
mod tictactoe;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use animal_shogi::{AnimalShogi, Piece, PieceKind};
pub use flip_tictactoe::FlipTicTacToe;
pub use geister::{Geister, Ghost};
pub use go::{Go, GoConfig};
pub use reversi::Reversi;
pub use tictactoe::TicTacToe;

use crate::core::{ActionId, Color, GameError, GameRng, Result};
use crate::nn::EncodedState;
use crate::rules::BoardGame;

/// Registry of constructible games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    TicTacToe,
    FlipTicTacToe,
    Reversi,
    AnimalShogi,
    Go,
    Geister,
}

impl GameKind {
    /// Every registered game.
    pub const ALL: [GameKind; 6] = [
        GameKind::TicTacToe,
        GameKind::FlipTicTacToe,
        GameKind::Reversi,
        GameKind::AnimalShogi,
        GameKind::Go,
        GameKind::Geister,
    ];

    /// Games the smoke harness runs by default, in order.
    pub const DEFAULT_HARNESS: [GameKind; 5] = [
        GameKind::TicTacToe,
        GameKind::Reversi,
        GameKind::AnimalShogi,
        GameKind::Go,
        GameKind::Geister,
    ];

    /// Registry name, as accepted by `FromStr`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            GameKind::TicTacToe => "TicTacToe",
            GameKind::FlipTicTacToe => "FlipTicTacToe",
            GameKind::Reversi => "Reversi",
            GameKind::AnimalShogi => "AnimalShogi",
            GameKind::Go => "Go",
            GameKind::Geister => "Geister",
        }
    }

    /// Default initial position.
    #[must_use]
    pub fn create(self) -> AnyGame {
        self.create_seeded(0)
    }

    /// Initial position; `seed` only affects games with a random setup.
    #[must_use]
    pub fn create_seeded(self, seed: u64) -> AnyGame {
        match self {
            GameKind::TicTacToe => AnyGame::TicTacToe(TicTacToe::new()),
            GameKind::FlipTicTacToe => AnyGame::FlipTicTacToe(FlipTicTacToe::new()),
            GameKind::Reversi => AnyGame::Reversi(Reversi::new()),
            GameKind::AnimalShogi => AnyGame::AnimalShogi(AnimalShogi::new()),
            GameKind::Go => AnyGame::Go(Go::new()),
            GameKind::Geister => AnyGame::Geister(Geister::with_seed(seed)),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| GameError::UnknownGame(s.to_string()))
    }
}

/// Any engine, dispatched statically.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyGame {
    TicTacToe(TicTacToe),
    FlipTicTacToe(FlipTicTacToe),
    Reversi(Reversi),
    AnimalShogi(AnimalShogi),
    Go(Go),
    Geister(Geister),
}

macro_rules! dispatch {
    ($self:expr, $game:ident => $body:expr) => {
        match $self {
            AnyGame::TicTacToe($game) => $body,
            AnyGame::FlipTicTacToe($game) => $body,
            AnyGame::Reversi($game) => $body,
            AnyGame::AnimalShogi($game) => $body,
            AnyGame::Go($game) => $body,
            AnyGame::Geister($game) => $body,
        }
    };
}

impl AnyGame {
    #[must_use]
    pub fn kind(&self) -> GameKind {
        match self {
            AnyGame::TicTacToe(_) => GameKind::TicTacToe,
            AnyGame::FlipTicTacToe(_) => GameKind::FlipTicTacToe,
            AnyGame::Reversi(_) => GameKind::Reversi,
            AnyGame::AnimalShogi(_) => GameKind::AnimalShogi,
            AnyGame::Go(_) => GameKind::Go,
            AnyGame::Geister(_) => GameKind::Geister,
        }
    }

    /// Seed the initial position was built from, for games with a random
    /// setup.
    #[must_use]
    pub fn setup_seed(&self) -> Option<u64> {
        match self {
            AnyGame::Geister(g) => Some(g.seed()),
            _ => None,
        }
    }
}

impl BoardGame for AnyGame {
    fn name(&self) -> &'static str {
        dispatch!(self, g => g.name())
    }

    fn clear(&mut self) {
        dispatch!(self, g => g.clear())
    }

    fn size(&self) -> [usize; 2] {
        dispatch!(self, g => g.size())
    }

    fn to_move(&self) -> Color {
        dispatch!(self, g => g.to_move())
    }

    fn legal_actions(&self) -> Vec<ActionId> {
        dispatch!(self, g => g.legal_actions())
    }

    fn is_legal(&self, action: ActionId) -> bool {
        dispatch!(self, g => g.is_legal(action))
    }

    fn play(&mut self, action: ActionId) {
        dispatch!(self, g => g.play(action))
    }

    fn undo(&mut self) -> Result<()> {
        dispatch!(self, g => g.undo())
    }

    fn chance(&mut self, rng: &mut GameRng) {
        dispatch!(self, g => g.chance(rng))
    }

    fn is_terminal(&self) -> bool {
        dispatch!(self, g => g.is_terminal())
    }

    fn reward(&self, subjective: bool) -> f32 {
        dispatch!(self, g => g.reward(subjective))
    }

    fn action_length(&self) -> usize {
        dispatch!(self, g => g.action_length())
    }

    fn feature(&self) -> EncodedState {
        dispatch!(self, g => g.feature())
    }

    fn action_to_string(&self, action: ActionId) -> String {
        dispatch!(self, g => g.action_to_string(action))
    }

    fn string_to_action(&self, s: &str) -> Result<ActionId> {
        dispatch!(self, g => g.string_to_action(s))
    }

    fn record(&self) -> &[ActionId] {
        dispatch!(self, g => g.record())
    }
}

impl fmt::Display for AnyGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, g => fmt::Display::fmt(g, f))
    }
}
