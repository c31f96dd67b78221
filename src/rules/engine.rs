//! The `BoardGame` trait every engine implements.
//!
//! A game value *is* its current position: constructing one yields the
//! initial position, `play` advances it, `undo` (where supported) takes
//! it back. Search and the Python bindings only ever talk to games
//! through this trait.

use std::fmt;

use crate::core::{ActionId, Color, GameError, GameRng, Result};
use crate::nn::EncodedState;

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(Color),
    /// Nobody won.
    Draw,
}

impl GameResult {
    /// Check if `color` won.
    #[must_use]
    pub fn is_winner(&self, color: Color) -> bool {
        matches!(self, GameResult::Winner(c) if *c == color)
    }

    /// Result from an objective (Black-relative) reward.
    #[must_use]
    pub fn from_reward(reward: f32) -> Self {
        if reward > 0.0 {
            GameResult::Winner(Color::Black)
        } else if reward < 0.0 {
            GameResult::Winner(Color::White)
        } else {
            GameResult::Draw
        }
    }
}

/// Two-player board game engine.
///
/// ## Implementation Notes
///
/// - `legal_actions` is deterministic; its order is the order games and
///   search enumerate moves in
/// - `play` assumes a legal action; use `try_play` for untrusted input
/// - `reward(true)` is from the view of the colour to move, which is what
///   negamax search consumes
/// - `Display` prints the board followed by `record = <actions>`
pub trait BoardGame: Clone + fmt::Display {
    /// Registry name of the game.
    fn name(&self) -> &'static str;

    /// Reset to the initial position.
    fn clear(&mut self);

    /// `[rows, cols]` of the board as displayed and as encoded.
    fn size(&self) -> [usize; 2];

    /// Colour to move.
    fn to_move(&self) -> Color;

    /// Legal actions in the current position.
    fn legal_actions(&self) -> Vec<ActionId>;

    /// Whether `action` is legal in the current position.
    fn is_legal(&self, action: ActionId) -> bool {
        self.legal_actions().contains(&action)
    }

    /// Apply a legal action.
    fn play(&mut self, action: ActionId);

    /// Revert the last action.
    fn undo(&mut self) -> Result<()> {
        Err(GameError::UndoUnsupported(self.name()))
    }

    /// Stochastic transition applied after `play`.
    ///
    /// Deterministic games ignore it.
    fn chance(&mut self, _rng: &mut GameRng) {}

    /// Whether the game is over.
    fn is_terminal(&self) -> bool;

    /// +1 / 0 / -1 outcome. Objective rewards are from Black's view,
    /// subjective rewards from the view of the colour to move.
    fn reward(&self, subjective: bool) -> f32;

    /// Size of the action label space; every action id is below it.
    fn action_length(&self) -> usize;

    /// Feature planes from the view of the colour to move.
    fn feature(&self) -> EncodedState;

    /// Human-readable notation for an action.
    fn action_to_string(&self, action: ActionId) -> String;

    /// Parse notation produced by `action_to_string`.
    fn string_to_action(&self, s: &str) -> Result<ActionId>;

    /// Actions played so far.
    fn record(&self) -> &[ActionId];

    // === Convenience Methods ===

    /// Outcome once the game is over.
    fn result(&self) -> Option<GameResult> {
        if self.is_terminal() {
            Some(GameResult::from_reward(self.reward(false)))
        } else {
            None
        }
    }

    /// Checked `play`.
    fn try_play(&mut self, action: ActionId) -> Result<()> {
        if action.index() >= self.action_length() || !self.is_legal(action) {
            return Err(GameError::IllegalAction {
                game: self.name(),
                action,
            });
        }
        self.play(action);
        Ok(())
    }

    /// Play a space-separated sequence of action strings.
    fn plays(&mut self, s: &str) -> Result<()> {
        for action in self.string_to_path(s)? {
            self.try_play(action)?;
        }
        Ok(())
    }

    /// Notation for a sequence of actions.
    fn path_to_string(&self, path: &[ActionId]) -> String {
        path.iter()
            .map(|&a| self.action_to_string(a))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parse a space-separated sequence of action strings.
    ///
    /// Parsing is positional only; legality is checked when playing.
    fn string_to_path(&self, s: &str) -> Result<Vec<ActionId>> {
        s.split_whitespace()
            .map(|token| self.string_to_action(token))
            .collect()
    }

    /// Notation for the whole record.
    fn record_string(&self) -> String {
        self.path_to_string(self.record())
    }
}
