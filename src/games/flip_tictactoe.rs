//! FlipTicTacToe: TicTacToe with a random swap after every move.
//!
//! Placing a stone never wins by itself. After each `play` the chance step
//! swaps two distinct squares, then complete lines are counted: Black wins
//! with strictly more lines, White wins with any line otherwise, and White
//! also wins once nine swaps happened without a decision.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::tictactoe::{line_count, TicTacToe, B};
use crate::core::{ActionId, Color, ColorMap, GameError, GameRng, Result};
use crate::nn::EncodedState;
use crate::rules::BoardGame;

/// FlipTicTacToe position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipTicTacToe {
    base: TicTacToe,
    score: ColorMap<usize>,
    flips: Vec<(usize, usize)>,
}

impl Default for FlipTicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl FlipTicTacToe {
    pub fn new() -> Self {
        Self {
            base: TicTacToe::new(),
            score: ColorMap::with_value(0),
            flips: Vec::new(),
        }
    }

    /// Swaps applied so far.
    #[must_use]
    pub fn flips(&self) -> &[(usize, usize)] {
        &self.flips
    }

    /// Apply a specific swap of squares `a` and `b` and rescore.
    pub fn flip(&mut self, a: usize, b: usize) {
        debug_assert!(a != b && a < B && b < B);
        self.base.board.swap(a, b);
        self.flips.push((a, b));

        for color in Color::ALL {
            self.score[color] = line_count(&self.base.board, color);
        }
        if self.score[Color::Black] > self.score[Color::White] {
            self.base.winner = Some(Color::Black);
        } else if self.score[Color::White] > 0 || self.flips.len() == B {
            self.base.winner = Some(Color::White);
        }
    }

    /// Revert the last chance swap.
    pub fn unchance(&mut self) -> Result<()> {
        let (a, b) = self.flips.pop().ok_or(GameError::NothingToUndo)?;
        self.base.board.swap(a, b);
        self.base.winner = None;
        self.score = ColorMap::with_value(0);
        Ok(())
    }
}

impl BoardGame for FlipTicTacToe {
    fn name(&self) -> &'static str {
        "FlipTicTacToe"
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    fn size(&self) -> [usize; 2] {
        self.base.size()
    }

    fn to_move(&self) -> Color {
        self.base.color
    }

    fn legal_actions(&self) -> Vec<ActionId> {
        self.base.legal_actions()
    }

    fn is_legal(&self, action: ActionId) -> bool {
        self.base.is_legal(action)
    }

    fn play(&mut self, action: ActionId) {
        debug_assert!(self.is_legal(action), "illegal action {}", action);
        self.base.board[action.index()] = Some(self.base.color);
        self.base.color = self.base.color.opponent();
        self.base.record.push(action);
    }

    /// Reverts the last play together with the swap that followed it.
    fn undo(&mut self) -> Result<()> {
        if self.base.record.is_empty() {
            return Err(GameError::NothingToUndo);
        }
        if self.flips.len() == self.base.record.len() {
            self.unchance()?;
        }
        if let Some(action) = self.base.record.pop() {
            self.base.board[action.index()] = None;
            self.base.color = self.base.color.opponent();
        }
        Ok(())
    }

    fn chance(&mut self, rng: &mut GameRng) {
        if self.base.record.is_empty() {
            return;
        }
        let a = rng.gen_range_usize(0..B);
        let mut b = rng.gen_range_usize(0..B - 1);
        if b >= a {
            b += 1;
        }
        self.flip(a, b);
    }

    fn is_terminal(&self) -> bool {
        self.score[Color::Black] + self.score[Color::White] > 0 || self.flips.len() == B
    }

    fn reward(&self, subjective: bool) -> f32 {
        self.base.reward(subjective)
    }

    fn action_length(&self) -> usize {
        B
    }

    fn feature(&self) -> EncodedState {
        let mut encoded = self.base.own_and_opponent_planes(3);
        if self.base.color == Color::Black {
            encoded.fill_plane(2, 1.0);
        }
        encoded
    }

    fn action_to_string(&self, action: ActionId) -> String {
        self.base.action_to_string(action)
    }

    fn string_to_action(&self, s: &str) -> Result<ActionId> {
        TicTacToe::parse_square(self.name(), s).map(ActionId::from_index)
    }

    fn record(&self) -> &[ActionId] {
        &self.base.record
    }
}

impl fmt::Display for FlipTicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.base.write_board(f)?;
        let flips: Vec<String> = self
            .flips
            .iter()
            .map(|&(a, b)| format!("{}{}", TicTacToe::square_to_string(a), TicTacToe::square_to_string(b)))
            .collect();
        writeln!(f, "flips = {}", flips.join(" "))?;
        write!(f, "record = {}", self.record_string())
    }
}
