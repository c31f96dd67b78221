//! TicTacToe on a 3×3 board.
//!
//! Rows are labelled `A B C`, columns `1 2 3`; an action is the square
//! index `row * 3 + col` and prints as row letter + column digit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::board::{label_at, label_index};
use crate::core::{ActionId, Color, GameError, Result};
use crate::nn::EncodedState;
use crate::rules::BoardGame;

pub(crate) const L: usize = 3;
pub(crate) const B: usize = L * L;
const ROWS: &str = "ABC";
const COLS: &str = "123";

/// Every winning line as square indices.
pub(crate) const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub(crate) fn cell_char(cell: Option<Color>) -> char {
    match cell {
        Some(Color::Black) => 'O',
        Some(Color::White) => 'X',
        None => '.',
    }
}

/// Number of complete lines owned by `color`.
pub(crate) fn line_count(board: &[Option<Color>; B], color: Color) -> usize {
    LINES
        .iter()
        .filter(|line| line.iter().all(|&pos| board[pos] == Some(color)))
        .count()
}

/// TicTacToe position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToe {
    pub(crate) board: [Option<Color>; B],
    pub(crate) color: Color,
    pub(crate) winner: Option<Color>,
    pub(crate) record: Vec<ActionId>,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    /// Empty board, Black (`O`) to move.
    pub fn new() -> Self {
        Self {
            board: [None; B],
            color: Color::Black,
            winner: None,
            record: Vec::new(),
        }
    }

    /// Contents of the square at `(row, col)`.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<Color> {
        self.board[row * L + col]
    }

    /// Winner, if a line has been completed.
    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    fn completes_line(&self, pos: usize, color: Color) -> bool {
        LINES
            .iter()
            .filter(|line| line.contains(&pos))
            .any(|line| line.iter().all(|&p| self.board[p] == Some(color)))
    }

    pub(crate) fn parse_square(game: &'static str, s: &str) -> Result<usize> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(c), None) => {
                let row = label_index(ROWS, r).ok_or_else(|| GameError::notation(game, s))?;
                let col = label_index(COLS, c).ok_or_else(|| GameError::notation(game, s))?;
                Ok(row * L + col)
            }
            _ => Err(GameError::notation(game, s)),
        }
    }

    pub(crate) fn square_to_string(pos: usize) -> String {
        format!("{}{}", label_at(ROWS, pos / L), label_at(COLS, pos % L))
    }

    pub(crate) fn write_board(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {}", COLS)?;
        for row in 0..L {
            write!(f, "{} ", label_at(ROWS, row))?;
            for col in 0..L {
                write!(f, "{}", cell_char(self.cell(row, col)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    pub(crate) fn own_and_opponent_planes(&self, channels: usize) -> EncodedState {
        let mut encoded = EncodedState::planes(channels, L, L);
        for pos in 0..B {
            match self.board[pos] {
                Some(c) if c == self.color => encoded.set(0, pos / L, pos % L, 1.0),
                Some(_) => encoded.set(1, pos / L, pos % L, 1.0),
                None => {}
            }
        }
        encoded
    }
}

impl BoardGame for TicTacToe {
    fn name(&self) -> &'static str {
        "TicTacToe"
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    fn size(&self) -> [usize; 2] {
        [L, L]
    }

    fn to_move(&self) -> Color {
        self.color
    }

    fn legal_actions(&self) -> Vec<ActionId> {
        (0..B)
            .filter(|&pos| self.board[pos].is_none())
            .map(ActionId::from_index)
            .collect()
    }

    fn is_legal(&self, action: ActionId) -> bool {
        action.index() < B && self.board[action.index()].is_none()
    }

    fn play(&mut self, action: ActionId) {
        debug_assert!(self.is_legal(action), "illegal action {}", action);
        let pos = action.index();
        self.board[pos] = Some(self.color);
        if self.completes_line(pos, self.color) {
            self.winner = Some(self.color);
        }
        self.color = self.color.opponent();
        self.record.push(action);
    }

    fn undo(&mut self) -> Result<()> {
        let action = self.record.pop().ok_or(GameError::NothingToUndo)?;
        self.board[action.index()] = None;
        self.color = self.color.opponent();
        // A won position is terminal, so the one before it never was.
        self.winner = None;
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.record.len() == B
    }

    fn reward(&self, subjective: bool) -> f32 {
        let objective = self.winner.map_or(0.0, Color::sign);
        if subjective {
            objective * self.color.sign()
        } else {
            objective
        }
    }

    fn action_length(&self) -> usize {
        B
    }

    fn feature(&self) -> EncodedState {
        self.own_and_opponent_planes(2)
    }

    fn action_to_string(&self, action: ActionId) -> String {
        Self::square_to_string(action.index())
    }

    fn string_to_action(&self, s: &str) -> Result<ActionId> {
        Self::parse_square(self.name(), s).map(ActionId::from_index)
    }

    fn record(&self) -> &[ActionId] {
        &self.record
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_board(f)?;
        write!(f, "record = {}", self.record_string())
    }
}
