//! Reversi on a 6×6 board.
//!
//! Columns are `A..F`, rows `1..6`; square `(x, y)` is action `y * 6 + x`.
//! Action 36 is the pass, legal only when no placement flips anything.

use std::fmt;

use crate::core::board::{label_at, label_index, step, DIRECTIONS};
use crate::core::{ActionId, Color, ColorMap, GameError, Result};
use crate::nn::EncodedState;
use crate::rules::BoardGame;

const L: usize = 6;
const B: usize = L * L;
const PASS: usize = B;
const X: &str = "ABCDEFGH";
const Y: &str = "12345678";

type FlipCounts = [u8; 8];

fn cell_char(cell: Option<Color>) -> char {
    match cell {
        Some(Color::Black) => 'X',
        Some(Color::White) => 'O',
        None => '.',
    }
}

/// Reversi position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reversi {
    board: [Option<Color>; B],
    color: Color,
    score: ColorMap<usize>,
    /// Per-direction flip counts of every placement, for undo.
    flipped: Vec<FlipCounts>,
    record: Vec<ActionId>,
}

impl Default for Reversi {
    fn default() -> Self {
        Self::new()
    }
}

impl Reversi {
    /// Standard opening: four centre discs, Black to move.
    pub fn new() -> Self {
        let mut board = [None; B];
        let mid = (L - 1) / 2;
        board[xy_to_pos(mid, mid)] = Some(Color::White);
        board[xy_to_pos(mid, mid + 1)] = Some(Color::Black);
        board[xy_to_pos(mid + 1, mid)] = Some(Color::Black);
        board[xy_to_pos(mid + 1, mid + 1)] = Some(Color::White);
        Self {
            board,
            color: Color::Black,
            score: ColorMap::with_value(2),
            flipped: Vec::new(),
            record: Vec::new(),
        }
    }

    /// Disc at column `x`, row `y`.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Color> {
        self.board[xy_to_pos(x, y)]
    }

    /// Disc count of `color`.
    #[must_use]
    pub fn score(&self, color: Color) -> usize {
        self.score[color]
    }

    /// Disc difference, Black minus White unless `subjective`.
    #[must_use]
    pub fn disc_difference(&self, subjective: bool) -> i32 {
        let diff = self.score[Color::Black] as i32 - self.score[Color::White] as i32;
        if subjective && self.color == Color::White {
            -diff
        } else {
            diff
        }
    }

    fn flip_counts(&self, pos: usize) -> FlipCounts {
        let mut counts = [0u8; 8];
        if pos >= B || self.board[pos].is_some() {
            return counts;
        }
        for (d, count) in counts.iter_mut().enumerate() {
            let (mut x, mut y) = (pos % L, pos / L);
            let mut run = 0u8;
            loop {
                match step(x, y, d, L, L) {
                    Some((nx, ny)) => {
                        x = nx;
                        y = ny;
                    }
                    None => {
                        run = 0;
                        break;
                    }
                }
                match self.board[xy_to_pos(x, y)] {
                    None => {
                        run = 0;
                        break;
                    }
                    Some(c) if c == self.color => break,
                    Some(_) => run += 1,
                }
            }
            *count = run;
        }
        counts
    }

    fn flip_stones(&mut self, pos: usize, counts: &FlipCounts) -> usize {
        for (d, &count) in counts.iter().enumerate() {
            let (dx, dy) = DIRECTIONS[d];
            let (mut x, mut y) = ((pos % L) as i32, (pos / L) as i32);
            for _ in 0..count {
                x += dx;
                y += dy;
                let p = xy_to_pos(x as usize, y as usize);
                self.board[p] = self.board[p].map(Color::opponent);
            }
        }
        counts.iter().map(|&c| c as usize).sum()
    }

    fn can_place(&self, pos: usize) -> bool {
        self.flip_counts(pos).iter().any(|&c| c > 0)
    }
}

fn xy_to_pos(x: usize, y: usize) -> usize {
    y * L + x
}

impl BoardGame for Reversi {
    fn name(&self) -> &'static str {
        "Reversi"
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
        let mut actions: Vec<ActionId> = (0..B)
            .filter(|&pos| self.can_place(pos))
            .map(ActionId::from_index)
            .collect();
        if actions.is_empty() {
            actions.push(ActionId::from_index(PASS));
        }
        actions
    }

    fn is_legal(&self, action: ActionId) -> bool {
        let pos = action.index();
        if pos < B {
            self.can_place(pos)
        } else {
            pos == PASS && !(0..B).any(|p| self.can_place(p))
        }
    }

    fn play(&mut self, action: ActionId) {
        debug_assert!(self.is_legal(action), "illegal action {}", action);
        let pos = action.index();
        if pos != PASS {
            let counts = self.flip_counts(pos);
            let flipped = self.flip_stones(pos, &counts);
            self.board[pos] = Some(self.color);
            self.score[self.color] += 1 + flipped;
            self.score[self.color.opponent()] -= flipped;
            self.flipped.push(counts);
        }
        self.color = self.color.opponent();
        self.record.push(action);
    }

    fn undo(&mut self) -> Result<()> {
        let action = self.record.pop().ok_or(GameError::NothingToUndo)?;
        let pos = action.index();
        if pos != PASS {
            let counts = self.flipped.pop().ok_or(GameError::NothingToUndo)?;
            let flipped = self.flip_stones(pos, &counts);
            self.board[pos] = None;
            // `color` is still the side that did not make the move.
            self.score[self.color.opponent()] -= 1 + flipped;
            self.score[self.color] += flipped;
        }
        self.color = self.color.opponent();
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        let black = self.score[Color::Black];
        let white = self.score[Color::White];
        let full = black + white == B;
        let wiped = black == 0 || white == 0;
        let passed_twice = self.record.len() >= 2
            && self.record[self.record.len() - 2..]
                .iter()
                .all(|a| a.index() == PASS);
        full || wiped || passed_twice
    }

    fn reward(&self, subjective: bool) -> f32 {
        match self.disc_difference(subjective) {
            d if d > 0 => 1.0,
            d if d < 0 => -1.0,
            _ => 0.0,
        }
    }

    fn action_length(&self) -> usize {
        B + 1
    }

    fn feature(&self) -> EncodedState {
        let mut encoded = EncodedState::planes(2, L, L);
        for pos in 0..B {
            match self.board[pos] {
                Some(c) if c == self.color => encoded.set(0, pos / L, pos % L, 1.0),
                Some(_) => encoded.set(1, pos / L, pos % L, 1.0),
                None => {}
            }
        }
        encoded
    }

    fn action_to_string(&self, action: ActionId) -> String {
        let pos = action.index();
        if pos == PASS {
            return "PASS".to_string();
        }
        format!("{}{}", label_at(X, pos % L), label_at(Y, pos / L))
    }

    fn string_to_action(&self, s: &str) -> Result<ActionId> {
        if s == "PASS" {
            return Ok(ActionId::from_index(PASS));
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(cx), Some(cy), None) => {
                let x = label_index(X, cx).filter(|&x| x < L);
                let y = label_index(Y, cy).filter(|&y| y < L);
                match (x, y) {
                    (Some(x), Some(y)) => Ok(ActionId::from_index(xy_to_pos(x, y))),
                    _ => Err(GameError::notation(self.name(), s)),
                }
            }
            _ => Err(GameError::notation(self.name(), s)),
        }
    }

    fn record(&self) -> &[ActionId] {
        &self.record
    }
}

impl fmt::Display for Reversi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {}", &X[..L])?;
        for y in 0..L {
            write!(f, "{} ", label_at(Y, y))?;
            for x in 0..L {
                write!(f, "{}", cell_char(self.cell(x, y)))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{} - {}", self.score[Color::Black], self.score[Color::White])?;
        write!(f, "record = {}", self.record_string())
    }
}
