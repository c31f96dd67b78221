//! Stone/piece colours and per-colour data storage.
//!
//! ## Color
//!
//! Every game in this crate is a two-player game. `Black` always moves
//! first; `White` second.
//!
//! ## ColorMap
//!
//! Fixed two-entry storage indexed by `Color`, used for scores, hands and
//! piece counts.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Side to move / owner of a stone or piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Both colours in move order.
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    /// The other colour.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// 0 for Black, 1 for White.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }

    /// Inverse of [`Color::index`].
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        if index == 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    /// +1 for Black, -1 for White. Converts a Black-relative value into
    /// the value seen by this colour.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Color::Black => 1.0,
            Color::White => -1.0,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

/// Per-colour data with O(1) access.
///
/// ## Example
///
/// ```
/// use games::core::{Color, ColorMap};
///
/// let mut score: ColorMap<i32> = ColorMap::with_value(2);
/// score[Color::White] += 1;
///
/// assert_eq!(score[Color::Black], 2);
/// assert_eq!(score[Color::White], 3);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMap<T> {
    data: [T; 2],
}

impl<T> ColorMap<T> {
    /// Create from explicit Black and White values.
    pub const fn new(black: T, white: T) -> Self {
        Self { data: [black, white] }
    }

    /// Create with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    /// Iterate over (Color, &T) pairs in move order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        Color::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &Self::Output {
        &self.data[color.index()]
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut Self::Output {
        &mut self.data[color.index()]
    }
}
