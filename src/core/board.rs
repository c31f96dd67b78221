//! Grid helpers shared by every board game.
//!
//! Direction numbering:
//!
//! ```text
//! 4 0 5
//! 1 - 2
//! 6 3 7
//! ```
//!
//! The first four directions are orthogonal, the last four diagonal.
//! `DIRECTIONS[d]` is `(dx, dy)` where `x` is the first grid coordinate of
//! the game using it.

/// Offsets for the eight neighbours.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, 0),
    (0, -1),
    (0, 1),
    (1, 0),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Number of orthogonal directions (a prefix of [`DIRECTIONS`]).
pub const ORTHOGONAL: usize = 4;

/// Direction pointing the opposite way.
///
/// ```
/// use games::core::board::{point_symmetry, DIRECTIONS};
///
/// for d in 0..8 {
///     let (dx, dy) = DIRECTIONS[d];
///     assert_eq!(DIRECTIONS[point_symmetry(d)], (-dx, -dy));
/// }
/// ```
#[inline]
#[must_use]
pub const fn point_symmetry(d: usize) -> usize {
    (d / 4) * 4 + 3 - (d % 4)
}

/// Whether `(x, y)` lies on a `lx` × `ly` grid.
#[inline]
#[must_use]
pub const fn onboard_xy(x: i32, y: i32, lx: usize, ly: usize) -> bool {
    x >= 0 && (x as usize) < lx && y >= 0 && (y as usize) < ly
}

/// Step `(x, y)` one square in direction `d`, `None` when leaving the grid.
#[inline]
#[must_use]
pub fn step(x: usize, y: usize, d: usize, lx: usize, ly: usize) -> Option<(usize, usize)> {
    let (dx, dy) = DIRECTIONS[d];
    let nx = x as i32 + dx;
    let ny = y as i32 + dy;
    if onboard_xy(nx, ny, lx, ly) {
        Some((nx as usize, ny as usize))
    } else {
        None
    }
}

/// Position of `c` in a coordinate label string.
#[inline]
#[must_use]
pub fn label_index(labels: &str, c: char) -> Option<usize> {
    labels.chars().position(|l| l == c)
}

/// Label character at `index`.
///
/// Callers only pass indices below the label string length.
#[inline]
#[must_use]
pub fn label_at(labels: &str, index: usize) -> char {
    labels.as_bytes()[index] as char
}
