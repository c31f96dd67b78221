//! Network-facing types: encoded positions and policy priors.
//!
//! The engines only produce inputs (`EncodedState`); networks themselves
//! live outside the crate (typically in Python) and are plugged into MCTS
//! through `PolicyNetwork`.

use serde::{Deserialize, Serialize};

/// Encoded position as a flat tensor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor, `[channels, rows, cols]` for every board game.
    pub shape: Vec<usize>,
}

impl EncodedState {
    /// Create a new encoded state.
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    /// Zero-filled planes for a `rows` × `cols` board.
    pub fn planes(channels: usize, rows: usize, cols: usize) -> Self {
        Self {
            tensor: vec![0.0; channels * rows * cols],
            shape: vec![channels, rows, cols],
        }
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    /// Number of planes (first shape dimension).
    #[must_use]
    pub fn channels(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    /// Element at `(channel, row, col)`.
    #[must_use]
    pub fn at(&self, channel: usize, row: usize, col: usize) -> f32 {
        self.tensor[self.offset(channel, row, col)]
    }

    /// Set the element at `(channel, row, col)`.
    pub fn set(&mut self, channel: usize, row: usize, col: usize, value: f32) {
        let offset = self.offset(channel, row, col);
        self.tensor[offset] = value;
    }

    /// Fill a whole plane with `value`.
    pub fn fill_plane(&mut self, channel: usize, value: f32) {
        let plane = self.shape[1] * self.shape[2];
        self.tensor[channel * plane..(channel + 1) * plane].fill(value);
    }

    fn offset(&self, channel: usize, row: usize, col: usize) -> usize {
        (channel * self.shape[1] + row) * self.shape[2] + col
    }
}

/// Policy network producing a prior over the full action label space.
pub trait PolicyNetwork: Send + Sync {
    /// Predict one probability per action label (`action_length` entries).
    fn predict(&self, encoded: &EncodedState, action_length: usize) -> Vec<f32>;
}

/// Uniform prior (baseline and tests).
#[derive(Clone, Debug, Default)]
pub struct UniformPolicy;

impl PolicyNetwork for UniformPolicy {
    fn predict(&self, _encoded: &EncodedState, action_length: usize) -> Vec<f32> {
        vec![1.0 / action_length.max(1) as f32; action_length]
    }
}
