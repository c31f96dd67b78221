//! Game classes for Python.
//!
//! Every class wraps one engine and exposes the same methods; action ids
//! cross the boundary as plain integers.

use numpy::{PyArray1, PyArray3, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{ActionId, GameRng};
use crate::games::{AnimalShogi, FlipTicTacToe, Geister, Go, GoConfig, Reversi, TicTacToe};
use crate::mcts::{MCTSConfig, MCTSSearch};
use crate::rules::BoardGame;
use crate::search::alpha_beta;

macro_rules! py_game {
    (
        $py:ident, $name:literal, $game:ty,
        ($($arg:ident: $argty:ty = $default:literal),*) => $ctor:expr
    ) => {
        #[pyclass(name = $name)]
        #[derive(Clone)]
        pub struct $py(pub $game);

        #[pymethods]
        impl $py {
            #[new]
            #[pyo3(signature = ($($arg = $default),*))]
            fn new($($arg: $argty),*) -> PyResult<Self> {
                Ok(Self($ctor))
            }

            fn action2str(&self, action: u32) -> PyResult<String> {
                let action = self.checked(action)?;
                Ok(self.0.action_to_string(action))
            }

            fn str2action(&self, s: &str) -> PyResult<u32> {
                Ok(self.0.string_to_action(s)?.0)
            }

            fn __str__(&self) -> String {
                self.0.to_string()
            }

            fn __repr__(&self) -> String {
                format!("{}({})", $name, self.0.record_string())
            }

            fn copy(&self) -> Self {
                self.clone()
            }

            fn clear(&mut self) {
                self.0.clear();
            }

            fn legal_actions(&self) -> Vec<u32> {
                self.0.legal_actions().into_iter().map(|a| a.0).collect()
            }

            fn action_length(&self) -> usize {
                self.0.action_length()
            }

            fn play(&mut self, action: u32) -> PyResult<()> {
                Ok(self.0.try_play(ActionId(action))?)
            }

            fn plays(&mut self, s: &str) -> PyResult<()> {
                Ok(self.0.plays(s)?)
            }

            /// Apply the chance event that follows a play.
            #[pyo3(signature = (seed = 0))]
            fn chance(&mut self, seed: u64) {
                self.0.chance(&mut GameRng::new(seed));
            }

            fn terminal(&self) -> bool {
                self.0.is_terminal()
            }

            #[pyo3(signature = (subjective = false))]
            fn reward(&self, subjective: bool) -> f32 {
                self.0.reward(subjective)
            }

            fn feature<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray3<f32>>> {
                let encoded = self.0.feature();
                let shape = [encoded.shape[0], encoded.shape[1], encoded.shape[2]];
                PyArray1::from_vec_bound(py, encoded.tensor)
                    .reshape(shape)
                    .map_err(|e| PyValueError::new_err(e.to_string()))
            }

            fn undo(&mut self) -> PyResult<()> {
                Ok(self.0.undo()?)
            }

            fn record_string(&self) -> String {
                self.0.record_string()
            }

            /// Every action with the best exact value (alpha-beta).
            fn best_actions(&self) -> Vec<u32> {
                alpha_beta(&self.0).best_actions.into_iter().map(|a| a.0).collect()
            }

            /// Most visited root action after `iterations` MCTS iterations.
            #[pyo3(signature = (iterations = 1000, seed = 42))]
            fn mcts_action(&self, iterations: u32, seed: u64) -> Option<u32> {
                let mut search = MCTSSearch::new(MCTSConfig::default().with_seed(seed));
                search.search(&self.0, iterations).map(|a| a.0)
            }
        }

        impl $py {
            fn checked(&self, action: u32) -> PyResult<ActionId> {
                let length = self.0.action_length();
                if action as usize >= length {
                    return Err(PyValueError::new_err(format!(
                        "{}: action {} out of range 0..{}",
                        $name, action, length
                    )));
                }
                Ok(ActionId(action))
            }
        }
    };
}

py_game!(PyTicTacToe, "TicTacToe", TicTacToe, () => TicTacToe::new());
py_game!(PyFlipTicTacToe, "FlipTicTacToe", FlipTicTacToe, () => FlipTicTacToe::new());
py_game!(PyReversi, "Reversi", Reversi, () => Reversi::new());
py_game!(PyAnimalShogi, "AnimalShogi", AnimalShogi, () => AnimalShogi::new());
py_game!(
    PyGo, "Go", Go,
    (size: usize = 3, komi: f32 = 7.0, superko: bool = false)
        => Go::with_config(GoConfig::new(size).with_komi(komi).with_superko(superko))?
);
py_game!(PyGeister, "Geister", Geister, (seed: u64 = 0) => Geister::with_seed(seed));
