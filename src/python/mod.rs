//! Python bindings for the game engines.
//!
//! # Quick Start
//!
//! ```python
//! import games
//!
//! state = games.Reversi()
//! print(state)
//! for a in state.legal_actions():
//!     print(a, state.action2str(a))
//!
//! state.plays("C2 B2")
//! x = state.feature()          # numpy float32 [channels, rows, cols]
//! best = state.best_actions()  # exact search, small games only
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::GameError;

mod py_games;

pub use py_games::*;

impl From<GameError> for PyErr {
    fn from(err: GameError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// Two-player board game engines.
#[pymodule]
fn games(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTicTacToe>()?;
    m.add_class::<PyFlipTicTacToe>()?;
    m.add_class::<PyReversi>()?;
    m.add_class::<PyAnimalShogi>()?;
    m.add_class::<PyGo>()?;
    m.add_class::<PyGeister>()?;
    m.add("GAME_NAMES", crate::harness::GAME_NAMES.to_vec())?;
    Ok(())
}
