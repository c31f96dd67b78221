//! Error type shared by every engine.

use thiserror::Error;

use super::action::ActionId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("unknown game: {0}")]
    UnknownGame(String),

    #[error("{game}: cannot parse action \"{text}\"")]
    InvalidNotation { game: &'static str, text: String },

    #[error("{game}: illegal action {action}")]
    IllegalAction { game: &'static str, action: ActionId },

    #[error("no action to undo")]
    NothingToUndo,

    #[error("{0} does not support undo")]
    UndoUnsupported(&'static str),

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("record error: {message}")]
    Record { message: String },
}

impl GameError {
    pub(crate) fn notation(game: &'static str, text: &str) -> Self {
        GameError::InvalidNotation {
            game,
            text: text.to_string(),
        }
    }
}

impl From<bincode::Error> for GameError {
    fn from(err: bincode::Error) -> Self {
        GameError::Record {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = GameError::notation("Reversi", "Z9");
        assert_eq!(err.to_string(), "Reversi: cannot parse action \"Z9\"");

        let err = GameError::IllegalAction {
            game: "Go",
            action: ActionId(3),
        };
        assert_eq!(err.to_string(), "Go: illegal action 3");

        assert_eq!(
            GameError::UndoUnsupported("Geister").to_string(),
            "Geister does not support undo"
        );
    }
}
