//! Action identifiers.
//!
//! Every game numbers its moves densely in `0..action_length()`. The
//! numbering is game-specific (a board square, a from/to pair, a
//! direction/square pair) and opaque to everything outside the game; the
//! game's notation functions turn ids into human-readable strings.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a move.
///
/// ```
/// use games::core::ActionId;
///
/// let pass = ActionId::new(36);
/// assert_eq!(pass.index(), 36);
/// assert_eq!(format!("{}", pass), "36");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(pub u32);

impl ActionId {
    /// Create a new action id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Create an action id from a usize index.
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ActionId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_id_basics() {
        let a = ActionId::from_index(7);
        assert_eq!(a, ActionId::new(7));
        assert_eq!(a.index(), 7);
        assert_eq!(ActionId::from(7u32), a);
    }

    #[test]
    fn test_action_id_ordering() {
        let mut actions = vec![ActionId(5), ActionId(1), ActionId(3)];
        actions.sort();
        assert_eq!(actions, vec![ActionId(1), ActionId(3), ActionId(5)]);
    }

    #[test]
    fn test_action_id_serialization() {
        let action = ActionId(42);
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, "42");
        let deserialized: ActionId = serde_json::from_str(&json).unwrap();
        assert_eq!(action, deserialized);
    }
}
