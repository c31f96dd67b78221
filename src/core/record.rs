//! Serializable game records.
//!
//! A record names the game, the seed and the actions played. The seed
//! drives both the setup of seeded games (Geister) and the chance stream
//! (`GameRng::new(seed)`, one `chance` call after every play), so a record
//! replays to the exact same position.

use serde::{Deserialize, Serialize};

use super::action::ActionId;
use super::error::Result;
use super::rng::GameRng;
use crate::games::{AnyGame, GameKind};
use crate::rules::BoardGame;

/// A finished or partial game, ready for storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game: GameKind,
    pub seed: u64,
    pub actions: Vec<ActionId>,
}

impl GameRecord {
    /// Empty record.
    pub fn new(game: GameKind, seed: u64) -> Self {
        Self {
            game,
            seed,
            actions: Vec::new(),
        }
    }

    /// Record of everything played in `game`.
    ///
    /// `seed` is the chance stream seed. Games with a seeded setup keep
    /// their own setup seed instead.
    pub fn from_game(game: &AnyGame, seed: u64) -> Self {
        Self {
            game: game.kind(),
            seed: game.setup_seed().unwrap_or(seed),
            actions: game.record().to_vec(),
        }
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode bytes produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Rebuild the position, checking every action.
    pub fn replay(&self) -> Result<AnyGame> {
        let mut game = self.game.create_seeded(self.seed);
        let mut rng = GameRng::new(self.seed);
        for &action in &self.actions {
            game.try_play(action)?;
            game.chance(&mut rng);
        }
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameError;

    #[test]
    fn test_bytes_round_trip() {
        let mut game = GameKind::Reversi.create();
        game.plays("C2 B2 B3").unwrap();
        let record = GameRecord::from_game(&game, 0);

        let bytes = record.to_bytes().unwrap();
        let decoded = GameRecord::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, record);
        assert_eq!(decoded.replay().unwrap(), game);
    }

    #[test]
    fn test_replay_with_chance() {
        let seed = 42;
        let mut game = GameKind::FlipTicTacToe.create_seeded(seed);
        let mut chance = GameRng::new(seed);
        let mut picks = GameRng::new(7);
        while !game.is_terminal() {
            let actions = game.legal_actions();
            game.play(*picks.choose(&actions).unwrap());
            game.chance(&mut chance);
        }

        let record = GameRecord::from_game(&game, seed);
        assert_eq!(record.replay().unwrap(), game);
    }

    #[test]
    fn test_geister_keeps_setup_seed() {
        let mut game = GameKind::Geister.create_seeded(5);
        let mut picks = GameRng::new(11);
        for _ in 0..10 {
            if game.is_terminal() {
                break;
            }
            let actions = game.legal_actions();
            game.play(*picks.choose(&actions).unwrap());
        }

        let record = GameRecord::from_game(&game, 99);
        assert_eq!(record.seed, 5);
        assert_eq!(record.replay().unwrap(), game);
    }

    #[test]
    fn test_replay_rejects_illegal() {
        let mut record = GameRecord::new(GameKind::TicTacToe, 0);
        record.actions = vec![ActionId(4), ActionId(4)];

        assert!(matches!(
            record.replay(),
            Err(GameError::IllegalAction { game: "TicTacToe", .. })
        ));
    }

    #[test]
    fn test_garbage_bytes() {
        let err = GameRecord::from_bytes(&[0xff; 3]).unwrap_err();
        assert!(matches!(err, GameError::Record { .. }));
    }

    #[test]
    fn test_json_shape() {
        let record = GameRecord {
            game: GameKind::Go,
            seed: 1,
            actions: vec![ActionId(4)],
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"game":"Go","seed":1,"actions":[4]}"#);
    }
}
