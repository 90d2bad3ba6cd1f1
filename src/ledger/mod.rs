//! Append-only command ledger and deterministic replay.
//!
//! The engine keeps no persistent state of its own. A collaborator that
//! wants durability stores a [`Ledger`]: the RNG state at session start plus
//! every accepted command in order. Replaying the ledger against a fresh
//! engine with the same configuration reproduces the session exactly,
//! including the role draw.
//!
//! ```
//! use werewolf_engine::core::GameConfig;
//! use werewolf_engine::ledger::Ledger;
//! use werewolf_engine::rules::GameEngine;
//!
//! let config = GameConfig::standard().with_seed(3);
//! let mut engine = GameEngine::new(config.clone());
//! engine.join("p1", vec![1u8]).unwrap();
//!
//! let bytes = Ledger::capture(&engine).to_bytes().unwrap();
//! let replayed = Ledger::from_bytes(&bytes).unwrap().replay(config).unwrap();
//! assert_eq!(replayed.snapshot(), engine.snapshot());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::{Command, GameConfig, GameError, GameRng, GameRngState};
use crate::rules::GameEngine;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger encoding failed: {0}")]
    Codec(#[from] bincode::Error),

    #[error("command {index} rejected during replay: {source}")]
    Replay {
        index: usize,
        #[source]
        source: GameError,
    },
}

/// Everything needed to rebuild a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Role picker state when the session opened.
    pub rng: GameRngState,

    /// Accepted commands: joins in join order, then the input log.
    pub commands: Vec<Command>,
}

impl Ledger {
    /// Capture the current session of `engine`.
    #[must_use]
    pub fn capture(engine: &GameEngine<GameRng>) -> Self {
        let joins = engine
            .players()
            .map(|p| Command::join(p.id().clone(), p.public_key().clone()));
        let commands = joins.chain(engine.input_log().iter().cloned()).collect();

        Self {
            rng: engine.session_picker().state(),
            commands,
        }
    }

    /// Rebuild the session under `config`.
    ///
    /// The config seed is superseded by the captured RNG state.
    pub fn replay(&self, config: GameConfig) -> Result<GameEngine<GameRng>, LedgerError> {
        let mut engine = GameEngine::with_picker(config, GameRng::from_state(&self.rng));

        for (index, command) in self.commands.iter().enumerate() {
            engine
                .handle(command.clone())
                .map_err(|source| LedgerError::Replay { index, source })?;
        }

        debug!(commands = self.commands.len(), "ledger replayed");
        Ok(engine)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        Ok(bincode::deserialize(bytes)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;

    #[test]
    fn test_empty_ledger() {
        let engine = GameEngine::new(GameConfig::standard());
        let ledger = Ledger::capture(&engine);

        assert!(ledger.is_empty());
        assert_eq!(ledger.rng, GameRng::new(0).state());
    }

    #[test]
    fn test_capture_lists_joins_in_order() {
        let mut engine = GameEngine::new(GameConfig::standard());
        engine.join("b", vec![2u8]).unwrap();
        engine.join("a", vec![1u8]).unwrap();

        let ledger = Ledger::capture(&engine);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.commands[0], Command::join("b", vec![2u8]));
        assert_eq!(ledger.commands[1], Command::join("a", vec![1u8]));
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut engine = GameEngine::new(GameConfig::standard().with_seed(11));
        engine.join("p1", vec![1u8]).unwrap();

        let ledger = Ledger::capture(&engine);
        let decoded = Ledger::from_bytes(&ledger.to_bytes().unwrap()).unwrap();
        assert_eq!(ledger, decoded);
    }

    #[test]
    fn test_corrupt_bytes_rejected() {
        let err = Ledger::from_bytes(&[0xff, 0x01]).unwrap_err();
        assert!(matches!(err, LedgerError::Codec(_)));
    }

    #[test]
    fn test_replay_reports_failing_index() {
        let ledger = Ledger {
            rng: GameRng::new(0).state(),
            commands: vec![
                Command::join("p1", vec![1u8]),
                Command::join("p1", vec![1u8]),
            ],
        };

        match ledger.replay(GameConfig::standard()) {
            Err(LedgerError::Replay { index, source }) => {
                assert_eq!(index, 1);
                assert_eq!(source.kind(), ErrorKind::DuplicateAction);
            }
            other => panic!("expected replay failure, got {other:?}"),
        }
    }
}
