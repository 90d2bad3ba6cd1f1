//! Core engine types: players, commands, configuration, RNG, errors, snapshots.
//!
//! Components in the other modules build on these; nothing here holds
//! session state of its own.

pub mod player;
pub mod rng;
pub mod config;
pub mod command;
pub mod error;
pub mod state;

pub use player::{Payload, Player, PlayerId, PublicKey, Role};
pub use rng::{GameRng, GameRngState, RolePicker};
pub use config::{GameConfig, DEFAULT_ROSTER_SIZE, DEFAULT_WEREWOLVES};
pub use command::{Command, CommandKind, MoveRecord};
pub use error::{Action, ErrorKind, GameError, Ineligibility, Precondition};
pub use state::Snapshot;
