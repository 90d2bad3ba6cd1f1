//! # werewolf-engine
//!
//! Authoritative state machine for a six-player hidden-role game: one
//! Moderator, one Werewolf, four Villagers.
//!
//! ## Design Principles
//!
//! 1. **Transport-Agnostic**: Commands arrive one at a time from whatever
//!    carries them (a chain, a poller, an RPC). The engine never talks to
//!    the network.
//!
//! 2. **Opaque Payloads**: Encrypted roles and moves are stored and
//!    forwarded verbatim. Only identifiers the caller has already
//!    authenticated (voter, candidate, victim) are interpreted.
//!
//! 3. **Validate, Then Apply**: Every rejected command leaves the game
//!    exactly as it was.
//!
//! 4. **Deterministic**: Role selection draws from an injected, seedable
//!    picker, so a ledger of accepted commands replays identically.
//!
//! ## Modules
//!
//! - `core`: Player ids, roles, commands, configuration, RNG, errors, snapshots
//! - `registry`: Roster and per-player status
//! - `roles`: Moderator/werewolf draw and encrypted role dispatch
//! - `phase`: Night/day toggling and round counting
//! - `moves`: Night moves and kill resolution
//! - `votes`: Day votes, ties, and revotes
//! - `rules`: The `GameEngine` entry point and win detection
//! - `ledger`: Command ledger encoding and replay

pub mod core;
pub mod registry;
pub mod roles;
pub mod phase;
pub mod moves;
pub mod votes;
pub mod rules;
pub mod ledger;

// Re-export commonly used types
pub use crate::core::{
    Command, CommandKind, MoveRecord,
    Action, ErrorKind, GameError, Ineligibility, Precondition,
    GameConfig, GameRng, GameRngState, RolePicker,
    Payload, Player, PlayerId, PublicKey, Role,
    Snapshot,
};

pub use crate::registry::{JoinStatus, PlayerRegistry};

pub use crate::roles::{RoleAssignment, RoleDispatcher, RoleGrant};

pub use crate::phase::{Phase, PhaseController};

pub use crate::moves::MoveResolver;

pub use crate::votes::{TallyResult, VoteTally};

pub use crate::rules::{GameEngine, GameRecord, Outcome, Response};

pub use crate::ledger::{Ledger, LedgerError};
