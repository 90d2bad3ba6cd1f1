//! Player registry.
//!
//! Holds the roster in join order, every player's mutable status, and the
//! set of living non-moderator players that the move and vote quorums are
//! measured against.

mod roster;

pub use roster::{JoinStatus, PlayerRegistry};
