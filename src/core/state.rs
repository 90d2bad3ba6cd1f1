//! Read-only snapshot for polling collaborators.
//!
//! Front ends poll the engine rather than block on it. A [`Snapshot`] is a
//! cheap clone (the alive set is an `im` persistent set) that answers every
//! question a poller asks: which phase, which round, who is alive, how many
//! moves or votes are still outstanding, whether a revote is pending.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::phase::Phase;
use crate::rules::Outcome;

/// Observable game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Lifecycle phase.
    pub phase: Phase,

    /// Completed night-to-day transitions.
    pub round: u32,

    pub is_daytime: bool,

    /// Roles have been dispatched.
    pub started: bool,

    /// A side has won. Play continues until the moderator sends Finish.
    pub finished: bool,

    pub outcome: Option<Outcome>,

    /// Living, non-moderator players.
    pub alive: OrdSet<PlayerId>,

    pub moves_cast: usize,

    /// Moves still required before the kill can resolve (zero outside night).
    pub moves_needed: usize,

    pub votes_cast: usize,

    /// Votes still required before the tally resolves (zero outside day).
    pub votes_needed: usize,

    /// The last tally tied and a restricted revote is under way.
    pub revote: bool,

    /// Living players who may currently receive votes, in join order.
    pub candidates: Vec<PlayerId>,
}

impl Snapshot {
    /// True when `self` reflects a phase change relative to `earlier`.
    ///
    /// Pollers compare `round` and `is_daytime`; a finish or reset also
    /// counts as a change.
    #[must_use]
    pub fn phase_changed_since(&self, earlier: &Snapshot) -> bool {
        self.round != earlier.round
            || self.is_daytime != earlier.is_daytime
            || self.phase != earlier.phase
    }

    /// Check if a player is still alive.
    #[must_use]
    pub fn is_alive(&self, player: &PlayerId) -> bool {
        self.alive.contains(player)
    }
}
