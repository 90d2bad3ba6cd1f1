//! Day/night state machine and round counter.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::registry::PlayerRegistry;
use crate::rules::Outcome;

/// Lifecycle phase.
///
/// `NotStarted -> Night` on dispatch, then `Night <-> Day` on every toggle.
/// The session ends only through Finish, which resets to `NotStarted`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Lobby: joins and role dispatch.
    #[default]
    NotStarted,
    /// Move collection and kill resolution.
    Night,
    /// Vote collection and elimination.
    Day,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::NotStarted => "lobby",
            Phase::Night => "night",
            Phase::Day => "day",
        };
        f.write_str(name)
    }
}

/// Owns the phase flag and round counter.
///
/// Both resolvers advance the game through [`PhaseController::toggle`];
/// nothing else changes `round`.
#[derive(Clone, Debug, Default)]
pub struct PhaseController {
    phase: Phase,
    round: u32,
    outcome: Option<Outcome>,
}

impl PhaseController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Completed night-to-day transitions.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn is_daytime(&self) -> bool {
        self.phase == Phase::Day
    }

    /// Roles dispatched and the game is (or was) under way.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.phase != Phase::NotStarted
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Enter the first night. Only valid from the lobby.
    pub(crate) fn start(&mut self, registry: &mut PlayerRegistry) {
        debug_assert_eq!(self.phase, Phase::NotStarted);
        self.phase = Phase::Day;
        self.toggle(registry);
    }

    /// Flip day and night.
    ///
    /// Clears the per-phase flags of every living player and increments
    /// `round` when entering daytime. Returns the new phase.
    pub fn toggle(&mut self, registry: &mut PlayerRegistry) -> Phase {
        self.phase = match self.phase {
            Phase::Day => Phase::Night,
            Phase::Night => Phase::Day,
            Phase::NotStarted => Phase::NotStarted,
        };

        registry.update_alive(|p| {
            p.has_moved = false;
            p.has_voted = false;
        });

        if self.phase == Phase::Day {
            self.round += 1;
        }

        debug!(phase = %self.phase, round = self.round, "phase toggled");
        self.phase
    }

    /// Advance after a death: record the winner if this death decided the
    /// game, then toggle.
    ///
    /// The outcome is advisory. Play continues until the moderator sends
    /// Finish, and the first decided outcome is kept.
    pub(crate) fn advance(&mut self, registry: &mut PlayerRegistry) -> Phase {
        if self.outcome.is_none() {
            self.outcome = Outcome::evaluate(registry);
            if let Some(outcome) = self.outcome {
                info!(%outcome, round = self.round, "game decided, awaiting finish");
            }
        }
        self.toggle(registry)
    }

    /// Back to an empty lobby.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
