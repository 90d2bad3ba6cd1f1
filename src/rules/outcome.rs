//! Win detection.

use serde::{Deserialize, Serialize};

use crate::core::Role;
use crate::registry::PlayerRegistry;

/// Winner of a decided game.
///
/// Villagers win once no werewolf is alive. Werewolves win once they are
/// at least as many as the living villagers, since from there no day vote
/// can outnumber them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// No werewolf is alive.
    VillagersWin,
    /// Living werewolves match or outnumber living villagers.
    WerewolvesWin,
}

impl Outcome {
    /// Check the alive set for a winner.
    ///
    /// Returns `None` while the villagers still outnumber a living werewolf.
    #[must_use]
    pub fn evaluate(registry: &PlayerRegistry) -> Option<Outcome> {
        let werewolves = registry.alive_with_role(Role::Werewolf);
        if werewolves == 0 {
            Some(Outcome::VillagersWin)
        } else if werewolves >= registry.alive_with_role(Role::Villager) {
            Some(Outcome::WerewolvesWin)
        } else {
            None
        }
    }

    /// Role whose party won.
    #[must_use]
    pub fn winning_role(self) -> Role {
        match self {
            Outcome::VillagersWin => Role::Villager,
            Outcome::WerewolvesWin => Role::Werewolf,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::VillagersWin => f.write_str("villagers win"),
            Outcome::WerewolvesWin => f.write_str("werewolves win"),
        }
    }
}
