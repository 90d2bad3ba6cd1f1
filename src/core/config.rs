//! Game configuration.
//!
//! The standard table is six seats: one Moderator, one Werewolf, four
//! Villagers. Sessions can be configured with a different roster size or
//! werewolf count, but every rule in the engine is expressed against the
//! configured numbers rather than hardcoded ones.

use serde::{Deserialize, Serialize};

/// Seats at the standard table.
pub const DEFAULT_ROSTER_SIZE: usize = 6;

/// Werewolves at the standard table.
pub const DEFAULT_WEREWOLVES: usize = 1;

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of joins that fill the roster (moderator included).
    pub roster_size: usize,

    /// Werewolves drawn from the non-moderator players.
    pub werewolves: usize,

    /// Seed for the default role picker.
    pub seed: u64,
}

impl GameConfig {
    /// Create a configuration for `roster_size` seats with one werewolf.
    pub fn new(roster_size: usize) -> Self {
        assert!(roster_size >= 3, "Roster needs at least 3 seats");

        Self {
            roster_size,
            werewolves: DEFAULT_WEREWOLVES,
            seed: 0,
        }
    }

    /// The six-seat table.
    pub fn standard() -> Self {
        Self::new(DEFAULT_ROSTER_SIZE)
    }

    /// Set the werewolf count.
    ///
    /// At least one villager must remain beside the moderator and werewolves.
    #[must_use]
    pub fn with_werewolves(mut self, werewolves: usize) -> Self {
        assert!(werewolves >= 1, "Must have at least 1 werewolf");
        assert!(
            werewolves + 2 <= self.roster_size,
            "Werewolves must leave room for a moderator and a villager"
        );
        self.werewolves = werewolves;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Players who move and vote (everyone but the moderator).
    #[must_use]
    pub fn combatants(&self) -> usize {
        self.roster_size - 1
    }

    /// Villagers at dispatch time.
    #[must_use]
    pub fn villagers(&self) -> usize {
        self.combatants() - self.werewolves
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}
