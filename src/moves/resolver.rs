//! Night-phase move collection and kill resolution.
//!
//! Every living player submits a move each night: the werewolf's real
//! target and everyone else's decoy, all encrypted and indistinguishable
//! here. The moderator's decrypted kill decision only applies once the
//! whole quorum has moved.

use im::Vector;
use tracing::{debug, info};

use crate::core::{
    Action, CommandKind, GameError, Ineligibility, MoveRecord, Payload, PlayerId, Precondition,
};
use crate::phase::{Phase, PhaseController};
use crate::registry::PlayerRegistry;

/// Collects night moves and applies the kill.
#[derive(Clone, Debug, Default)]
pub struct MoveResolver {
    moves: usize,
    history: Vector<MoveRecord>,
}

impl MoveResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves submitted this night.
    #[must_use]
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Every move of the game, in submission order.
    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    /// Record a night move.
    ///
    /// Returns the number of moves still outstanding.
    pub fn handle_move(
        &mut self,
        registry: &mut PlayerRegistry,
        phase: &PhaseController,
        player_id: &PlayerId,
        payload: Payload,
    ) -> Result<usize, GameError> {
        if phase.phase() != Phase::Night {
            return Err(GameError::InvalidPhase {
                command: CommandKind::Move,
                phase: phase.phase(),
            });
        }

        let player = registry.get(player_id)?;
        if player.is_moderator() {
            return Err(GameError::ineligible(player_id, Ineligibility::Moderator));
        }
        if !player.is_alive() || !registry.is_alive(player_id) {
            return Err(GameError::ineligible(player_id, Ineligibility::Dead));
        }
        if player.has_moved() {
            return Err(GameError::duplicate(player_id, Action::Moved));
        }

        registry.set_has_moved(player_id, true)?;
        self.moves += 1;
        let sequence = self.history.len() as u32;
        self.history.push_back(MoveRecord::new(
            player_id.clone(),
            phase.round(),
            sequence,
            payload,
        ));

        let outstanding = registry.alive_count().saturating_sub(self.moves);
        debug!(player = %player_id, outstanding, "move recorded");
        Ok(outstanding)
    }

    /// Kill `victim_id` and leave the night.
    ///
    /// Requires every living player to have moved. A victim who never
    /// joined is an ineligible target, not an unknown sender. Returns the
    /// phase the game entered, always `Day`.
    pub fn handle_kill(
        &mut self,
        registry: &mut PlayerRegistry,
        phase: &mut PhaseController,
        victim_id: &PlayerId,
    ) -> Result<Phase, GameError> {
        if phase.phase() != Phase::Night {
            return Err(GameError::InvalidPhase {
                command: CommandKind::Kill,
                phase: phase.phase(),
            });
        }

        let required = registry.alive_count();
        if self.moves != required {
            return Err(GameError::PreconditionNotMet(
                Precondition::MovesOutstanding {
                    submitted: self.moves,
                    required,
                },
            ));
        }

        let victim = registry
            .get(victim_id)
            .map_err(|_| GameError::ineligible(victim_id, Ineligibility::NotSeated))?;
        if victim.is_moderator() {
            return Err(GameError::ineligible(victim_id, Ineligibility::Moderator));
        }
        if !victim.is_alive() || !registry.is_alive(victim_id) {
            return Err(GameError::ineligible(victim_id, Ineligibility::Dead));
        }

        registry.kill(victim_id)?;
        self.moves = 0;
        let next = phase.advance(registry);

        info!(victim = %victim_id, round = phase.round(), "night kill resolved");
        Ok(next)
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
