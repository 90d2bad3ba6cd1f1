//! Role selection and dispatch.
//!
//! Dispatch is two-step. When the roster fills, [`RoleDispatcher::assign`]
//! draws the moderator and werewolves and writes the plaintext roles into
//! the registry, handing back one [`RoleGrant`] per non-moderator for the
//! collaborator to encrypt under that player's key. The collaborator then
//! returns the encrypted payloads through [`RoleDispatcher::dispatch`], which
//! stores them verbatim and starts the game.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::info;

use crate::core::{
    Action, CommandKind, GameError, Ineligibility, Payload, PlayerId, Precondition, PublicKey,
    Role, RolePicker,
};
use crate::phase::{Phase, PhaseController};
use crate::registry::PlayerRegistry;

/// Plaintext role paired with the key it must be encrypted under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub player: PlayerId,
    pub role: Role,
    pub public_key: PublicKey,
}

/// Result of role selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// The drawn moderator. Receives no grant.
    pub moderator: PlayerId,

    /// One grant per non-moderator, in join order.
    pub grants: Vec<RoleGrant>,
}

impl RoleAssignment {
    /// Role drawn for `player`, if they were part of the assignment.
    #[must_use]
    pub fn role_of(&self, player: &PlayerId) -> Option<Role> {
        if *player == self.moderator {
            return Some(Role::Moderator);
        }
        self.grants.iter().find(|g| g.player == *player).map(|g| g.role)
    }

    /// Players drawn as werewolves.
    pub fn werewolves(&self) -> impl Iterator<Item = &PlayerId> {
        self.grants
            .iter()
            .filter(|g| g.role == Role::Werewolf)
            .map(|g| &g.player)
    }
}

/// Draws roles and stores the encrypted role payloads.
#[derive(Clone, Debug, Default)]
pub struct RoleDispatcher {
    assignment: Option<RoleAssignment>,
    encrypted_roles: BTreeMap<PlayerId, Payload>,
}

impl RoleDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the moderator uniformly over the full roster, then `werewolves`
    /// uniformly over the rest; everyone else is a villager.
    ///
    /// The moderator is made unvotable. Fails if the roster is not full, any
    /// role is already set, or the picker returns an out-of-range index; the
    /// registry is untouched on failure.
    pub fn assign<R: RolePicker>(
        &mut self,
        registry: &mut PlayerRegistry,
        picker: &mut R,
        werewolves: usize,
    ) -> Result<RoleAssignment, GameError> {
        if !registry.is_full() {
            return Err(GameError::InvalidPhase {
                command: CommandKind::DispatchRoles,
                phase: Phase::NotStarted,
            });
        }
        if let Some(player) = registry.players().find(|p| p.role() != Role::Unknown) {
            return Err(GameError::duplicate(player.id(), Action::ReceivedRole));
        }

        let mut pool: SmallVec<[PlayerId; 6]> = registry.ids().cloned().collect();
        let moderator = draw(&mut pool, picker)?;
        let mut wolves: SmallVec<[PlayerId; 2]> = SmallVec::new();
        for _ in 0..werewolves.min(pool.len()) {
            wolves.push(draw(&mut pool, picker)?);
        }

        registry.set_role(&moderator, Role::Moderator)?;
        registry.set_can_be_voted(&moderator, false)?;
        for wolf in &wolves {
            registry.set_role(wolf, Role::Werewolf)?;
        }
        for villager in &pool {
            registry.set_role(villager, Role::Villager)?;
        }

        let grants = registry
            .players()
            .filter(|p| !p.is_moderator())
            .map(|p| RoleGrant {
                player: p.id().clone(),
                role: p.role(),
                public_key: p.public_key().clone(),
            })
            .collect();

        info!(moderator = %moderator, "roles assigned");
        let assignment = RoleAssignment { moderator, grants };
        self.assignment = Some(assignment.clone());
        Ok(assignment)
    }

    /// Store the encrypted roles, seat the dispatched players as the alive
    /// set, and enter the first night.
    ///
    /// The mapping must cover exactly the non-moderator roster.
    pub fn dispatch(
        &mut self,
        registry: &mut PlayerRegistry,
        phase: &mut PhaseController,
        roles: BTreeMap<PlayerId, Payload>,
    ) -> Result<(), GameError> {
        if phase.is_started() {
            return Err(GameError::InvalidPhase {
                command: CommandKind::DispatchRoles,
                phase: phase.phase(),
            });
        }
        if !registry.is_full() || self.assignment.is_none() {
            return Err(GameError::InvalidPhase {
                command: CommandKind::DispatchRoles,
                phase: Phase::NotStarted,
            });
        }

        for id in roles.keys() {
            if registry.get(id)?.is_moderator() {
                return Err(GameError::ineligible(id, Ineligibility::Moderator));
            }
        }
        if let Some(missing) = registry
            .players()
            .find(|p| !p.is_moderator() && !roles.contains_key(p.id()))
        {
            return Err(GameError::PreconditionNotMet(Precondition::RoleMissing(
                missing.id().clone(),
            )));
        }

        registry.set_alive_set(roles.keys())?;
        self.encrypted_roles = roles;
        phase.start(registry);

        info!(alive = registry.alive_count(), "roles dispatched, first night begins");
        Ok(())
    }

    /// The pending or completed assignment.
    #[must_use]
    pub fn assignment(&self) -> Option<&RoleAssignment> {
        self.assignment.as_ref()
    }

    /// Stored encrypted roles, keyed by player.
    #[must_use]
    pub fn encrypted_roles(&self) -> &BTreeMap<PlayerId, Payload> {
        &self.encrypted_roles
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Remove one uniformly picked id from `pool`.
fn draw<R: RolePicker>(
    pool: &mut SmallVec<[PlayerId; 6]>,
    picker: &mut R,
) -> Result<PlayerId, GameError> {
    let upper = pool.len();
    let index = picker.pick(upper);
    if index >= upper {
        return Err(GameError::PreconditionNotMet(Precondition::PickOutOfRange {
            index,
            upper,
        }));
    }
    Ok(pool.remove(index))
}
