//! Player registry: the roster, per-player flags, and the alive set.
//!
//! The registry is the only owner of [`Player`] records. Other components
//! read through [`PlayerRegistry::get`] and write through the validated
//! mutators below, so every flag change passes one precondition check.

use im::OrdSet;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::{Action, GameError, Ineligibility, Player, PlayerId, PublicKey, Role};

/// Result of a successful join.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinStatus {
    /// More seats remain.
    Open { remaining: usize },
    /// This join took the last seat; the roster is sealed.
    Full,
}

/// Roster of joined players in join order.
///
/// ## Example
///
/// ```
/// use werewolf_engine::core::{PlayerId, PublicKey};
/// use werewolf_engine::registry::{JoinStatus, PlayerRegistry};
///
/// let mut registry = PlayerRegistry::new(3);
///
/// let status = registry.join(PlayerId::new("p1"), PublicKey::default()).unwrap();
/// assert_eq!(status, JoinStatus::Open { remaining: 2 });
///
/// assert!(registry.join(PlayerId::new("p1"), PublicKey::default()).is_err());
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct PlayerRegistry {
    capacity: usize,
    players: Vec<Player>,
    index: FxHashMap<PlayerId, usize>,
    /// Living, non-moderator players. Populated at dispatch.
    alive: OrdSet<PlayerId>,
}

impl PlayerRegistry {
    /// Create an empty registry with `capacity` seats.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            players: Vec::with_capacity(capacity),
            index: FxHashMap::default(),
            alive: OrdSet::new(),
        }
    }

    /// Take a seat.
    ///
    /// Fails with `RosterClosed` once every seat is taken, and with
    /// `DuplicateAction` if `id` already joined.
    pub fn join(&mut self, id: PlayerId, public_key: PublicKey) -> Result<JoinStatus, GameError> {
        if self.is_full() {
            return Err(GameError::RosterClosed(self.capacity));
        }
        if self.index.contains_key(&id) {
            return Err(GameError::duplicate(&id, Action::Joined));
        }

        debug!(player = %id, seat = self.players.len(), "player joined");
        self.index.insert(id.clone(), self.players.len());
        self.players.push(Player::new(id, public_key));

        if self.is_full() {
            Ok(JoinStatus::Full)
        } else {
            Ok(JoinStatus::Open {
                remaining: self.capacity - self.players.len(),
            })
        }
    }

    /// Look up a player.
    pub fn get(&self, id: &PlayerId) -> Result<&Player, GameError> {
        self.index
            .get(id)
            .map(|&i| &self.players[i])
            .ok_or_else(|| GameError::InvalidPlayer(id.clone()))
    }

    #[must_use]
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.index.contains_key(id)
    }

    /// Number of joined players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Every seat is taken; no further joins are accepted.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.players.len() >= self.capacity
    }

    /// Iterate over players in join order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Iterate over player IDs in join order.
    pub fn ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.iter().map(Player::id)
    }

    /// Living, non-moderator players.
    #[must_use]
    pub fn alive(&self) -> &OrdSet<PlayerId> {
        &self.alive
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }

    #[must_use]
    pub fn is_alive(&self, id: &PlayerId) -> bool {
        self.alive.contains(id)
    }

    /// Iterate over living players in join order.
    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| self.alive.contains(&p.id))
    }

    /// The player holding the moderator role, once assigned.
    #[must_use]
    pub fn moderator(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_moderator())
    }

    /// Count living players holding `role`.
    #[must_use]
    pub fn alive_with_role(&self, role: Role) -> usize {
        self.alive_players().filter(|p| p.role == role).count()
    }

    // === Mutators ===

    /// Assign a role. Roles are write-once.
    pub fn set_role(&mut self, id: &PlayerId, role: Role) -> Result<(), GameError> {
        let player = self.player_mut(id)?;
        if player.role != Role::Unknown {
            return Err(GameError::duplicate(id, Action::ReceivedRole));
        }
        player.role = role;
        Ok(())
    }

    /// Seat the dispatched players as the alive set.
    ///
    /// Every id must be registered; unknown ids are rejected before the set
    /// is replaced.
    pub fn set_alive_set<'a, I>(&mut self, ids: I) -> Result<(), GameError>
    where
        I: IntoIterator<Item = &'a PlayerId>,
    {
        let mut alive = OrdSet::new();
        for id in ids {
            self.get(id)?;
            alive.insert(id.clone());
        }
        self.alive = alive;
        Ok(())
    }

    /// Mark a living player dead and remove them from the alive set.
    ///
    /// This is the only way `alive` changes; it never flips back.
    pub fn kill(&mut self, id: &PlayerId) -> Result<(), GameError> {
        let player = self.get(id)?;
        if player.is_moderator() {
            return Err(GameError::ineligible(id, Ineligibility::Moderator));
        }
        if !player.alive || !self.alive.contains(id) {
            return Err(GameError::ineligible(id, Ineligibility::Dead));
        }

        self.player_mut(id)?.alive = false;
        self.alive.remove(id);
        Ok(())
    }

    pub fn set_can_be_voted(&mut self, id: &PlayerId, can_be_voted: bool) -> Result<(), GameError> {
        self.player_mut(id)?.can_be_voted = can_be_voted;
        Ok(())
    }

    /// Set the voted flag. Setting it twice in one round is a duplicate vote.
    pub fn set_has_voted(&mut self, id: &PlayerId, has_voted: bool) -> Result<(), GameError> {
        let player = self.player_mut(id)?;
        if has_voted && player.has_voted {
            return Err(GameError::duplicate(id, Action::Voted));
        }
        player.has_voted = has_voted;
        Ok(())
    }

    /// Set the moved flag. Setting it twice in one night is a duplicate move.
    pub fn set_has_moved(&mut self, id: &PlayerId, has_moved: bool) -> Result<(), GameError> {
        let player = self.player_mut(id)?;
        if has_moved && player.has_moved {
            return Err(GameError::duplicate(id, Action::Moved));
        }
        player.has_moved = has_moved;
        Ok(())
    }

    pub fn set_votes_got(&mut self, id: &PlayerId, votes_got: u32) -> Result<(), GameError> {
        self.player_mut(id)?.votes_got = votes_got;
        Ok(())
    }

    /// Apply `f` to every living player.
    pub(crate) fn update_alive(&mut self, mut f: impl FnMut(&mut Player)) {
        let alive = &self.alive;
        for player in self.players.iter_mut().filter(|p| alive.contains(&p.id)) {
            f(player);
        }
    }

    /// Drop every player and reopen all seats.
    pub(crate) fn clear(&mut self) {
        self.players.clear();
        self.index.clear();
        self.alive = OrdSet::new();
    }

    fn player_mut(&mut self, id: &PlayerId) -> Result<&mut Player, GameError> {
        match self.index.get(id) {
            Some(&i) => Ok(&mut self.players[i]),
            None => Err(GameError::InvalidPlayer(id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;

    fn pid(id: &str) -> PlayerId {
        PlayerId::new(id)
    }

    fn full_registry() -> PlayerRegistry {
        let mut registry = PlayerRegistry::new(6);
        for i in 1..=6 {
            registry.join(pid(&format!("p{i}")), PublicKey::default()).unwrap();
        }
        registry
    }

    #[test]
    fn test_join_until_full() {
        let mut registry = PlayerRegistry::new(6);

        for i in 1..=5 {
            let status = registry.join(pid(&format!("p{i}")), PublicKey::default()).unwrap();
            assert_eq!(status, JoinStatus::Open { remaining: 6 - i });
        }

        let status = registry.join(pid("p6"), PublicKey::default()).unwrap();
        assert_eq!(status, JoinStatus::Full);
        assert!(registry.is_full());

        let err = registry.join(pid("p7"), PublicKey::default()).unwrap_err();
        assert_eq!(err, GameError::RosterClosed(6));
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_duplicate_join_rejected() {
        let mut registry = PlayerRegistry::new(6);
        registry.join(pid("p1"), PublicKey::from(vec![1])).unwrap();

        let err = registry.join(pid("p1"), PublicKey::from(vec![2])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateAction);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&pid("p1")).unwrap().public_key().0, vec![1]);
    }

    #[test]
    fn test_join_order_preserved() {
        let registry = full_registry();
        let ids: Vec<_> = registry.ids().map(PlayerId::as_str).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3", "p4", "p5", "p6"]);
    }

    #[test]
    fn test_get_unknown_player() {
        let registry = full_registry();
        assert_eq!(
            registry.get(&pid("ghost")).unwrap_err(),
            GameError::InvalidPlayer(pid("ghost"))
        );
    }

    #[test]
    fn test_role_is_write_once() {
        let mut registry = full_registry();

        registry.set_role(&pid("p1"), Role::Moderator).unwrap();
        let err = registry.set_role(&pid("p1"), Role::Villager).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateAction);
        assert_eq!(registry.get(&pid("p1")).unwrap().role(), Role::Moderator);
        assert_eq!(registry.moderator().unwrap().id(), &pid("p1"));
    }

    #[test]
    fn test_kill_is_monotonic() {
        let mut registry = full_registry();
        registry.set_alive_set([pid("p2"), pid("p3")].iter()).unwrap();

        registry.kill(&pid("p2")).unwrap();
        assert!(!registry.get(&pid("p2")).unwrap().is_alive());
        assert!(!registry.is_alive(&pid("p2")));
        assert_eq!(registry.alive_count(), 1);

        let err = registry.kill(&pid("p2")).unwrap_err();
        assert_eq!(err, GameError::ineligible(&pid("p2"), Ineligibility::Dead));
        assert_eq!(registry.alive_count(), 1);
    }

    #[test]
    fn test_moderator_cannot_be_killed() {
        let mut registry = full_registry();
        registry.set_role(&pid("p1"), Role::Moderator).unwrap();
        registry.set_alive_set([pid("p2")].iter()).unwrap();

        let err = registry.kill(&pid("p1")).unwrap_err();
        assert_eq!(err, GameError::ineligible(&pid("p1"), Ineligibility::Moderator));
    }

    #[test]
    fn test_set_alive_set_rejects_unknown() {
        let mut registry = full_registry();
        registry.set_alive_set([pid("p2")].iter()).unwrap();

        let err = registry.set_alive_set([pid("p3"), pid("ghost")].iter()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPlayer);
        assert_eq!(registry.alive_count(), 1);
        assert!(registry.is_alive(&pid("p2")));
    }

    #[test]
    fn test_double_vote_and_move_flags() {
        let mut registry = full_registry();

        registry.set_has_voted(&pid("p2"), true).unwrap();
        assert_eq!(
            registry.set_has_voted(&pid("p2"), true).unwrap_err().kind(),
            ErrorKind::DuplicateAction
        );
        registry.set_has_voted(&pid("p2"), false).unwrap();
        assert!(!registry.get(&pid("p2")).unwrap().has_voted());

        registry.set_has_moved(&pid("p3"), true).unwrap();
        assert_eq!(
            registry.set_has_moved(&pid("p3"), true).unwrap_err().kind(),
            ErrorKind::DuplicateAction
        );
    }

    #[test]
    fn test_update_alive_skips_dead_and_moderator() {
        let mut registry = full_registry();
        registry.set_role(&pid("p1"), Role::Moderator).unwrap();
        registry.set_alive_set([pid("p2"), pid("p3")].iter()).unwrap();
        registry.kill(&pid("p3")).unwrap();

        registry.update_alive(|p| p.votes_got = 9);

        assert_eq!(registry.get(&pid("p1")).unwrap().votes_got(), 0);
        assert_eq!(registry.get(&pid("p2")).unwrap().votes_got(), 9);
        assert_eq!(registry.get(&pid("p3")).unwrap().votes_got(), 0);
    }

    #[test]
    fn test_clear_reopens_seats() {
        let mut registry = full_registry();
        registry.clear();

        assert!(registry.is_empty());
        assert!(!registry.is_full());
        assert!(registry.join(pid("p1"), PublicKey::default()).is_ok());
    }
}
