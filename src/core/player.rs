//! Player identification and per-player status.
//!
//! ## PlayerId
//!
//! Stable external identifier supplied by the transport layer (an account
//! address, a session token). The engine only compares and orders ids.
//!
//! ## Player
//!
//! Plain status record. Fields are read through getters; writes go through
//! the validated mutators on [`PlayerRegistry`](crate::registry::PlayerRegistry).

use serde::{Deserialize, Serialize};

/// External player identifier, stable for the whole game.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque public key blob, forwarded to collaborators untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(pub Vec<u8>);

impl From<&[u8]> for PublicKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for PublicKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Opaque payload (encrypted role, encrypted move, moderator key).
///
/// The engine stores and returns payloads verbatim and never parses them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payload(pub Vec<u8>);

impl Payload {
    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

/// Player role. Written once when the roster fills.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Not yet assigned.
    #[default]
    Unknown,
    /// Runs dispatch and kill resolution; never moves or votes.
    Moderator,
    /// Chooses the night victim.
    Werewolf,
    /// Votes by day, submits decoy moves by night.
    Villager,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Unknown => "unknown",
            Role::Moderator => "moderator",
            Role::Werewolf => "werewolf",
            Role::Villager => "villager",
        };
        f.write_str(name)
    }
}

/// One participant and their per-phase flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) public_key: PublicKey,
    pub(crate) role: Role,
    pub(crate) alive: bool,
    pub(crate) can_be_voted: bool,
    pub(crate) has_voted: bool,
    pub(crate) has_moved: bool,
    pub(crate) votes_got: u32,
}

impl Player {
    /// Create a freshly joined player: role unknown, alive, votable.
    #[must_use]
    pub fn new(id: PlayerId, public_key: PublicKey) -> Self {
        Self {
            id,
            public_key,
            role: Role::Unknown,
            alive: true,
            can_be_voted: true,
            has_voted: false,
            has_moved: false,
            votes_got: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    #[must_use]
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn can_be_voted(&self) -> bool {
        self.can_be_voted
    }

    #[must_use]
    pub fn has_voted(&self) -> bool {
        self.has_voted
    }

    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    #[must_use]
    pub fn votes_got(&self) -> u32 {
        self.votes_got
    }

    /// Moderators sit outside the move and vote quorums.
    #[must_use]
    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }
}
