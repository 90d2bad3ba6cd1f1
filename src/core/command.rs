//! Commands delivered to the engine and the records it keeps of them.
//!
//! A command is one discrete request from the transport layer. Wire encoding
//! is not the engine's concern; commands are plain serde values so that a
//! collaborator can pick whatever framing it likes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::player::{Payload, PlayerId, PublicKey};

/// A complete engine command.
///
/// ## Example
///
/// ```
/// use werewolf_engine::core::{Command, CommandKind};
///
/// let join = Command::join("0xf39F", b"public key".to_vec());
/// assert_eq!(join.kind(), CommandKind::Join);
///
/// let vote = Command::vote("p1", "p3");
/// assert_eq!(vote.kind(), CommandKind::Vote);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Take a seat in the lobby.
    Join { id: PlayerId, public_key: PublicKey },

    /// Store the encrypted role for every non-moderator and start the game.
    DispatchRoles { roles: BTreeMap<PlayerId, Payload> },

    /// Submit an opaque night move (real or decoy).
    Move { player: PlayerId, payload: Payload },

    /// Apply the moderator's decrypted kill decision.
    Kill { victim: PlayerId },

    /// Cast a day vote.
    Vote { voter: PlayerId, candidate: PlayerId },

    /// End the session, revealing the moderator key for audit.
    Finish { moderator_key: Payload },
}

impl Command {
    pub fn join(id: impl Into<PlayerId>, public_key: impl Into<PublicKey>) -> Self {
        Command::Join {
            id: id.into(),
            public_key: public_key.into(),
        }
    }

    pub fn dispatch_roles<I, K, P>(roles: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<PlayerId>,
        P: Into<Payload>,
    {
        Command::DispatchRoles {
            roles: roles
                .into_iter()
                .map(|(id, payload)| (id.into(), payload.into()))
                .collect(),
        }
    }

    pub fn moves(player: impl Into<PlayerId>, payload: impl Into<Payload>) -> Self {
        Command::Move {
            player: player.into(),
            payload: payload.into(),
        }
    }

    pub fn kill(victim: impl Into<PlayerId>) -> Self {
        Command::Kill {
            victim: victim.into(),
        }
    }

    pub fn vote(voter: impl Into<PlayerId>, candidate: impl Into<PlayerId>) -> Self {
        Command::Vote {
            voter: voter.into(),
            candidate: candidate.into(),
        }
    }

    pub fn finish(moderator_key: impl Into<Payload>) -> Self {
        Command::Finish {
            moderator_key: moderator_key.into(),
        }
    }

    /// Fieldless discriminant, for errors and logging.
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Join { .. } => CommandKind::Join,
            Command::DispatchRoles { .. } => CommandKind::DispatchRoles,
            Command::Move { .. } => CommandKind::Move,
            Command::Kill { .. } => CommandKind::Kill,
            Command::Vote { .. } => CommandKind::Vote,
            Command::Finish { .. } => CommandKind::Finish,
        }
    }
}

/// Command discriminant without its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    Join,
    DispatchRoles,
    Move,
    Kill,
    Vote,
    Finish,
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CommandKind::Join => "join",
            CommandKind::DispatchRoles => "dispatch-roles",
            CommandKind::Move => "move",
            CommandKind::Kill => "kill",
            CommandKind::Vote => "vote",
            CommandKind::Finish => "finish",
        };
        f.write_str(name)
    }
}

/// A recorded night move with metadata for audit and replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The player who moved.
    pub player: PlayerId,

    /// Round the move was submitted in (night before day `round + 1`).
    pub round: u32,

    /// Position within the whole game's move history.
    pub sequence: u32,

    /// The encrypted move, verbatim.
    pub payload: Payload,
}

impl MoveRecord {
    #[must_use]
    pub fn new(player: PlayerId, round: u32, sequence: u32, payload: Payload) -> Self {
        Self {
            player,
            round,
            sequence,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_kinds() {
        assert_eq!(Command::join("p1", vec![1u8]).kind(), CommandKind::Join);
        assert_eq!(
            Command::dispatch_roles([("p2", "r2")]).kind(),
            CommandKind::DispatchRoles
        );
        assert_eq!(Command::moves("p2", "NOTHING").kind(), CommandKind::Move);
        assert_eq!(Command::kill("p6").kind(), CommandKind::Kill);
        assert_eq!(Command::vote("p1", "p2").kind(), CommandKind::Vote);
        assert_eq!(Command::finish("key").kind(), CommandKind::Finish);
    }

    #[test]
    fn test_dispatch_roles_collects_mapping() {
        let command = Command::dispatch_roles([("p3", "c"), ("p2", "b")]);

        match command {
            Command::DispatchRoles { roles } => {
                let ids: Vec<_> = roles.keys().map(PlayerId::as_str).collect();
                assert_eq!(ids, vec!["p2", "p3"]);
                assert_eq!(roles[&PlayerId::new("p3")], Payload::from("c"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_command_kind_display() {
        assert_eq!(format!("{}", CommandKind::DispatchRoles), "dispatch-roles");
        assert_eq!(format!("{}", CommandKind::Vote), "vote");
    }

    #[test]
    fn test_command_serialization() {
        let command = Command::vote("p1", "p4");
        let json = serde_json::to_string(&command).unwrap();
        let deserialized: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(command, deserialized);
    }

    #[test]
    fn test_move_record() {
        let record = MoveRecord::new(PlayerId::new("p2"), 0, 3, Payload::from("NOTHING"));

        assert_eq!(record.player, PlayerId::new("p2"));
        assert_eq!(record.round, 0);
        assert_eq!(record.sequence, 3);
        assert_eq!(record.payload, Payload::from("NOTHING"));
    }
}
