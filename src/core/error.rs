//! Engine error taxonomy.
//!
//! Every rejected command returns one of these and leaves the game untouched.
//! Variants carry typed context so callers can match on the reason instead
//! of parsing messages; [`GameError::kind`] gives the coarse category.

use thiserror::Error;

use super::command::CommandKind;
use super::player::PlayerId;
use crate::phase::Phase;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("unknown player {0}")]
    InvalidPlayer(PlayerId),

    #[error("{command} is not allowed during {phase}")]
    InvalidPhase { command: CommandKind, phase: Phase },

    #[error("roster is closed: all {0} seats are taken")]
    RosterClosed(usize),

    #[error("{player} has already {action}")]
    DuplicateAction { player: PlayerId, action: Action },

    #[error("{player} is not eligible: {reason}")]
    IneligibleTarget {
        player: PlayerId,
        reason: Ineligibility,
    },

    #[error("precondition not met: {0}")]
    PreconditionNotMet(Precondition),
}

impl GameError {
    /// Coarse category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidPlayer(_) => ErrorKind::InvalidPlayer,
            GameError::InvalidPhase { .. } | GameError::RosterClosed(_) => ErrorKind::InvalidPhase,
            GameError::DuplicateAction { .. } => ErrorKind::DuplicateAction,
            GameError::IneligibleTarget { .. } => ErrorKind::IneligibleTarget,
            GameError::PreconditionNotMet(_) => ErrorKind::PreconditionNotMet,
        }
    }

    pub(crate) fn ineligible(player: &PlayerId, reason: Ineligibility) -> Self {
        GameError::IneligibleTarget {
            player: player.clone(),
            reason,
        }
    }

    pub(crate) fn duplicate(player: &PlayerId, action: Action) -> Self {
        GameError::DuplicateAction {
            player: player.clone(),
            action,
        }
    }
}

/// Fieldless error category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidPlayer,
    InvalidPhase,
    DuplicateAction,
    IneligibleTarget,
    PreconditionNotMet,
}

/// Once-per-phase (or once-per-game) actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Joined,
    Moved,
    Voted,
    ReceivedRole,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Action::Joined => "joined",
            Action::Moved => "moved this night",
            Action::Voted => "voted this round",
            Action::ReceivedRole => "received a role",
        };
        f.write_str(text)
    }
}

/// Why an existing player cannot act or be targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ineligibility {
    Dead,
    NotVotable,
    Moderator,
    /// Named as a target but never joined.
    NotSeated,
}

impl std::fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Ineligibility::Dead => "already dead",
            Ineligibility::NotVotable => "cannot be voted this round",
            Ineligibility::Moderator => "the moderator neither moves nor votes",
            Ineligibility::NotSeated => "not seated at this table",
        };
        f.write_str(text)
    }
}

/// Structural preconditions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Precondition {
    /// Kill attempted before every living player moved.
    MovesOutstanding { submitted: usize, required: usize },
    /// Tally attempted before every living player voted.
    VotesOutstanding { submitted: usize, required: usize },
    /// Dispatch mapping is missing a non-moderator player.
    RoleMissing(PlayerId),
    /// The role picker broke its contract and returned `index >= upper`.
    PickOutOfRange { index: usize, upper: usize },
}

impl std::fmt::Display for Precondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precondition::MovesOutstanding {
                submitted,
                required,
            } => write!(f, "everyone must move ({submitted}/{required})"),
            Precondition::VotesOutstanding {
                submitted,
                required,
            } => write!(f, "everyone must vote ({submitted}/{required})"),
            Precondition::RoleMissing(player) => write!(f, "no role payload for {player}"),
            Precondition::PickOutOfRange { index, upper } => {
                write!(f, "role picker returned {index} for {upper} candidates")
            }
        }
    }
}
