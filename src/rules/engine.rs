//! The game engine: single command entry point and snapshot surface.
//!
//! `GameEngine` composes the registry, dispatcher, phase controller and the
//! two resolvers. Commands are processed one at a time through
//! [`GameEngine::handle`]; each runs to completion before the next is
//! admitted, and a rejected command leaves every component untouched.
//!
//! ## Implementation Notes
//!
//! - The engine takes `&mut self` for every command. Services that accept
//!   concurrent submissions must funnel them through one owner (a mutex or
//!   an actor) so that the move and vote counters are never interleaved.
//! - Nothing blocks. "Waiting for everyone" is a counter comparison; pollers
//!   read [`GameEngine::snapshot`] and retry.

use std::collections::BTreeMap;

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{
    Command, CommandKind, GameConfig, GameError, GameRng, MoveRecord, Payload, Player, PlayerId,
    PublicKey, RolePicker, Snapshot,
};
use crate::moves::MoveResolver;
use crate::phase::{Phase, PhaseController};
use crate::registry::{JoinStatus, PlayerRegistry};
use crate::roles::{RoleAssignment, RoleDispatcher};
use crate::votes::{TallyResult, VoteTally};

use super::outcome::Outcome;

/// Response to an accepted command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// A seat was taken; `remaining` seats are still open.
    Joined { player: PlayerId, remaining: usize },

    /// The last seat was taken and roles were drawn. The grants must be
    /// encrypted and returned through `DispatchRoles`.
    RosterFull(RoleAssignment),

    /// Roles were dispatched; the first night has begun.
    Started { alive: usize },

    MoveRecorded { player: PlayerId, outstanding: usize },

    /// The night kill resolved and day broke. `outcome` is set once the
    /// game is decided.
    Killed {
        victim: PlayerId,
        round: u32,
        outcome: Option<Outcome>,
    },

    VoteRecorded { voter: PlayerId, outstanding: usize },

    /// The tally tied; a revote restricted to `candidates` is under way.
    Revote { candidates: Vec<PlayerId> },

    /// The vote eliminated `player` and night fell. `outcome` is set once
    /// the game is decided.
    Eliminated {
        player: PlayerId,
        outcome: Option<Outcome>,
    },

    /// The session ended and the engine was reset.
    Finished(Box<GameRecord>),
}

/// Everything an auditor needs to replay a finished session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Key revealed by the moderator at finish, verbatim.
    pub moderator_key: Payload,
    pub moderator: Option<PlayerId>,
    pub encrypted_roles: BTreeMap<PlayerId, Payload>,
    pub move_history: Vector<MoveRecord>,
    pub input_log: Vector<Command>,
    pub round: u32,
    pub outcome: Option<Outcome>,
}

/// Authoritative game session.
///
/// Generic over the role picker so tests can script role placement;
/// the default picker is the seeded [`GameRng`].
///
/// ## Example
///
/// ```
/// use werewolf_engine::core::{Command, GameConfig};
/// use werewolf_engine::rules::{GameEngine, Response};
///
/// let mut engine = GameEngine::new(GameConfig::standard().with_seed(7));
///
/// for i in 1..=5 {
///     engine.handle(Command::join(format!("p{i}"), vec![i as u8])).unwrap();
/// }
/// let response = engine.handle(Command::join("p6", vec![6u8])).unwrap();
/// assert!(matches!(response, Response::RosterFull(_)));
/// assert!(engine.handle(Command::join("p7", vec![7u8])).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct GameEngine<R: RolePicker + Clone = GameRng> {
    config: GameConfig,
    picker: R,
    /// Picker as it stood when the current session opened.
    session_picker: R,
    registry: PlayerRegistry,
    dispatcher: RoleDispatcher,
    phase: PhaseController,
    moves: MoveResolver,
    votes: VoteTally,
    input_log: Vector<Command>,
}

impl GameEngine<GameRng> {
    /// Create an engine drawing roles from `GameRng::new(config.seed)`.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self::with_picker(config, rng)
    }
}

impl<R: RolePicker + Clone> GameEngine<R> {
    /// Create an engine with an explicit role picker.
    #[must_use]
    pub fn with_picker(config: GameConfig, picker: R) -> Self {
        Self {
            registry: PlayerRegistry::new(config.roster_size),
            session_picker: picker.clone(),
            picker,
            config,
            dispatcher: RoleDispatcher::new(),
            phase: PhaseController::new(),
            moves: MoveResolver::new(),
            votes: VoteTally::new(),
            input_log: Vector::new(),
        }
    }

    /// Process one command.
    ///
    /// Accepted commands from `DispatchRoles` onward are appended to the
    /// input log. Rejected commands change nothing.
    pub fn handle(&mut self, command: Command) -> Result<Response, GameError> {
        let kind = command.kind();
        let logged = match kind {
            CommandKind::Join | CommandKind::Finish => None,
            _ => Some(command.clone()),
        };

        match self.apply(command) {
            Ok(response) => {
                if let Some(command) = logged {
                    self.input_log.push_back(command);
                }
                Ok(response)
            }
            Err(err) => {
                debug!(command = %kind, error = %err, "command rejected");
                Err(err)
            }
        }
    }

    fn apply(&mut self, command: Command) -> Result<Response, GameError> {
        match command {
            Command::Join { id, public_key } => self.apply_join(id, public_key),
            Command::DispatchRoles { roles } => {
                self.dispatcher
                    .dispatch(&mut self.registry, &mut self.phase, roles)?;
                Ok(Response::Started {
                    alive: self.registry.alive_count(),
                })
            }
            Command::Move { player, payload } => {
                let outstanding =
                    self.moves
                        .handle_move(&mut self.registry, &self.phase, &player, payload)?;
                Ok(Response::MoveRecorded {
                    player,
                    outstanding,
                })
            }
            Command::Kill { victim } => {
                self.moves
                    .handle_kill(&mut self.registry, &mut self.phase, &victim)?;
                Ok(Response::Killed {
                    victim,
                    round: self.phase.round(),
                    outcome: self.phase.outcome(),
                })
            }
            Command::Vote { voter, candidate } => {
                let result =
                    self.votes
                        .handle_vote(&mut self.registry, &mut self.phase, &voter, &candidate)?;
                Ok(match result {
                    TallyResult::Pending { outstanding } => Response::VoteRecorded {
                        voter,
                        outstanding,
                    },
                    TallyResult::Revote { candidates } => Response::Revote { candidates },
                    TallyResult::Eliminated { player, .. } => Response::Eliminated {
                        player,
                        outcome: self.phase.outcome(),
                    },
                })
            }
            Command::Finish { moderator_key } => {
                Ok(Response::Finished(Box::new(self.finish(moderator_key))))
            }
        }
    }

    /// The seat-filling join draws roles too. Both run against scratch
    /// copies of the registry and picker, committed only when the draw
    /// succeeds.
    fn apply_join(&mut self, id: PlayerId, public_key: PublicKey) -> Result<Response, GameError> {
        if self.phase.is_started() {
            return Err(GameError::InvalidPhase {
                command: CommandKind::Join,
                phase: self.phase.phase(),
            });
        }

        let mut registry = self.registry.clone();
        match registry.join(id.clone(), public_key)? {
            JoinStatus::Open { remaining } => {
                self.registry = registry;
                Ok(Response::Joined {
                    player: id,
                    remaining,
                })
            }
            JoinStatus::Full => {
                info!(players = registry.len(), "roster full, drawing roles");
                let mut picker = self.picker.clone();
                let assignment =
                    self.dispatcher
                        .assign(&mut registry, &mut picker, self.config.werewolves)?;
                self.registry = registry;
                self.picker = picker;
                Ok(Response::RosterFull(assignment))
            }
        }
    }

    // === Command shorthands ===

    pub fn join(
        &mut self,
        id: impl Into<PlayerId>,
        public_key: impl Into<PublicKey>,
    ) -> Result<Response, GameError> {
        self.handle(Command::join(id, public_key))
    }

    pub fn dispatch_roles(&mut self, roles: BTreeMap<PlayerId, Payload>) -> Result<Response, GameError> {
        self.handle(Command::DispatchRoles { roles })
    }

    pub fn handle_move(
        &mut self,
        player: impl Into<PlayerId>,
        payload: impl Into<Payload>,
    ) -> Result<Response, GameError> {
        self.handle(Command::moves(player, payload))
    }

    pub fn handle_kill(&mut self, victim: impl Into<PlayerId>) -> Result<Response, GameError> {
        self.handle(Command::kill(victim))
    }

    pub fn handle_vote(
        &mut self,
        voter: impl Into<PlayerId>,
        candidate: impl Into<PlayerId>,
    ) -> Result<Response, GameError> {
        self.handle(Command::vote(voter, candidate))
    }

    /// End the session and reset to an empty lobby.
    ///
    /// Accepted in any phase. The returned record carries the revealed key
    /// and the session's history for replay.
    pub fn finish(&mut self, moderator_key: impl Into<Payload>) -> GameRecord {
        let record = self.record(moderator_key.into());
        self.reset();
        info!(round = record.round, outcome = ?record.outcome, "session finished");
        record
    }

    // === Queries ===

    /// Read-only view for pollers.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let phase = self.phase.phase();
        let alive = self.registry.alive_count();

        Snapshot {
            phase,
            round: self.phase.round(),
            is_daytime: self.phase.is_daytime(),
            started: self.phase.is_started(),
            finished: self.phase.outcome().is_some(),
            outcome: self.phase.outcome(),
            alive: self.registry.alive().clone(),
            moves_cast: self.moves.moves(),
            moves_needed: if phase == Phase::Night {
                alive.saturating_sub(self.moves.moves())
            } else {
                0
            },
            votes_cast: self.votes.votes(),
            votes_needed: if phase == Phase::Day {
                alive.saturating_sub(self.votes.votes())
            } else {
                0
            },
            revote: phase == Phase::Day && self.votes.is_revote(),
            candidates: self
                .registry
                .alive_players()
                .filter(|p| p.can_be_voted())
                .map(|p| p.id().clone())
                .collect(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.phase.round()
    }

    #[must_use]
    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn player(&self, id: &PlayerId) -> Result<&Player, GameError> {
        self.registry.get(id)
    }

    /// Players in join order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.registry.players()
    }

    /// Role draw for the current session, once the roster is full.
    #[must_use]
    pub fn assignment(&self) -> Option<&RoleAssignment> {
        self.dispatcher.assignment()
    }

    /// Public key of the moderator, once drawn.
    #[must_use]
    pub fn moderator_public_key(&self) -> Option<&PublicKey> {
        self.registry.moderator().map(Player::public_key)
    }

    #[must_use]
    pub fn encrypted_roles(&self) -> &BTreeMap<PlayerId, Payload> {
        self.dispatcher.encrypted_roles()
    }

    #[must_use]
    pub fn move_history(&self) -> &Vector<MoveRecord> {
        self.moves.history()
    }

    /// Accepted commands since (and including) role dispatch.
    #[must_use]
    pub fn input_log(&self) -> &Vector<Command> {
        &self.input_log
    }

    /// The role picker as it stood when the current session opened.
    #[must_use]
    pub fn session_picker(&self) -> &R {
        &self.session_picker
    }

    fn record(&self, moderator_key: Payload) -> GameRecord {
        GameRecord {
            moderator_key,
            moderator: self.registry.moderator().map(|p| p.id().clone()),
            encrypted_roles: self.dispatcher.encrypted_roles().clone(),
            move_history: self.moves.history().clone(),
            input_log: self.input_log.clone(),
            round: self.phase.round(),
            outcome: self.phase.outcome(),
        }
    }

    fn reset(&mut self) {
        self.registry.clear();
        self.dispatcher.reset();
        self.phase.reset();
        self.moves.reset();
        self.votes.reset();
        self.input_log = Vector::new();
        self.session_picker = self.picker.clone();
    }
}
