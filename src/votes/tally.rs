//! Day-phase vote collection and resolution.
//!
//! Votes accumulate on the candidates' `votes_got` counters. When every
//! living player has voted the tally resolves: a unique top candidate is
//! eliminated and night falls; any tie at the top, whatever its size,
//! restricts the next ballot to the tied players and voting starts over.

use smallvec::SmallVec;
use tracing::{debug, info};

use crate::core::{Action, CommandKind, GameError, Ineligibility, PlayerId, Precondition};
use crate::phase::{Phase, PhaseController};
use crate::registry::PlayerRegistry;

/// Result of a recorded vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TallyResult {
    /// The round is still collecting votes.
    Pending { outstanding: usize },

    /// The top of the tally tied. Only these players may receive votes now.
    Revote { candidates: Vec<PlayerId> },

    /// A single top candidate was eliminated and night fell.
    Eliminated { player: PlayerId, phase: Phase },
}

/// Counts day votes and resolves elections.
#[derive(Clone, Debug, Default)]
pub struct VoteTally {
    votes: usize,
    revote: bool,
}

impl VoteTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Votes cast in the current voting round.
    #[must_use]
    pub fn votes(&self) -> usize {
        self.votes
    }

    /// The current ballot is a revote among tied players.
    #[must_use]
    pub fn is_revote(&self) -> bool {
        self.revote
    }

    /// Record `voter_id`'s vote for `candidate_id`, resolving the round when
    /// it completes the quorum.
    pub fn handle_vote(
        &mut self,
        registry: &mut PlayerRegistry,
        phase: &mut PhaseController,
        voter_id: &PlayerId,
        candidate_id: &PlayerId,
    ) -> Result<TallyResult, GameError> {
        if phase.phase() != Phase::Day {
            return Err(GameError::InvalidPhase {
                command: CommandKind::Vote,
                phase: phase.phase(),
            });
        }

        let voter = registry.get(voter_id)?;
        let candidate = registry.get(candidate_id)?;

        if voter.is_moderator() {
            return Err(GameError::ineligible(voter_id, Ineligibility::Moderator));
        }
        if !voter.is_alive() || !registry.is_alive(voter_id) {
            return Err(GameError::ineligible(voter_id, Ineligibility::Dead));
        }
        if !candidate.is_alive() {
            return Err(GameError::ineligible(candidate_id, Ineligibility::Dead));
        }
        if !candidate.can_be_voted() || !registry.is_alive(candidate_id) {
            return Err(GameError::ineligible(candidate_id, Ineligibility::NotVotable));
        }
        if voter.has_voted() {
            return Err(GameError::duplicate(voter_id, Action::Voted));
        }

        let tally = candidate.votes_got() + 1;
        registry.set_votes_got(candidate_id, tally)?;
        registry.set_has_voted(voter_id, true)?;
        self.votes += 1;

        debug!(voter = %voter_id, candidate = %candidate_id, tally, "vote recorded");

        if self.votes == registry.alive_count() {
            self.resolve(registry, phase)
        } else {
            Ok(TallyResult::Pending {
                outstanding: registry.alive_count() - self.votes,
            })
        }
    }

    /// Resolve a complete voting round.
    ///
    /// Fails unless every living player has voted.
    pub fn resolve(
        &mut self,
        registry: &mut PlayerRegistry,
        phase: &mut PhaseController,
    ) -> Result<TallyResult, GameError> {
        let required = registry.alive_count();
        let max = registry.alive_players().map(|p| p.votes_got()).max();
        let max = match max {
            Some(max) if self.votes == required && phase.phase() == Phase::Day => max,
            _ => {
                return Err(GameError::PreconditionNotMet(
                    Precondition::VotesOutstanding {
                        submitted: self.votes,
                        required,
                    },
                ))
            }
        };

        let tied: SmallVec<[PlayerId; 6]> = registry
            .alive_players()
            .filter(|p| p.votes_got() == max)
            .map(|p| p.id().clone())
            .collect();

        self.votes = 0;

        if tied.len() > 1 {
            registry.update_alive(|p| {
                p.votes_got = 0;
                p.has_voted = false;
                p.can_be_voted = false;
            });
            for id in &tied {
                registry.set_can_be_voted(id, true)?;
            }
            self.revote = true;

            info!(tied = tied.len(), top = max, round = phase.round(), "tally tied, revote");
            return Ok(TallyResult::Revote {
                candidates: tied.into_vec(),
            });
        }

        registry.update_alive(|p| {
            p.votes_got = 0;
            p.has_voted = false;
            p.can_be_voted = true;
        });
        self.revote = false;

        let eliminated = tied.into_iter().next().ok_or_else(|| {
            GameError::PreconditionNotMet(Precondition::VotesOutstanding {
                submitted: 0,
                required,
            })
        })?;
        registry.kill(&eliminated)?;
        let next = phase.advance(registry);

        info!(player = %eliminated, votes = max, "player eliminated by vote");
        Ok(TallyResult::Eliminated {
            player: eliminated,
            phase: next,
        })
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
