//! Turn resolution state machine (authority only).
//!
//! ## Lifecycle
//!
//! ```text
//! begin_turn ──> submissions / timer ticks ──> resolve(turn)
//!     ^                                            │
//!     └──────────── not the last turn ─────────────┤
//!                                                  └──> finished
//! ```
//!
//! `begin_turn` increments the turn counter, clears submissions, refills
//! every participant's energy, draws one card each, and re-arms the timer.
//! `resolve` runs at most once per turn: triggers for a turn that is not
//! current, a turn already resolving, or a finished match are suppressed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::submission::SubmissionCollector;
use super::timer::{TimerController, TimerStep};
use crate::cards::{AbilityTag, CardCatalog, CardId};
use crate::core::{MatchConfig, MatchState, ParticipantId, ParticipantMap};
use crate::rules::{trim_submission, AbilityEngine, TrimmedSubmission};

/// What one participant did in a resolved turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantTurn {
    /// Cards that took effect, after trimming.
    pub played: Vec<CardId>,

    /// Ability tags that applied.
    pub abilities: Vec<AbilityTag>,

    /// Power after doubling and blocking.
    pub final_power: i32,
}

/// Result of resolving one turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// The turn that was resolved (not the one now current).
    pub turn: u32,

    /// Per-participant play.
    pub results: ParticipantMap<ParticipantTurn>,

    /// Whether this was the final turn.
    pub finished: bool,
}

/// Drives turns on the authority.
///
/// Owns the submission collector and the turn timer; both feed `resolve`.
#[derive(Clone, Debug)]
pub struct TurnResolver {
    config: MatchConfig,
    catalog: Arc<CardCatalog>,
    submissions: SubmissionCollector,
    timer: TimerController,
    turn: u32,
    resolving: bool,
    finished: bool,
}

impl TurnResolver {
    /// Create a resolver for a match.
    #[must_use]
    pub fn new(config: MatchConfig, catalog: Arc<CardCatalog>) -> Self {
        let timer = TimerController::new(config.turn_duration);
        Self {
            config,
            catalog,
            submissions: SubmissionCollector::new(),
            timer,
            turn: 0,
            resolving: false,
            finished: false,
        }
    }

    /// Begin turn 1. Does nothing once the match has started.
    pub fn start(&mut self, state: &mut MatchState) {
        if state.turn > 0 {
            debug!(turn = state.turn, "match already started");
            return;
        }
        self.begin_turn(state);
    }

    /// Start the next turn.
    pub fn begin_turn(&mut self, state: &mut MatchState) {
        state.turn += 1;
        self.turn = state.turn;
        self.submissions.clear();
        for (_, participant) in state.participants.iter_mut() {
            participant.refill(self.config.max_energy);
            participant.draw();
        }
        self.resolving = false;
        self.timer.arm(state.turn);
        info!(turn = state.turn, total = self.config.total_turns, "turn started");
    }

    /// Take over an in-progress match from replicated state.
    ///
    /// Used when this process becomes the authority mid-match: the current
    /// turn's submissions restart empty and the timer is re-armed.
    pub fn resume(&mut self, state: &MatchState, finished: bool) {
        self.submissions.clear();
        self.turn = state.turn;
        self.resolving = false;
        self.finished = finished;
        if state.turn > 0 && !finished {
            self.timer.arm(state.turn);
        } else {
            self.timer.stop();
        }
    }

    /// Record a participant's submission for the current turn.
    ///
    /// Returns false when the match is already finished.
    pub fn submit(&mut self, participant: ParticipantId, cards: Vec<CardId>) -> bool {
        if self.finished {
            debug!(participant = %participant, "submission after match end ignored");
            return false;
        }
        debug!(participant = %participant, cards = cards.len(), "submission recorded");
        self.submissions.submit(participant, cards);
        true
    }

    /// Check whether every participant has submitted this turn.
    #[must_use]
    pub fn all_submitted(&self, state: &MatchState) -> bool {
        !state.participants.is_empty() && self.submissions.is_complete(state.participants.ids())
    }

    /// Advance the turn timer by one second.
    pub fn tick(&mut self) -> TimerStep {
        self.timer.tick()
    }

    /// Resolve `turn` if it is current and not already resolving.
    ///
    /// On success the match has already moved on: either the next turn has
    /// begun or the match is finished.
    pub fn resolve(&mut self, state: &mut MatchState, turn: u32) -> Option<TurnReport> {
        if self.finished || self.resolving || state.turn == 0 || turn != state.turn {
            debug!(
                turn,
                current = state.turn,
                resolving = self.resolving,
                finished = self.finished,
                "resolution trigger suppressed"
            );
            return None;
        }
        self.resolving = true;
        self.timer.stop();

        let scores_before = state.scores();
        let mut trimmed: ParticipantMap<TrimmedSubmission> = ParticipantMap::new();
        for (id, participant) in state.participants.iter_mut() {
            let cards = self.submissions.get(id).unwrap_or_default();
            // Submitted cards leave the hand even if trimming drops them
            for card in cards {
                participant.remove_from_hand(*card);
            }
            let submission = trim_submission(&self.catalog, cards, participant.energy);
            participant.spend(submission.cost);
            trimmed.insert(id, submission);
        }

        let outcomes = AbilityEngine::apply(&trimmed, &scores_before);
        for (id, participant) in state.participants.iter_mut() {
            let Some(outcome) = outcomes.get(id) else { continue };
            participant.score = participant.score.saturating_add(outcome.score_delta);
            for _ in 0..outcome.extra_draws {
                participant.draw();
            }
        }

        let results = trimmed.map(|id, sub| ParticipantTurn {
            played: sub.played.clone(),
            abilities: sub.abilities.clone(),
            final_power: outcomes.get(id).map_or(0, |o| o.final_power),
        });

        let resolved = state.turn;
        let finished = self.config.is_last_turn(resolved);
        info!(turn = resolved, finished, "turn resolved");
        if finished {
            self.finished = true;
        } else {
            self.begin_turn(state);
        }

        Some(TurnReport {
            turn: resolved,
            results,
            finished,
        })
    }

    /// Turn most recently begun (0 before the match starts).
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Check whether the final turn has been resolved.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Check whether the current turn is being (or has been) resolved.
    #[must_use]
    pub fn is_resolving(&self) -> bool {
        self.resolving
    }

    /// Current turn's submissions.
    #[must_use]
    pub fn submissions(&self) -> &SubmissionCollector {
        &self.submissions
    }

    /// The turn timer.
    #[must_use]
    pub fn timer(&self) -> &TimerController {
        &self.timer
    }

    /// Match configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Card catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<CardCatalog> {
        &self.catalog
    }
}
