//! One participant's view of a match.
//!
//! [`MatchContext`] ties the pieces together for a single process. Every
//! participant has one; exactly one of them holds the [`Role::Authority`].
//!
//! ## Authority
//!
//! Owns the ground-truth [`MatchState`]: records submissions (its own and
//! those received as `PlayCards`), drives the turn timer, resolves turns,
//! and broadcasts `TurnResult`, `EndGame`, `TimerTick`, and `FullState`
//! answers.
//!
//! ## Replica
//!
//! Sends its submissions to the authority and mirrors state from received
//! snapshots. It never mutates match state on its own.
//!
//! ## Driving a match
//!
//! The host owns the clock and the network. It calls `advance_timer` once
//! per second on the authority, hands outbound envelopes from the
//! [`Transport`] to the network, and feeds incoming messages to
//! `handle_message` / `handle_bytes`. Presentation code drains
//! `notifications()` and reads state through the accessors.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

use crate::cards::{CardCatalog, CardId};
use crate::core::{
    DuelError, DuelResult, MatchConfig, MatchState, ParticipantId, ParticipantState,
    PARTICIPANTS_PER_MATCH,
};
use crate::events::{EventChannel, Notification};
use crate::replication::{
    ApplyOutcome, Envelope, FullStateSnapshot, Message, Recipients, ReplicationCoordinator, Transport,
    TurnResultSnapshot,
};
use crate::rules::{FinalScores, MatchOutcome};
use crate::turn::{TimerStep, TurnResolver};

/// Whether this process resolves turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Resolves turns and broadcasts results.
    Authority,
    /// Mirrors the authority.
    Replica,
}

/// A participant's match: state, turn flow, and replication.
pub struct MatchContext<T: Transport> {
    config: MatchConfig,
    catalog: Arc<CardCatalog>,
    local: ParticipantId,
    role: Role,
    state: MatchState,
    resolver: TurnResolver,
    replication: ReplicationCoordinator,
    transport: T,
    events: EventChannel<Notification>,
    time_remaining: Option<u32>,
    final_scores: Option<FinalScores>,
}

impl<T: Transport> MatchContext<T> {
    /// Create the authority's context and deal every participant's deck.
    ///
    /// `participants` must hold exactly two distinct ids, one of them `local`.
    pub fn authority(
        config: MatchConfig,
        catalog: Arc<CardCatalog>,
        local: ParticipantId,
        participants: &[ParticipantId],
        transport: T,
    ) -> DuelResult<Self> {
        if participants.len() != PARTICIPANTS_PER_MATCH {
            return Err(DuelError::ParticipantCount {
                expected: PARTICIPANTS_PER_MATCH,
                got: participants.len(),
            });
        }
        for (i, id) in participants.iter().enumerate() {
            if participants[..i].contains(id) {
                return Err(DuelError::DuplicateParticipant(*id));
            }
        }
        if !participants.contains(&local) {
            return Err(DuelError::UnknownParticipant(local));
        }

        let state = MatchState::seeded(participants.iter().copied(), &catalog, &config);
        info!(
            local = %local,
            seed = config.seed,
            turns = config.total_turns,
            cards = catalog.len(),
            "authority created"
        );
        Ok(Self::build(config, catalog, local, Role::Authority, state, transport))
    }

    /// Create a replica's context. State stays empty until a snapshot arrives.
    pub fn replica(
        config: MatchConfig,
        catalog: Arc<CardCatalog>,
        local: ParticipantId,
        transport: T,
    ) -> DuelResult<Self> {
        debug!(local = %local, "replica created");
        Ok(Self::build(config, catalog, local, Role::Replica, MatchState::new(), transport))
    }

    fn build(
        config: MatchConfig,
        catalog: Arc<CardCatalog>,
        local: ParticipantId,
        role: Role,
        state: MatchState,
        transport: T,
    ) -> Self {
        let resolver = TurnResolver::new(config.clone(), Arc::clone(&catalog));
        Self {
            config,
            catalog,
            local,
            role,
            state,
            resolver,
            replication: ReplicationCoordinator::new(),
            transport,
            events: EventChannel::default(),
            time_remaining: None,
            final_scores: None,
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Begin turn 1 (authority only).
    ///
    /// Every other participant is sent its starting state, so replicas that
    /// joined before the match started need not ask for it.
    pub fn start(&mut self) {
        if !self.is_authority() {
            debug!("start ignored on replica");
            return;
        }
        if self.state.turn > 0 {
            debug!(turn = self.state.turn, "start ignored: match already running");
            return;
        }
        self.resolver.start(&mut self.state);
        let others: Vec<ParticipantId> = self.state.participants.ids().filter(|id| *id != self.local).collect();
        for target in others {
            self.send_full_state(target);
        }
        self.time_remaining = Some(self.resolver.timer().remaining());
        self.events.publish(Notification::RefreshRequested);
    }

    /// Ask the authority for the full state (replica only).
    pub fn request_full_state(&mut self) {
        if self.is_authority() {
            debug!("full state request ignored on authority");
            return;
        }
        self.send(Recipients::Authority, Message::RequestFullState { requester: self.local });
    }

    /// Submit the local participant's cards for the current turn.
    pub fn play_cards(&mut self, cards: Vec<CardId>) {
        if self.is_finished() {
            debug!("play ignored: match finished");
            return;
        }
        match self.role {
            Role::Authority => self.record_submission(self.local, cards),
            Role::Replica => {
                self.send(
                    Recipients::Authority,
                    Message::PlayCards {
                        participant: self.local,
                        cards,
                    },
                );
                self.events.publish(Notification::SubmissionRecorded { participant: self.local });
            }
        }
    }

    /// Advance the turn timer by one second (authority only).
    ///
    /// Expiry resolves the turn the timer was armed for.
    pub fn advance_timer(&mut self) -> TimerStep {
        if !self.is_authority() || self.is_finished() {
            return TimerStep::Idle;
        }
        let step = self.resolver.tick();
        match step {
            TimerStep::Idle => {}
            TimerStep::Tick { remaining, .. } => self.broadcast_tick(remaining),
            TimerStep::Expired { turn } => {
                self.broadcast_tick(0);
                info!(turn, "turn timer expired");
                self.resolve_turn(turn);
            }
        }
        step
    }

    /// Change role, e.g. when the host migrates authority.
    ///
    /// A promoted replica continues from its replicated state: the current
    /// turn restarts with no submissions and a full timer. If the final
    /// turn's result was already applied, the match is ended from the
    /// replicated scores instead.
    pub fn set_role(&mut self, role: Role) {
        if role == self.role {
            return;
        }
        info!(local = %self.local, ?role, turn = self.state.turn, "role changed");
        self.role = role;
        if role != Role::Authority {
            return;
        }

        let final_applied = matches!(
            self.replication.last_applied_turn(),
            Some(resolved) if resolved >= self.config.total_turns
        );
        let finished = self.is_finished() || final_applied;
        self.resolver.resume(&self.state, finished);
        if final_applied && !self.is_finished() {
            info!(turn = self.state.turn, "final turn already resolved, ending match");
            let scores = self.replication.final_scores(&self.state);
            self.send(Recipients::Others, Message::EndGame(scores.clone()));
            self.finish(scores);
        }
    }

    // ------------------------------------------------------------------
    // Inbound
    // ------------------------------------------------------------------

    /// Decode and handle a message.
    pub fn handle_bytes(&mut self, bytes: &[u8]) -> DuelResult<()> {
        let message = Message::decode(bytes)?;
        self.handle_message(message);
        Ok(())
    }

    /// Handle a message received from another participant.
    pub fn handle_message(&mut self, message: Message) {
        match (self.role, message) {
            (Role::Authority, Message::PlayCards { participant, cards }) => {
                self.record_submission(participant, cards);
            }
            (Role::Authority, Message::RequestFullState { requester }) => {
                self.send_full_state(requester);
                if let Some(scores) = self.final_scores.clone() {
                    self.send(Recipients::Participant(requester), Message::EndGame(scores));
                }
            }
            (Role::Replica, Message::TurnResult(snapshot)) => self.apply_turn_result(&snapshot),
            (Role::Replica, Message::FullState { target, snapshot }) => {
                if target == self.local {
                    self.restore_full_state(&snapshot);
                } else {
                    debug!(target = %target, "full state for another participant ignored");
                }
            }
            (Role::Replica, Message::EndGame(scores)) => {
                for (id, score) in scores.scores.iter() {
                    if let Some(participant) = self.state.participant_mut(id) {
                        participant.score = *score;
                    }
                }
                self.finish(scores);
            }
            (Role::Replica, Message::TimerTick { remaining }) => {
                self.time_remaining = Some(remaining);
                self.events.publish(Notification::TimerTick { remaining });
            }
            (role, message) => {
                debug!(?role, code = message.event_code(), "message not handled in this role");
            }
        }
    }

    // ------------------------------------------------------------------
    // Authority internals
    // ------------------------------------------------------------------

    fn record_submission(&mut self, participant: ParticipantId, cards: Vec<CardId>) {
        if !self.state.participants.contains(participant) {
            warn!(participant = %participant, "submission from unknown participant ignored");
            return;
        }
        if !self.resolver.submit(participant, cards) {
            return;
        }
        self.events.publish(Notification::SubmissionRecorded { participant });
        if self.resolver.all_submitted(&self.state) {
            let turn = self.state.turn;
            self.resolve_turn(turn);
        }
    }

    fn resolve_turn(&mut self, turn: u32) {
        let Some(report) = self.resolver.resolve(&mut self.state, turn) else {
            return;
        };
        let snapshot = self.replication.turn_result(&self.state, &report);
        self.send(Recipients::Others, Message::TurnResult(snapshot));
        self.time_remaining = self.resolver.timer().is_running().then(|| self.resolver.timer().remaining());
        self.events.publish(Notification::TurnResolved { turn: report.turn });
        self.events.publish(Notification::RefreshRequested);

        if report.finished {
            let scores = self.replication.final_scores(&self.state);
            self.send(Recipients::Others, Message::EndGame(scores.clone()));
            self.finish(scores);
        }
    }

    fn send_full_state(&mut self, target: ParticipantId) {
        let snapshot = self.replication.full_state(&self.state, self.state.turn);
        debug!(target = %target, turn = snapshot.turn, "sending full state");
        self.send(Recipients::Others, Message::FullState { target, snapshot });
    }

    fn broadcast_tick(&mut self, remaining: u32) {
        self.time_remaining = Some(remaining);
        self.send(Recipients::Others, Message::TimerTick { remaining });
        self.events.publish(Notification::TimerTick { remaining });
    }

    // ------------------------------------------------------------------
    // Replica internals
    // ------------------------------------------------------------------

    fn apply_turn_result(&mut self, snapshot: &TurnResultSnapshot) {
        let outcome = self
            .replication
            .apply_turn_result(&mut self.state, snapshot, self.config.total_turns);
        if outcome == ApplyOutcome::Applied {
            // The authority re-armed its timer for the next turn, if any
            self.time_remaining =
                (snapshot.turn_index < self.config.total_turns).then_some(self.config.turn_duration);
            self.events.publish(Notification::TurnResolved { turn: snapshot.turn_index });
            self.events.publish(Notification::RefreshRequested);
        }
    }

    fn restore_full_state(&mut self, snapshot: &FullStateSnapshot) {
        if self.replication.restore_full_state(&mut self.state, snapshot) == ApplyOutcome::Applied {
            self.events.publish(Notification::RefreshRequested);
        }
    }

    // ------------------------------------------------------------------
    // Shared
    // ------------------------------------------------------------------

    fn finish(&mut self, scores: FinalScores) {
        if self.final_scores.is_some() {
            debug!("duplicate end of match ignored");
            return;
        }
        if scores.score_of(self.local).is_none() {
            warn!(local = %self.local, "final scores have no local entry, counting 0");
        }
        let outcome = scores.outcome_for(self.local);
        let own_score = scores.score_of(self.local).unwrap_or(0);
        let opponent_score = scores.opponent_score(self.local);
        info!(local = %self.local, ?outcome, own_score, opponent_score, "match ended");

        self.time_remaining = None;
        self.final_scores = Some(scores);
        self.events.publish(Notification::MatchEnded {
            outcome,
            own_score,
            opponent_score,
        });
    }

    fn send(&mut self, recipients: Recipients, message: Message) {
        let code = message.event_code();
        let envelope = Envelope::new(self.local, recipients, message);
        if let Err(err) = self.transport.send(envelope) {
            warn!(code, error = %err, "transport send failed");
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// Local match state.
    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Current turn (0 before the match starts).
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    /// A participant's state.
    #[must_use]
    pub fn participant(&self, id: ParticipantId) -> Option<&ParticipantState> {
        self.state.participant(id)
    }

    /// This process's participant id.
    #[must_use]
    pub fn local_participant(&self) -> ParticipantId {
        self.local
    }

    /// This process's participant state, once known.
    #[must_use]
    pub fn local_state(&self) -> Option<&ParticipantState> {
        self.state.participant(self.local)
    }

    /// Current role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Check whether this process is the authority.
    #[must_use]
    pub fn is_authority(&self) -> bool {
        self.role == Role::Authority
    }

    /// Check whether any participant state is present.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Check whether the match has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.final_scores.is_some()
    }

    /// Local outcome, once the match has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.final_scores.as_ref().map(|s| s.outcome_for(self.local))
    }

    /// Final scores, once the match has ended.
    #[must_use]
    pub fn final_scores(&self) -> Option<&FinalScores> {
        self.final_scores.as_ref()
    }

    /// Seconds left in the current turn, as last known.
    #[must_use]
    pub fn time_remaining(&self) -> Option<u32> {
        self.time_remaining
    }

    /// Receiver for presentation notifications.
    #[must_use]
    pub fn notifications(&self) -> Receiver<Notification> {
        self.events.receiver()
    }

    /// Match configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Card catalog.
    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// The outbound transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The outbound transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
