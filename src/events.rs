//! Notifications for the presentation layer.
//!
//! A match publishes [`Notification`]s into an [`EventChannel`]; a UI (or a
//! test) drains the receiver and reads state through `MatchContext`. Nothing
//! in the duel core waits on the consumer: when the channel is full, new
//! notifications are dropped.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::ParticipantId;
use crate::rules::MatchOutcome;

/// Default notification buffer size.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Something the presentation layer may want to react to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// A participant's submission was recorded (or sent, on a replica).
    SubmissionRecorded {
        /// Submitting participant.
        participant: ParticipantId,
    },
    /// A turn was resolved and its result applied locally.
    TurnResolved {
        /// The resolved turn.
        turn: u32,
    },
    /// Local state changed; redraw from `MatchContext::state`.
    RefreshRequested,
    /// Seconds left in the current turn.
    TimerTick {
        /// Seconds remaining.
        remaining: u32,
    },
    /// The match is over.
    MatchEnded {
        /// Result from the local participant's point of view.
        outcome: MatchOutcome,
        /// Local final score.
        own_score: i32,
        /// Opponent's final score.
        opponent_score: i32,
    },
}

/// Bounded multi-consumer channel.
#[derive(Clone, Debug)]
pub struct EventChannel<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> EventChannel<T> {
    /// Create a bounded channel.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        Self { sender, receiver }
    }

    /// Create an unbounded channel.
    #[must_use]
    pub fn unbounded() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { sender, receiver }
    }

    /// Publish without blocking. Returns false if the event was dropped.
    pub fn publish(&self, event: T) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("event channel full, dropping event");
                false
            }
            // We hold a receiver, so this only happens if it was dropped elsewhere
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// A receiver for another consumer.
    #[must_use]
    pub fn receiver(&self) -> Receiver<T> {
        self.receiver.clone()
    }

    /// Take every pending event.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
