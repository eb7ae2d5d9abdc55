//! Messages exchanged between participants, and their binary encoding.
//!
//! ## Event codes
//!
//! | Code | Message            | Delivery   |
//! |------|--------------------|------------|
//! | 1    | `PlayCards`        | reliable   |
//! | 2    | `TurnResult`       | reliable   |
//! | 3    | `RequestFullState` | reliable   |
//! | 4    | `FullState`        | reliable   |
//! | 5    | `EndGame`          | reliable   |
//! | 99   | `TimerTick`        | unreliable |
//!
//! Messages are encoded with bincode. Decoding checks the version carried by
//! snapshot payloads.

use serde::{Deserialize, Serialize};

use super::snapshot::{FullStateSnapshot, TurnResultSnapshot, SNAPSHOT_VERSION};
use crate::cards::CardId;
use crate::core::{DuelError, DuelResult, ParticipantId};
use crate::rules::FinalScores;

/// Delivery guarantee requested from the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Delivery {
    /// Must arrive, in order.
    Reliable,
    /// May be dropped.
    Unreliable,
}

/// Who a message is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipients {
    /// Every participant, sender included.
    All,
    /// Every participant except the sender.
    Others,
    /// Only the authority.
    Authority,
    /// A single participant.
    Participant(ParticipantId),
}

/// A message exchanged during a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// A participant's chosen cards for the current turn.
    PlayCards {
        /// Submitting participant.
        participant: ParticipantId,
        /// Chosen cards, in selection order.
        cards: Vec<CardId>,
    },
    /// Outcome of a resolved turn.
    TurnResult(TurnResultSnapshot),
    /// A reconnecting participant asks for the full state.
    RequestFullState {
        /// Participant that wants the state.
        requester: ParticipantId,
    },
    /// Answer to `RequestFullState`.
    FullState {
        /// Participant the snapshot is meant for.
        target: ParticipantId,
        /// The state.
        snapshot: FullStateSnapshot,
    },
    /// Final scores, sent once after the last turn.
    EndGame(FinalScores),
    /// Seconds left in the current turn, for display.
    TimerTick {
        /// Seconds remaining.
        remaining: u32,
    },
}

impl Message {
    /// Numeric event code.
    #[must_use]
    pub fn event_code(&self) -> u8 {
        match self {
            Message::PlayCards { .. } => 1,
            Message::TurnResult(_) => 2,
            Message::RequestFullState { .. } => 3,
            Message::FullState { .. } => 4,
            Message::EndGame(_) => 5,
            Message::TimerTick { .. } => 99,
        }
    }

    /// Delivery guarantee this message needs.
    #[must_use]
    pub fn delivery(&self) -> Delivery {
        match self {
            Message::TimerTick { .. } => Delivery::Unreliable,
            _ => Delivery::Reliable,
        }
    }

    /// Snapshot version carried by the payload, if any.
    #[must_use]
    pub fn snapshot_version(&self) -> Option<u16> {
        match self {
            Message::TurnResult(snapshot) => Some(snapshot.version),
            Message::FullState { snapshot, .. } => Some(snapshot.version),
            _ => None,
        }
    }

    /// Encode to bytes.
    pub fn encode(&self) -> DuelResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bytes, rejecting snapshots of another version.
    pub fn decode(bytes: &[u8]) -> DuelResult<Self> {
        let message: Message = bincode::deserialize(bytes)?;
        match message.snapshot_version() {
            Some(got) if got != SNAPSHOT_VERSION => Err(DuelError::UnsupportedVersion {
                expected: SNAPSHOT_VERSION,
                got,
            }),
            _ => Ok(message),
        }
    }
}

/// A message with its addressing, as handed to a transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Sending participant.
    pub sender: ParticipantId,
    /// Addressees.
    pub recipients: Recipients,
    /// Delivery guarantee.
    pub delivery: Delivery,
    /// Payload.
    pub message: Message,
}

impl Envelope {
    /// Address a message; delivery follows the message kind.
    #[must_use]
    pub fn new(sender: ParticipantId, recipients: Recipients, message: Message) -> Self {
        Self {
            sender,
            recipients,
            delivery: message.delivery(),
            message,
        }
    }

    /// Check whether `participant` should receive this envelope.
    ///
    /// `authority` is the current authority's id.
    #[must_use]
    pub fn is_addressed_to(&self, participant: ParticipantId, authority: ParticipantId) -> bool {
        match self.recipients {
            Recipients::All => true,
            Recipients::Others => participant != self.sender,
            Recipients::Authority => participant == authority,
            Recipients::Participant(id) => participant == id,
        }
    }
}
