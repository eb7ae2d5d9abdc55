//! Error types.
//!
//! Turn resolution and snapshot application never fail: missing data falls
//! back to a defined default. Errors only come out of the edges of the crate:
//! loading data, building a match, and the wire codec.

use thiserror::Error;

use super::participant::ParticipantId;
use crate::cards::CardId;

/// Errors raised at the boundaries of the duel core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DuelError {
    /// Card catalog data could not be parsed.
    #[error("catalog parse error: {0}")]
    CatalogParse(String),

    /// Two catalog entries share an id.
    #[error("duplicate card id in catalog: {0}")]
    DuplicateCard(CardId),

    /// Match configuration could not be parsed.
    #[error("config parse error: {0}")]
    Config(String),

    /// A match was built with the wrong number of participants.
    #[error("a duel needs exactly {expected} participants, got {got}")]
    ParticipantCount {
        /// Required participant count.
        expected: usize,
        /// Participant count supplied.
        got: usize,
    },

    /// A participant id appears twice in a roster.
    #[error("duplicate participant: {0}")]
    DuplicateParticipant(ParticipantId),

    /// A participant is not part of this match.
    #[error("unknown participant: {0}")]
    UnknownParticipant(ParticipantId),

    /// A message could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(String),

    /// A snapshot was produced by an incompatible version.
    #[error("unsupported snapshot version: expected {expected}, got {got}")]
    UnsupportedVersion {
        /// Version this build understands.
        expected: u16,
        /// Version found in the payload.
        got: u16,
    },

    /// The transport refused a message.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for fallible duel operations.
pub type DuelResult<T> = Result<T, DuelError>;

impl From<bincode::Error> for DuelError {
    fn from(err: bincode::Error) -> Self {
        DuelError::Codec(err.to_string())
    }
}
