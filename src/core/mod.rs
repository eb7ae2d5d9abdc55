//! Core types: participants, match state, RNG, configuration, errors.
//!
//! Everything the turn resolver and the replication layer share lives here.

pub mod participant;
pub mod rng;
pub mod config;
pub mod state;
pub mod error;

pub use participant::{ParticipantId, ParticipantMap};
pub use rng::GameRng;
pub use config::{MatchConfig, PARTICIPANTS_PER_MATCH};
pub use state::{MatchState, ParticipantState};
pub use error::{DuelError, DuelResult};
