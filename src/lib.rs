//! # duel-ccg
//!
//! Authoritative turn resolution and state replication for a two-player,
//! simultaneous-submission card duel.
//!
//! ## Design Principles
//!
//! 1. **Single Authority**: Exactly one participant resolves turns. Everyone
//!    else mirrors its snapshots and never mutates match state on their own.
//!
//! 2. **Resolve Once**: A turn resolves on whichever comes first, both
//!    submissions or timer expiry, and never twice.
//!
//! 3. **Transport Agnostic**: The core hands addressed envelopes to a
//!    [`replication::Transport`] and accepts inbound messages from the host.
//!    It owns no sockets, threads, or clocks.
//!
//! ## Turn Flow
//!
//! ```text
//! begin turn: refill energy (+1, capped), draw 1, arm timer
//!     │
//!     ├── both participants submit ─┐
//!     └── timer expires ────────────┴─> resolve: trim to energy, apply
//!                                       abilities, score, broadcast
//! ```
//!
//! ## Modules
//!
//! - `core`: Participant ids, match state, RNG, configuration, errors
//! - `cards`: Card definitions, ability tags, and the catalog
//! - `rules`: Affordability trimming, ability interactions, outcome
//! - `turn`: Submissions, the turn timer, and the resolver
//! - `replication`: Snapshots, messages, the transport seam
//! - `events`: Presentation notifications
//! - `context`: `MatchContext`, one participant's view of a match

pub mod core;
pub mod cards;
pub mod rules;
pub mod turn;
pub mod replication;
pub mod events;
pub mod context;

// Re-export commonly used types
pub use crate::core::{
    DuelError, DuelResult, GameRng, MatchConfig, MatchState, ParticipantId, ParticipantMap,
    ParticipantState, PARTICIPANTS_PER_MATCH,
};

pub use crate::cards::{AbilityTag, CardCatalog, CardDefinition, CardId};

pub use crate::rules::{trim_submission, AbilityEngine, AbilityOutcome, FinalScores, MatchOutcome, TrimmedSubmission};

pub use crate::turn::{SubmissionCollector, TimerController, TimerStep, TurnReport, TurnResolver};

pub use crate::replication::{
    ApplyOutcome, ChannelTransport, Envelope, FullStateSnapshot, Message, Recipients, ReplicationCoordinator,
    Transport, TurnResultSnapshot,
};

pub use crate::events::{EventChannel, Notification};

pub use crate::context::{MatchContext, Role};
