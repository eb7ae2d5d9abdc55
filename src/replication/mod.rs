//! State replication between the authority and the other participants.
//!
//! - `snapshot`: Turn-result and full-state payloads
//! - `message`: Message kinds, event codes, addressing, and the wire codec
//! - `transport`: The outbound seam the host implements
//! - `coordinator`: Packaging on the authority, stale/version checks on receivers

pub mod snapshot;
pub mod message;
pub mod transport;
pub mod coordinator;

pub use snapshot::{
    FullStateSnapshot, ParticipantSnapshot, ParticipantTurnResult, TurnResultSnapshot, SNAPSHOT_VERSION,
};
pub use message::{Delivery, Envelope, Message, Recipients};
pub use transport::{ChannelTransport, NullTransport, Transport};
pub use coordinator::{ApplyOutcome, ReplicationCoordinator};
