//! Transport seam.
//!
//! The duel core never talks to a network directly. It hands addressed
//! [`Envelope`]s to a [`Transport`]; the host delivers them and feeds
//! received messages back through `MatchContext::handle_message` (or
//! `handle_bytes`).

use crossbeam_channel::{Receiver, Sender};

use super::message::Envelope;
use crate::core::{DuelError, DuelResult};

/// Outbound message sink.
pub trait Transport {
    /// Hand an envelope to the transport.
    fn send(&mut self, envelope: Envelope) -> DuelResult<()>;
}

/// Transport backed by a crossbeam channel.
///
/// The host drains the receiver and routes envelopes to their recipients.
#[derive(Clone, Debug)]
pub struct ChannelTransport {
    sender: Sender<Envelope>,
}

impl ChannelTransport {
    /// Create a transport and the receiver the host drains.
    #[must_use]
    pub fn unbounded() -> (Self, Receiver<Envelope>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }

    /// Wrap an existing sender.
    #[must_use]
    pub fn from_sender(sender: Sender<Envelope>) -> Self {
        Self { sender }
    }
}

impl Transport for ChannelTransport {
    fn send(&mut self, envelope: Envelope) -> DuelResult<()> {
        self.sender
            .send(envelope)
            .map_err(|err| DuelError::Transport(err.to_string()))
    }
}

/// Transport that drops everything. Useful for single-process tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn send(&mut self, _envelope: Envelope) -> DuelResult<()> {
        Ok(())
    }
}
