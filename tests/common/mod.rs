//! Shared fixtures for integration tests.
//!
//! - `init_logging`: Idempotent tracing setup (`TEST_LOG`, then `RUST_LOG`, then `warn`)
//! - `catalog`: A small card catalog with every ability
//! - `Duel`: An authority and a replica wired through an in-memory relay

#![allow(dead_code)]

use std::sync::Arc;

use crossbeam_channel::Receiver;
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use duel_ccg::cards::{AbilityTag, CardCatalog, CardDefinition, CardId};
use duel_ccg::context::MatchContext;
use duel_ccg::core::{MatchConfig, ParticipantId};
use duel_ccg::events::Notification;
use duel_ccg::replication::{ChannelTransport, Envelope};

pub const HOST: ParticipantId = ParticipantId::new(1);
pub const GUEST: ParticipantId = ParticipantId::new(2);

static LOGGING: OnceCell<()> = OnceCell::new();

/// Initialize tracing once per test binary.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub const CATALOG_JSON: &str = r#"[
    { "id": 1, "name": "Spark", "cost": 2, "power": 3 },
    { "id": 2, "name": "Surge", "cost": 5, "power": 4, "abilities": ["DoublePower"] },
    { "id": 3, "name": "Boon", "cost": 0, "power": 0, "abilities": ["GainPoints"] },
    { "id": 4, "name": "Wall", "cost": 1, "power": 0, "abilities": ["BlockNextAttack"] },
    { "id": 5, "name": "Thief", "cost": 1, "power": 0, "abilities": ["StealPoints"] },
    { "id": 6, "name": "Scout", "cost": 1, "power": 1, "abilities": ["DrawExtraCard"] },
    { "id": 7, "name": "Relic", "cost": 0, "power": 1, "abilities": ["Ancient_Power"] }
]"#;

pub const SPARK: CardId = CardId::new(1);
pub const SURGE: CardId = CardId::new(2);
pub const BOON: CardId = CardId::new(3);
pub const WALL: CardId = CardId::new(4);
pub const THIEF: CardId = CardId::new(5);
pub const SCOUT: CardId = CardId::new(6);
pub const RELIC: CardId = CardId::new(7);

pub fn catalog() -> Arc<CardCatalog> {
    Arc::new(CardCatalog::from_json(CATALOG_JSON).unwrap())
}

pub fn card(id: u32, cost: u32, power: i32, tags: &[AbilityTag]) -> CardDefinition {
    tags.iter()
        .fold(CardDefinition::new(CardId::new(id), format!("Card {id}"), cost, power), |c, t| {
            c.with_ability(t.clone())
        })
}

/// An authority (`HOST`) and a replica (`GUEST`) connected by channels.
///
/// Outbound envelopes queue up until `pump` routes them. Delivery goes
/// through the byte codec so every test exercises the wire format.
pub struct Duel {
    pub host: MatchContext<ChannelTransport>,
    pub guest: MatchContext<ChannelTransport>,
    host_outbox: Receiver<Envelope>,
    guest_outbox: Receiver<Envelope>,
}

impl Duel {
    pub fn new(config: MatchConfig) -> Self {
        Self::with_catalog(config, catalog())
    }

    pub fn with_catalog(config: MatchConfig, catalog: Arc<CardCatalog>) -> Self {
        init_logging();
        let (host_transport, host_outbox) = ChannelTransport::unbounded();
        let (guest_transport, guest_outbox) = ChannelTransport::unbounded();
        let host = MatchContext::authority(config.clone(), Arc::clone(&catalog), HOST, &[HOST, GUEST], host_transport)
            .unwrap();
        let guest = MatchContext::replica(config, catalog, GUEST, guest_transport).unwrap();
        Self {
            host,
            guest,
            host_outbox,
            guest_outbox,
        }
    }

    /// Route queued envelopes until both outboxes are empty.
    ///
    /// Returns the number of envelopes delivered.
    pub fn pump(&mut self) -> usize {
        let mut delivered = 0;
        loop {
            let mut progressed = false;
            for envelope in self.host_outbox.try_iter().collect::<Vec<_>>() {
                delivered += self.route(&envelope);
                progressed = true;
            }
            for envelope in self.guest_outbox.try_iter().collect::<Vec<_>>() {
                delivered += self.route(&envelope);
                progressed = true;
            }
            if !progressed {
                return delivered;
            }
        }
    }

    /// Route only what the guest has sent.
    pub fn pump_guest(&mut self) -> usize {
        let mut delivered = 0;
        for envelope in self.guest_outbox.try_iter().collect::<Vec<_>>() {
            delivered += self.route(&envelope);
        }
        delivered
    }

    /// Replace the guest with a fresh replica that has seen nothing.
    pub fn reconnect_guest(&mut self) {
        let (transport, outbox) = ChannelTransport::unbounded();
        self.guest = MatchContext::replica(
            self.host.config().clone(),
            Arc::new(self.host.catalog().clone()),
            GUEST,
            transport,
        )
        .unwrap();
        self.guest_outbox = outbox;
    }

    /// Take the host's queued envelopes without delivering them.
    pub fn take_host_outbox(&self) -> Vec<Envelope> {
        self.host_outbox.try_iter().collect()
    }

    /// Take the guest's queued envelopes without delivering them.
    pub fn take_guest_outbox(&self) -> Vec<Envelope> {
        self.guest_outbox.try_iter().collect()
    }

    /// Deliver one envelope to its recipients.
    pub fn route(&mut self, envelope: &Envelope) -> usize {
        let bytes = envelope.message.encode().unwrap();
        let mut delivered = 0;
        if envelope.is_addressed_to(HOST, HOST) {
            self.host.handle_bytes(&bytes).unwrap();
            delivered += 1;
        }
        if envelope.is_addressed_to(GUEST, HOST) {
            self.guest.handle_bytes(&bytes).unwrap();
            delivered += 1;
        }
        delivered
    }

    /// Start the match and sync the guest.
    pub fn start(&mut self) {
        self.host.start();
        self.pump();
    }

    /// Both sides submit, then messages are routed.
    pub fn play(&mut self, host_cards: Vec<CardId>, guest_cards: Vec<CardId>) {
        self.host.play_cards(host_cards);
        self.guest.play_cards(guest_cards);
        self.pump();
    }

    /// Tick the host's timer `seconds` times, routing after each tick.
    pub fn tick(&mut self, seconds: u32) {
        for _ in 0..seconds {
            self.host.advance_timer();
            self.pump();
        }
    }
}

/// Drain every pending notification.
pub fn drain(receiver: &Receiver<Notification>) -> Vec<Notification> {
    receiver.try_iter().collect()
}
