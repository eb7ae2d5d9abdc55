//! Card catalog for definition lookup.
//!
//! The `CardCatalog` is loaded once at match start and read-only afterwards,
//! so it is shared between components behind an `Arc` without locking.

use rustc_hash::FxHashMap;
use tracing::warn;

use super::definition::{CardDefinition, CardId};
use crate::core::{DuelError, DuelResult};

/// Immutable lookup from card id to definition.
///
/// ## Example
///
/// ```
/// use duel_ccg::cards::{CardCatalog, CardId};
///
/// let catalog = CardCatalog::from_json(
///     r#"[{ "id": 1, "name": "Spark", "cost": 2, "power": 3 }]"#,
/// ).unwrap();
///
/// assert_eq!(catalog.get(CardId::new(1)).unwrap().power, 3);
/// assert!(catalog.get(CardId::new(9)).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions, rejecting duplicate ids.
    pub fn from_cards(cards: impl IntoIterator<Item = CardDefinition>) -> DuelResult<Self> {
        let mut catalog = Self::new();
        for card in cards {
            if catalog.cards.contains_key(&card.id) {
                return Err(DuelError::DuplicateCard(card.id));
            }
            catalog.cards.insert(card.id, card);
        }
        if catalog.is_empty() {
            warn!("card catalog is empty; participants will play with empty decks");
        }
        Ok(catalog)
    }

    /// Parse a catalog from a JSON list of card definitions.
    pub fn from_json(json: &str) -> DuelResult<Self> {
        let cards: Vec<CardDefinition> =
            serde_json::from_str(json).map_err(|e| DuelError::CatalogParse(e.to_string()))?;
        Self::from_cards(cards)
    }

    /// Add a card (builder pattern). A card with the same id is replaced.
    #[must_use]
    pub fn with_card(mut self, card: CardDefinition) -> Self {
        self.cards.insert(card.id, card);
        self
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Check if a card ID is in the catalog.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// All card ids in ascending order.
    ///
    /// Deck seeding starts from this list so it does not depend on hash order.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self.cards.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
