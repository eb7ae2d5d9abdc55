//! Card definitions - static card data.
//!
//! A `CardDefinition` is the immutable description of a card: its cost, its
//! base power, and the ability tags it contributes when played. Hands and draw
//! piles only hold `CardId`s; everything else is looked up in the catalog.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ability::AbilityTag;

/// Unique identifier for a card definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Static card definition.
///
/// Ability tags are ordered and may repeat: a card carrying `GainPoints`
/// twice grants the bonus twice.
///
/// ## Example
///
/// ```
/// use duel_ccg::cards::{AbilityTag, CardDefinition, CardId};
///
/// let card = CardDefinition::new(CardId::new(2), "Surge", 5, 4)
///     .with_ability(AbilityTag::DoublePower);
///
/// assert_eq!(card.cost, 5);
/// assert!(card.has_ability(&AbilityTag::DoublePower));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name (for display/debugging).
    #[serde(default)]
    pub name: String,

    /// Energy spent to play the card.
    pub cost: u32,

    /// Points added to the player's power when played.
    pub power: i32,

    /// Ability tags, in order, duplicates meaningful.
    #[serde(default)]
    pub abilities: SmallVec<[AbilityTag; 2]>,
}

impl CardDefinition {
    /// Create a new card definition with no abilities.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, cost: u32, power: i32) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            power,
            abilities: SmallVec::new(),
        }
    }

    /// Append an ability tag (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, tag: impl Into<AbilityTag>) -> Self {
        self.abilities.push(tag.into());
        self
    }

    /// Check whether the card carries a tag at least once.
    #[must_use]
    pub fn has_ability(&self, tag: &AbilityTag) -> bool {
        self.abilities.contains(tag)
    }
}
