//! Ability tags.
//!
//! Cards carry an ordered list of tags drawn from a closed vocabulary. Tags
//! outside the vocabulary are kept verbatim (so snapshots replicate them
//! exactly) but have no effect during resolution.

use serde::{Deserialize, Serialize};

/// A marker on a card selecting a special effect during resolution.
///
/// Serialized as its plain string name.
///
/// ```
/// use duel_ccg::cards::AbilityTag;
///
/// assert_eq!(AbilityTag::from("DoublePower"), AbilityTag::DoublePower);
/// assert_eq!(AbilityTag::from("Shiny"), AbilityTag::Other("Shiny".to_string()));
/// assert_eq!(AbilityTag::GainPoints.as_str(), "GainPoints");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AbilityTag {
    /// +2 score for the player.
    GainPoints,
    /// Take 1 point from the first opponent with a positive score.
    StealPoints,
    /// Zero every opponent's finalized power this turn.
    BlockNextAttack,
    /// Double the player's base power this turn.
    DoublePower,
    /// Draw one extra card.
    DrawExtraCard,
    /// Unrecognized tag, ignored by resolution.
    Other(String),
}

impl AbilityTag {
    /// The tag's canonical name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            AbilityTag::GainPoints => "GainPoints",
            AbilityTag::StealPoints => "StealPoints",
            AbilityTag::BlockNextAttack => "BlockNextAttack",
            AbilityTag::DoublePower => "DoublePower",
            AbilityTag::DrawExtraCard => "DrawExtraCard",
            AbilityTag::Other(name) => name,
        }
    }

    /// Human-readable description for presentation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            AbilityTag::GainPoints => "Gain +2 score".to_string(),
            AbilityTag::StealPoints => "Steal 1 point from opponent".to_string(),
            AbilityTag::BlockNextAttack => "Block opponent's attack this turn".to_string(),
            AbilityTag::DoublePower => "Double this card's power".to_string(),
            AbilityTag::DrawExtraCard => "Draw +1 card immediately".to_string(),
            AbilityTag::Other(name) => name.replace('_', " "),
        }
    }

    /// Check whether resolution knows this tag.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, AbilityTag::Other(_))
    }
}

impl From<&str> for AbilityTag {
    fn from(name: &str) -> Self {
        match name {
            "GainPoints" => AbilityTag::GainPoints,
            "StealPoints" => AbilityTag::StealPoints,
            "BlockNextAttack" => AbilityTag::BlockNextAttack,
            "DoublePower" => AbilityTag::DoublePower,
            "DrawExtraCard" => AbilityTag::DrawExtraCard,
            other => AbilityTag::Other(other.to_string()),
        }
    }
}

impl From<String> for AbilityTag {
    fn from(name: String) -> Self {
        match AbilityTag::from(name.as_str()) {
            AbilityTag::Other(_) => AbilityTag::Other(name),
            known => known,
        }
    }
}

impl From<AbilityTag> for String {
    fn from(tag: AbilityTag) -> Self {
        match tag {
            AbilityTag::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for AbilityTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
