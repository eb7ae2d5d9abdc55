//! Card data: identifiers, definitions, ability tags, and the catalog.
//!
//! - `CardDefinition`: Immutable cost, power and ability tags of a card
//! - `AbilityTag`: Closed vocabulary of special effects
//! - `CardCatalog`: Read-only lookup loaded once per match

pub mod ability;
pub mod definition;
pub mod catalog;

pub use ability::AbilityTag;
pub use definition::{CardDefinition, CardId};
pub use catalog::CardCatalog;
