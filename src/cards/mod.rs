//! Card system: definitions, instances, catalog, and deck lists.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardKind`: Monster (with attack/defense), spell, or trap
//! - `CardDefinition`: Static card data from the catalog
//! - `CardInstance`: One copy of a card in a match
//! - `CardCatalog`: Read-only definition lookup
//! - `DeckList`: Ordered card ids handed to match setup

pub mod catalog;
pub mod deck;
pub mod definition;
pub mod instance;

pub use catalog::CardCatalog;
pub use deck::DeckList;
pub use definition::{CardDefinition, CardId, CardKind, Element, Rarity};
pub use instance::CardInstance;
