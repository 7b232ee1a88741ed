//! Deck lists handed to match initialization.
//!
//! A `DeckList` is an ordered list of card ids. Duplicates are allowed; the
//! only limits are the total size and catalog membership, both checked up
//! front so that later draws cannot fail on a bad id.

use serde::{Deserialize, Serialize};

use super::catalog::CardCatalog;
use super::definition::CardId;
use crate::error::CatalogError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckList {
    cards: Vec<CardId>,
}

impl DeckList {
    #[must_use]
    pub fn new(cards: Vec<CardId>) -> Self {
        Self { cards }
    }

    /// Every catalog card `copies` times, in catalog order.
    #[must_use]
    pub fn standard(catalog: &CardCatalog, copies: usize) -> Self {
        let cards = catalog
            .iter()
            .flat_map(|def| std::iter::repeat(def.id.clone()).take(copies))
            .collect();
        Self { cards }
    }

    /// Check the size limit and that every id is in the catalog.
    pub fn validate(&self, catalog: &CardCatalog, max_size: usize) -> Result<(), CatalogError> {
        if self.cards.len() > max_size {
            return Err(CatalogError::DeckTooLarge {
                size: self.cards.len(),
                max: max_size,
            });
        }
        for id in &self.cards {
            catalog.lookup(id)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    #[must_use]
    pub fn into_cards(self) -> Vec<CardId> {
        self.cards
    }
}

impl FromIterator<CardId> for DeckList {
    fn from_iter<I: IntoIterator<Item = CardId>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, Element};

    fn catalog() -> CardCatalog {
        CardCatalog::from_definitions([
            CardDefinition::monster("a", "A", Element::Fire, 1, 100, 100),
            CardDefinition::spell("b", "B", Element::Air, 1),
        ])
        .unwrap()
    }

    #[test]
    fn test_standard_deck() {
        let deck = DeckList::standard(&catalog(), 4);

        assert_eq!(deck.len(), 8);
        assert_eq!(deck.cards()[0], CardId::new("a"));
        assert_eq!(deck.cards()[4], CardId::new("b"));
    }

    #[test]
    fn test_duplicates_allowed() {
        let deck: DeckList = std::iter::repeat(CardId::new("a")).take(20).collect();

        assert!(deck.validate(&catalog(), 20).is_ok());
    }

    #[test]
    fn test_too_large() {
        let deck: DeckList = std::iter::repeat(CardId::new("a")).take(21).collect();
        let err = deck.validate(&catalog(), 20).unwrap_err();

        assert!(matches!(err, CatalogError::DeckTooLarge { size: 21, max: 20 }));
    }

    #[test]
    fn test_unknown_card() {
        let deck = DeckList::new(vec![CardId::new("a"), CardId::new("ghost")]);
        let err = deck.validate(&catalog(), 20).unwrap_err();

        assert!(matches!(err, CatalogError::UnknownCard(id) if id.as_str() == "ghost"));
    }

    #[test]
    fn test_serialized_as_plain_list() {
        let deck: DeckList = serde_json::from_str(r#"["a", "b", "a"]"#).unwrap();
        assert_eq!(deck.len(), 3);
    }
}
