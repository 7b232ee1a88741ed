//! Card catalog for definition lookup.
//!
//! The `CardCatalog` is the read-only reference dataset supplied at
//! startup. It keeps definitions in load order (the default deck is built
//! in that order) and provides fast lookup by `CardId`.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};
use super::instance::CardInstance;
use crate::core::ids::InstanceId;
use crate::error::CatalogError;

/// Catalog of card definitions.
///
/// ## Example
///
/// ```
/// use duel_engine::cards::{CardCatalog, CardDefinition, CardId, Element};
///
/// let mut catalog = CardCatalog::new();
/// catalog
///     .register(CardDefinition::monster("m-01", "Sylph", Element::Air, 1, 800, 600))
///     .unwrap();
///
/// let found = catalog.get(&CardId::new("m-01")).unwrap();
/// assert_eq!(found.name, "Sylph");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: Vec<Arc<CardDefinition>>,
    index: FxHashMap<CardId, usize>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions, failing on duplicate ids.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = CardDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for def in definitions {
            catalog.register(def)?;
        }
        Ok(catalog)
    }

    /// Parse a JSON array of catalog records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let definitions: Vec<CardDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions)
    }

    /// Register a card definition.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), CatalogError> {
        if self.index.contains_key(&card.id) {
            return Err(CatalogError::DuplicateCard(card.id));
        }
        self.index.insert(card.id.clone(), self.cards.len());
        self.cards.push(Arc::new(card));
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Arc<CardDefinition>> {
        self.index.get(id).map(|&i| &self.cards[i])
    }

    /// Get a card definition, failing with `UnknownCard`.
    pub fn lookup(&self, id: &CardId) -> Result<&Arc<CardDefinition>, CatalogError> {
        self.get(id).ok_or_else(|| CatalogError::UnknownCard(id.clone()))
    }

    /// Create a fresh instance of `id`.
    pub fn instantiate(&self, id: &CardId, instance_id: InstanceId) -> Result<CardInstance, CatalogError> {
        let def = self.lookup(id)?;
        Ok(CardInstance::new(instance_id, Arc::clone(def)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over definitions in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.cards.iter()
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &Arc<CardDefinition>>
    where
        F: Fn(&CardDefinition) -> bool,
    {
        self.cards.iter().filter(move |c| predicate(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardKind, Element};

    fn sample() -> CardCatalog {
        CardCatalog::from_definitions([
            CardDefinition::monster("m-01", "Sylph", Element::Air, 1, 800, 600),
            CardDefinition::spell("s-01", "Spark", Element::Fire, 1),
            CardDefinition::monster("m-02", "Golem", Element::Light, 3, 1600, 2000),
        ])
        .unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let catalog = sample();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(&CardId::new("m-02")).unwrap().name, "Golem");
        assert!(catalog.get(&CardId::new("zz")).is_none());
    }

    #[test]
    fn test_duplicate_id_fails() {
        let mut catalog = sample();
        let err = catalog
            .register(CardDefinition::trap("m-01", "Impostor", Element::Dark, 0))
            .unwrap_err();

        assert!(matches!(err, CatalogError::DuplicateCard(id) if id.as_str() == "m-01"));
    }

    #[test]
    fn test_iteration_keeps_load_order() {
        let catalog = sample();
        let ids: Vec<_> = catalog.iter().map(|c| c.id.as_str()).collect();

        assert_eq!(ids, vec!["m-01", "s-01", "m-02"]);
    }

    #[test]
    fn test_instantiate_unknown_fails_fast() {
        let catalog = sample();
        let err = catalog.instantiate(&CardId::new("nope"), InstanceId(1)).unwrap_err();

        assert!(matches!(err, CatalogError::UnknownCard(_)));
    }

    #[test]
    fn test_find_monsters() {
        let catalog = sample();
        let monsters: Vec<_> = catalog.find(|c| c.kind.is_monster()).collect();

        assert_eq!(monsters.len(), 2);
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            { "id": "m-01", "name": "Sylph", "type": "monster", "attack": 800, "defense": 600,
              "element": "air", "cost": 1 },
            { "id": "s-01", "name": "Spark", "type": "spell", "element": "fire", "cost": 1 }
        ]"#;

        let catalog = CardCatalog::from_json(json).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(&CardId::new("m-01")).unwrap().kind,
            CardKind::Monster { attack: 800, defense: 600 }
        );
    }
}
