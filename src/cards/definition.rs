//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card as read from
//! the catalog. Attack and defense live on the `Monster` variant of
//! `CardKind`, so spells and traps cannot carry combat stats at all.
//!
//! Instance-specific data (current attack, whether it may still attack) is
//! stored separately in `CardInstance`.

use serde::{Deserialize, Serialize};

/// Identifier of a card definition in the catalog.
///
/// This identifies the "type" of card, not a specific copy in a game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Card type, with combat stats only where they apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CardKind {
    Monster { attack: i32, defense: i32 },
    Spell,
    Trap,
}

impl CardKind {
    #[must_use]
    pub fn is_monster(&self) -> bool {
        matches!(self, CardKind::Monster { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Air,
    Light,
    Dark,
    Ether,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use duel_engine::cards::{CardDefinition, CardKind, Element};
///
/// let drake = CardDefinition::monster("drake", "Ember Drake", Element::Fire, 3, 1800, 1200)
///     .with_subtype("Dragon");
///
/// assert_eq!(drake.attack(), Some(1800));
/// assert!(drake.kind.is_monster());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,

    /// Display name.
    pub name: String,

    /// Card type and, for monsters, combat stats.
    #[serde(flatten)]
    pub kind: CardKind,

    pub element: Element,

    /// Mana cost.
    pub cost: u32,

    #[serde(default)]
    pub description: String,

    /// Art reference, resolved by the rendering layer.
    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub rarity: Rarity,

    #[serde(default, rename = "subType", skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

impl CardDefinition {
    /// Create a definition with empty description and art.
    #[must_use]
    pub fn new(id: impl Into<CardId>, name: impl Into<String>, kind: CardKind, element: Element, cost: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            element,
            cost,
            description: String::new(),
            image: String::new(),
            rarity: Rarity::Common,
            subtype: None,
        }
    }

    /// Shorthand for a monster definition.
    #[must_use]
    pub fn monster(
        id: &str,
        name: impl Into<String>,
        element: Element,
        cost: u32,
        attack: i32,
        defense: i32,
    ) -> Self {
        Self::new(id, name, CardKind::Monster { attack, defense }, element, cost)
    }

    /// Shorthand for a spell definition.
    #[must_use]
    pub fn spell(id: &str, name: impl Into<String>, element: Element, cost: u32) -> Self {
        Self::new(id, name, CardKind::Spell, element, cost)
    }

    /// Shorthand for a trap definition.
    #[must_use]
    pub fn trap(id: &str, name: impl Into<String>, element: Element, cost: u32) -> Self {
        Self::new(id, name, CardKind::Trap, element, cost)
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Printed attack, for monsters.
    #[must_use]
    pub fn attack(&self) -> Option<i32> {
        match self.kind {
            CardKind::Monster { attack, .. } => Some(attack),
            _ => None,
        }
    }

    /// Printed defense, for monsters.
    #[must_use]
    pub fn defense(&self) -> Option<i32> {
        match self.kind {
            CardKind::Monster { defense, .. } => Some(defense),
            _ => None,
        }
    }
}
