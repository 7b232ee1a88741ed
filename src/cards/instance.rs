//! Card instances - runtime card state.
//!
//! `CardInstance` is one specific copy of a card in a match. It shares its
//! definition with every other copy and carries the per-copy state: current
//! combat stats and whether it may still attack this turn.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardId, CardKind};
use crate::core::ids::InstanceId;

/// A card instance in a match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique id for this copy.
    pub instance_id: InstanceId,

    /// Shared catalog definition.
    pub definition: Arc<CardDefinition>,

    /// Current attack; `None` for spells and traps.
    pub current_attack: Option<i32>,

    /// Current defense; `None` for spells and traps.
    pub current_defense: Option<i32>,

    /// May this instance still attack this turn?
    pub can_attack: bool,

    /// Always true for now; kept for hidden-card support.
    pub face_up: bool,
}

impl CardInstance {
    /// Create an instance with stats copied from its definition.
    #[must_use]
    pub fn new(instance_id: InstanceId, definition: Arc<CardDefinition>) -> Self {
        let (current_attack, current_defense) = match definition.kind {
            CardKind::Monster { attack, defense } => (Some(attack), Some(defense)),
            CardKind::Spell | CardKind::Trap => (None, None),
        };

        Self {
            instance_id,
            definition,
            current_attack,
            current_defense,
            can_attack: true,
            face_up: true,
        }
    }

    #[must_use]
    pub fn card_id(&self) -> &CardId {
        &self.definition.id
    }

    #[must_use]
    pub fn cost(&self) -> u32 {
        self.definition.cost
    }

    #[must_use]
    pub fn is_monster(&self) -> bool {
        self.definition.kind.is_monster()
    }

    /// Current attack, treating non-monsters as zero.
    #[must_use]
    pub fn attack_power(&self) -> i32 {
        self.current_attack.unwrap_or(0)
    }
}
