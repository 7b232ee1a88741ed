//! Match configuration.
//!
//! `MatchConfig` collects the tunable constants of a duel. Both peers must
//! use the same configuration (and in particular the same `seed`) or their
//! replicas diverge from the first shuffle.
//!
//! Configs can be built in code or loaded from JSON; missing fields take
//! their defaults.
//!
//! ```
//! use duel_engine::core::MatchConfig;
//!
//! let config = MatchConfig::from_json(r#"{ "seed": 7, "starting_hp": 2000 }"#).unwrap();
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.starting_hp, 2000);
//! assert_eq!(config.mana_cap, 10);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Number of slots in each field row.
pub const FIELD_SLOTS: usize = 5;

/// Hard ceiling for `MatchConfig::mana_cap`.
pub const MAX_MANA: u32 = 10;

/// Tunable constants for a single match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Starting (and maximum) hit points.
    pub starting_hp: i32,

    /// Mana and max mana at match start.
    pub starting_mana: u32,

    /// Upper bound for max mana, at most `MAX_MANA`.
    pub mana_cap: u32,

    /// Cards drawn by each seat before the first turn.
    pub opening_hand: usize,

    /// Copies of each catalog card in the default deck.
    pub copies_per_card: usize,

    /// Largest custom deck accepted at match start.
    pub max_deck_size: usize,

    /// Shared seed for deck shuffling.
    pub seed: u64,

    /// First instance id handed out in this match.
    pub first_instance_id: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            starting_hp: 4000,
            starting_mana: 1,
            mana_cap: 10,
            opening_hand: 5,
            copies_per_card: 4,
            max_deck_size: 20,
            seed: 0,
            first_instance_id: 1,
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the mana and hit point settings can hold the match
    /// invariants: `0 <= mana <= max_mana <= mana_cap <= MAX_MANA` and a
    /// positive starting life total.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.mana_cap > MAX_MANA {
            return Err(CatalogError::InvalidConfig(format!(
                "mana_cap {} exceeds {}",
                self.mana_cap, MAX_MANA
            )));
        }
        if self.starting_mana > self.mana_cap {
            return Err(CatalogError::InvalidConfig(format!(
                "starting_mana {} exceeds mana_cap {}",
                self.starting_mana, self.mana_cap
            )));
        }
        if self.starting_hp <= 0 {
            return Err(CatalogError::InvalidConfig(format!(
                "starting_hp must be positive, got {}",
                self.starting_hp
            )));
        }
        Ok(())
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn starting_hp(mut self, hp: i32) -> Self {
        self.starting_hp = hp;
        self
    }

    pub fn mana(mut self, starting: u32, cap: u32) -> Self {
        self.starting_mana = starting;
        self.mana_cap = cap;
        self
    }

    pub fn opening_hand(mut self, size: usize) -> Self {
        self.opening_hand = size;
        self
    }

    pub fn max_deck_size(mut self, size: usize) -> Self {
        self.max_deck_size = size;
        self
    }

    pub fn first_instance_id(mut self, first: u64) -> Self {
        self.first_instance_id = first;
        self
    }
}
