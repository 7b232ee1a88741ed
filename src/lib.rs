//! # duel-engine
//!
//! A deterministic rules engine for a two-player card duel, with
//! peer-to-peer replication of the match state.
//!
//! ## Design Principles
//!
//! 1. **Commands In, States Out**: Every change is a `Command` applied by
//!    `RulesEngine::apply`, which returns a new state or a `Rejection` and
//!    never touches its input.
//!
//! 2. **Replicas Converge**: Shuffles use a shared seed and instance ids are
//!    allocated inside the state, so two peers applying the same command
//!    stream from the same opening state hold identical states.
//!
//! 3. **Single Writer**: Only the active seat originates replicated
//!    commands, and remote commands go through the same validation as local
//!    ones.
//!
//! ## Modules
//!
//! - `core`: Seats, ids, commands, match state, RNG, configuration
//! - `cards`: Card definitions, instances, catalog, and deck lists
//! - `rules`: Command processing, turn flow, combat, match setup
//! - `replication`: Wire format, ordering inbox, transport, sessions
//! - `sim`: Two in-process peers played by a seeded bot
//! - `error`: Rejections and error types

pub mod cards;
pub mod core;
pub mod error;
pub mod replication;
pub mod rules;
pub mod sim;

// Re-export commonly used types
pub use crate::core::{
    AttackTarget, Command, CommandRecord, CombatEvent, GameRng, InstanceId, MatchConfig, MatchState, Phase, Seat,
    SeatMap,
};

pub use crate::cards::{CardCatalog, CardDefinition, CardId, CardInstance, CardKind, DeckList, Element, Rarity};

pub use crate::rules::{Applied, DuelRules, MatchBuilder, RulesEngine};

pub use crate::replication::{Envelope, MatchSession, MemoryBus, ReceiveReport, Transport};

pub use crate::error::{CatalogError, Rejection, SessionError, TransportError, WireError};
