//! Duel rules: command processing, turn flow, combat, and match setup.
//!
//! `RulesEngine` defines:
//! - How commands are validated and applied
//! - Which commands a seat may originate
//! - Win conditions
//!
//! `DuelRules` is the implementation; `MatchBuilder` creates the opening
//! state it operates on.

pub mod combat;
pub mod engine;
pub mod setup;
mod turn;

pub use combat::{clash, Clash};
pub use engine::{Applied, DuelRules, RulesEngine};
pub use setup::MatchBuilder;
