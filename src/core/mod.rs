//! Core engine types: seats, ids, state, commands, RNG, configuration.

pub mod command;
pub mod config;
pub mod ids;
pub mod rng;
pub mod seat;
pub mod state;

pub use command::{AttackTarget, Command, CommandRecord};
pub use config::{MatchConfig, FIELD_SLOTS};
pub use ids::{InstanceId, InstanceIdGen};
pub use rng::GameRng;
pub use seat::{Seat, SeatMap};
pub use state::{CombatEvent, Field, MatchState, Phase, Player, Selection};
