//! Error types for the duel engine.

use thiserror::Error;

use crate::cards::CardId;
use crate::core::{InstanceId, Phase, Seat};

/// Why a command was refused.
///
/// A rejected command leaves the match state untouched. Rejections are
/// local: they are reported to the caller that submitted the command and
/// never sent to the remote peer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("command not allowed during the {actual:?} phase (needs {required:?})")]
    WrongPhase { required: Phase, actual: Phase },

    #[error("{actor} is not the active player ({active} is)")]
    NotActivePlayer { actor: Seat, active: Seat },

    #[error("insufficient mana: need {cost}, have {available}")]
    InsufficientMana { cost: u32, available: u32 },

    #[error("monster slot {0} is occupied")]
    SlotOccupied(usize),

    #[error("slot index {0} is out of range")]
    InvalidSlot(usize),

    #[error("instance {0} is not in the player's hand")]
    NotInHand(InstanceId),

    #[error("instance {0} is not on the active player's monster row")]
    AttackerNotFound(InstanceId),

    #[error("instance {0} has already attacked this turn")]
    CannotAttack(InstanceId),

    #[error("instance {0} has no attack power")]
    NoAttackPower(InstanceId),

    #[error("instance {0} is not on the opposing monster row")]
    IllegalTarget(InstanceId),

    #[error("direct attack blocked: the opponent controls monsters")]
    DirectAttackBlocked,

    #[error("card {0} is not in the catalog")]
    UnknownCard(CardId),

    #[error("the match is already decided")]
    MatchOver,

    #[error("the local seat {local} cannot originate commands while {active} is active")]
    NotLocalTurn { local: Seat, active: Seat },

    #[error("remote command from {origin} arrived while {active} is active")]
    OriginNotActive { origin: Seat, active: Seat },
}

/// Errors building or querying the card catalog, decks and match config.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("card {0} is not in the catalog")]
    UnknownCard(CardId),

    #[error("card {0} is registered twice")]
    DuplicateCard(CardId),

    #[error("deck has {size} cards, the limit is {max}")]
    DeckTooLarge { size: usize, max: usize },

    #[error("invalid match config: {0}")]
    InvalidConfig(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors encoding or decoding wire messages.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("failed to encode envelope: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode envelope: {0}")]
    Decode(#[source] bincode::Error),
}

/// Broadcast failures. There is no acknowledgment or retry: a failed
/// broadcast leaves the two replicas diverged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("channel {0} is closed")]
    Closed(String),

    #[error("frame dropped before delivery")]
    Dropped,
}

/// Errors surfaced by a `MatchSession`.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("command rejected: {0}")]
    Rejected(#[from] Rejection),

    /// The command was applied locally but the peer never saw it.
    #[error("command applied locally but broadcast failed: {0}")]
    Broadcast(#[from] TransportError),

    #[error(transparent)]
    Wire(#[from] WireError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
