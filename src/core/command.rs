//! Commands: the only way to change a match.
//!
//! Each variant names what a seat wants to do. The same `Command` value is
//! applied locally, carried on the wire, and applied again by the peer.
//!
//! `SelectAttacker` is the one local-only command: it moves UI selection
//! state and is never replicated.

use serde::{Deserialize, Serialize};

use super::ids::InstanceId;
use super::seat::Seat;

/// Target of an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackTarget {
    /// Hit the opposing player's hit points. Only legal against an empty row.
    Direct,
    /// Fight a specific monster on the opposing row.
    Monster(InstanceId),
}

impl std::fmt::Display for AttackTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttackTarget::Direct => f.write_str("DIRECT"),
            AttackTarget::Monster(id) => write!(f, "{}", id),
        }
    }
}

/// A request to change the match state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Move the tail of `seat`'s deck into their hand.
    DrawCard { seat: Seat },

    /// Play `instance` from hand. `slot` picks the monster slot and is
    /// ignored for spells and traps.
    PlayCard {
        seat: Seat,
        instance: InstanceId,
        slot: usize,
    },

    /// Attack with a monster on the active player's row.
    Attack {
        attacker: InstanceId,
        target: AttackTarget,
    },

    /// Step the turn state machine forward.
    AdvancePhase { actor: Seat },

    /// Set or clear the pending attacker selection (local only).
    SelectAttacker { instance: Option<InstanceId> },
}

impl Command {
    /// Whether this command changes authoritative state and must be sent
    /// to the peer.
    #[must_use]
    pub fn is_replicated(&self) -> bool {
        !matches!(self, Command::SelectAttacker { .. })
    }

    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Command::DrawCard { .. } => "draw_card",
            Command::PlayCard { .. } => "play_card",
            Command::Attack { .. } => "attack",
            Command::AdvancePhase { .. } => "advance_phase",
            Command::SelectAttacker { .. } => "select_attacker",
        }
    }
}

/// A command together with who originated it and where it sits in that
/// origin's stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// The seat that originated the command.
    pub origin: Seat,

    /// The command.
    pub command: Command,

    /// Per-origin sequence number, starting at 1.
    pub sequence: u64,
}

impl CommandRecord {
    #[must_use]
    pub fn new(origin: Seat, command: Command, sequence: u64) -> Self {
        Self {
            origin,
            command,
            sequence,
        }
    }
}
