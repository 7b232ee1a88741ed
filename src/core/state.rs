//! Match state: the serializable snapshot of one duel.
//!
//! ## Player
//!
//! Per-seat resources and zones: hit points, mana, hand, deck,
//! graveyard, and the two five-slot field rows.
//!
//! ## MatchState
//!
//! Everything both replicas must agree on, plus three local fields
//! (`viewer`, `selection`, `last_event`) that are presentation-only.
//! `checksum` covers the authoritative part only, so two peers with
//! different viewers or selections still compare equal.
//!
//! Zones use `im` persistent vectors, so producing a new state per command
//! only copies what the command touches.

use im::Vector;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use smallvec::SmallVec;

use super::command::AttackTarget;
use super::config::{MatchConfig, FIELD_SLOTS};
use super::ids::{InstanceId, InstanceIdGen};
use super::seat::{Seat, SeatMap};
use crate::cards::{CardId, CardInstance};

/// The four stages of a turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Draw,
    Main,
    Battle,
    End,
}

impl Phase {
    /// The phase that follows this one. `End` wraps to `Draw`.
    #[must_use]
    pub const fn next(self) -> Phase {
        match self {
            Phase::Draw => Phase::Main,
            Phase::Main => Phase::Battle,
            Phase::Battle => Phase::End,
            Phase::End => Phase::Draw,
        }
    }
}

/// Pending UI selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    /// Field instance chosen as attacker, waiting for a target.
    pub attacker: InstanceId,
}

/// What the last attack did. For presentation only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatEvent {
    pub attacker: InstanceId,
    pub target: AttackTarget,
    /// Hit points lost by `damaged`.
    pub damage: i32,
    /// The seat that lost hit points, if any.
    pub damaged: Option<Seat>,
    /// Instances destroyed by the attack.
    pub destroyed: SmallVec<[InstanceId; 2]>,
}

/// The two five-slot rows in front of a player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub monsters: [Option<CardInstance>; FIELD_SLOTS],
    pub spells: [Option<CardInstance>; FIELD_SLOTS],
}

impl Field {
    /// Slot index of a monster on this row.
    #[must_use]
    pub fn monster_slot(&self, instance: InstanceId) -> Option<usize> {
        self.monsters
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|m| m.instance_id == instance))
    }

    /// Iterate over occupied monster slots.
    pub fn monsters(&self) -> impl Iterator<Item = &CardInstance> {
        self.monsters.iter().flatten()
    }

    #[must_use]
    pub fn has_monsters(&self) -> bool {
        self.monsters.iter().any(Option::is_some)
    }

    /// Remove and return the monster in `slot`.
    pub fn take_monster(&mut self, slot: usize) -> Option<CardInstance> {
        self.monsters.get_mut(slot).and_then(Option::take)
    }
}

/// One seat's side of the match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub seat: Seat,
    pub name: String,

    /// May go below zero; any value `<= 0` is a loss.
    pub hp: i32,
    pub max_hp: i32,

    pub mana: u32,
    pub max_mana: u32,

    /// Ordered hand.
    pub hand: Vector<CardInstance>,

    /// Card ids, drawn from the back.
    pub deck: Vector<CardId>,

    pub graveyard: Vector<CardInstance>,

    pub field: Field,
}

impl Player {
    /// A player with full hit points, starting mana, and no cards.
    #[must_use]
    pub fn new(seat: Seat, name: impl Into<String>, config: &MatchConfig) -> Self {
        Self {
            seat,
            name: name.into(),
            hp: config.starting_hp,
            max_hp: config.starting_hp,
            mana: config.starting_mana,
            max_mana: config.starting_mana,
            hand: Vector::new(),
            deck: Vector::new(),
            graveyard: Vector::new(),
            field: Field::default(),
        }
    }

    /// Position of an instance in hand.
    #[must_use]
    pub fn hand_position(&self, instance: InstanceId) -> Option<usize> {
        self.hand.iter().position(|c| c.instance_id == instance)
    }

    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// Every instance id this player currently holds outside the deck.
    pub fn instance_ids(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.hand
            .iter()
            .chain(self.graveyard.iter())
            .chain(self.field.monsters.iter().flatten())
            .chain(self.field.spells.iter().flatten())
            .map(|c| c.instance_id)
    }
}

/// The fields `checksum` covers, in a fixed order.
#[derive(Serialize)]
struct Authoritative<'a> {
    turn: u32,
    phase: Phase,
    active: Seat,
    players: &'a SeatMap<Player>,
    winner: Option<Seat>,
    ids: &'a InstanceIdGen,
}

/// Complete state of one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    /// Room the match is played in.
    pub room: Option<String>,

    /// Turn number (starts at 1, +1 per handover).
    pub turn: u32,

    pub phase: Phase,

    /// Seat whose turn it is.
    pub active: Seat,

    /// Local seat assignment. Differs between peers.
    pub viewer: Option<Seat>,

    /// Pending attacker selection. Local only.
    pub selection: Option<Selection>,

    /// Last resolved attack. Presentation only.
    pub last_event: Option<CombatEvent>,

    pub players: SeatMap<Player>,

    /// Decided winner, `None` while the match is open.
    pub winner: Option<Seat>,

    /// Instance id allocator.
    pub ids: InstanceIdGen,
}

impl MatchState {
    /// An empty match in the draw phase of turn 1, `First` active.
    #[must_use]
    pub fn new(names: [&str; 2], config: &MatchConfig) -> Self {
        Self {
            room: None,
            turn: 1,
            phase: Phase::Draw,
            active: Seat::First,
            viewer: None,
            selection: None,
            last_event: None,
            players: SeatMap::new(|seat| Player::new(seat, names[seat.index()], config)),
            winner: None,
            ids: InstanceIdGen::starting_at(config.first_instance_id),
        }
    }

    #[must_use]
    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat]
    }

    pub fn player_mut(&mut self, seat: Seat) -> &mut Player {
        &mut self.players[seat]
    }

    #[must_use]
    pub fn active_player(&self) -> &Player {
        &self.players[self.active]
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Hash of the authoritative state.
    ///
    /// Leaves out `room`, `viewer`, `selection` and `last_event`. The value is
    /// the first eight bytes (little-endian) of SHA-256 over the JSON form of
    /// the authoritative fields, so it is the same on every target.
    #[must_use]
    pub fn checksum(&self) -> u64 {
        let authoritative = Authoritative {
            turn: self.turn,
            phase: self.phase,
            active: self.active,
            players: &self.players,
            winner: self.winner,
            ids: &self.ids,
        };
        let bytes = serde_json::to_vec(&authoritative).unwrap_or_default();
        let digest = Sha256::digest(&bytes);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(head)
    }

    /// Compare the authoritative parts of two states.
    #[must_use]
    pub fn converged_with(&self, other: &MatchState) -> bool {
        self.turn == other.turn
            && self.phase == other.phase
            && self.active == other.active
            && self.players == other.players
            && self.winner == other.winner
            && self.ids == other.ids
    }
}
