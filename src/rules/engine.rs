//! Command processor.
//!
//! `RulesEngine` is the seam between match state and anything that wants
//! to change it. `DuelRules` implements it for the duel:
//! - validate a command against the current state
//! - produce a new state (the input is never touched)
//! - report what happened for presentation
//!
//! Locally submitted and remotely received commands go through the same
//! `apply`, which is what keeps the two replicas convergent.

use std::sync::Arc;

use tracing::debug;

use super::combat;
use crate::cards::{CardCatalog, CardId, CardInstance};
use crate::core::command::{AttackTarget, Command};
use crate::core::config::MatchConfig;
use crate::core::ids::InstanceId;
use crate::core::seat::Seat;
use crate::core::state::{CombatEvent, MatchState, Phase, Selection};
use crate::error::Rejection;

/// Result of a successfully applied command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    /// The state after the command.
    pub state: MatchState,
    /// Presentation event, produced by attacks.
    pub event: Option<CombatEvent>,
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `apply` must be deterministic and free of side effects beyond the
///   returned state; replicas depend on it.
/// - `legal_commands` returns an empty vec when the seat cannot act.
pub trait RulesEngine {
    /// Get the match configuration.
    fn config(&self) -> &MatchConfig;

    /// Validate `command` against `state` and apply it.
    fn apply(&self, state: &MatchState, command: &Command) -> Result<Applied, Rejection>;

    /// Enumerate the replicated commands `seat` may originate right now.
    fn legal_commands(&self, state: &MatchState, seat: Seat) -> Vec<Command>;
}

/// Rules for the two-seat duel.
#[derive(Clone, Debug)]
pub struct DuelRules {
    catalog: Arc<CardCatalog>,
    config: MatchConfig,
}

impl DuelRules {
    #[must_use]
    pub fn new(catalog: Arc<CardCatalog>, config: MatchConfig) -> Self {
        Self { catalog, config }
    }

    /// Get the card catalog.
    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// Move the tail of `seat`'s deck into their hand as a new instance.
    ///
    /// Returns the new instance id, `None` for an empty deck, or the card
    /// id that is missing from the catalog.
    pub(crate) fn draw_into_hand(
        &self,
        state: &mut MatchState,
        seat: Seat,
    ) -> Result<Option<InstanceId>, CardId> {
        let Some(card_id) = state.player(seat).deck.last().cloned() else {
            return Ok(None);
        };
        let definition = match self.catalog.get(&card_id) {
            Some(def) => Arc::clone(def),
            None => return Err(card_id),
        };

        let instance_id = state.ids.alloc();
        let player = state.player_mut(seat);
        player.deck.pop_back();
        player.hand.push_back(CardInstance::new(instance_id, definition));
        Ok(Some(instance_id))
    }

    pub(crate) fn draw_card(&self, state: &mut MatchState, seat: Seat) -> Result<(), Rejection> {
        self.draw_into_hand(state, seat)
            .map(|_| ())
            .map_err(Rejection::UnknownCard)
    }

    fn play_card(
        &self,
        state: &mut MatchState,
        seat: Seat,
        instance: InstanceId,
        slot: usize,
    ) -> Result<(), Rejection> {
        if state.phase != Phase::Main {
            return Err(Rejection::WrongPhase {
                required: Phase::Main,
                actual: state.phase,
            });
        }
        if seat != state.active {
            return Err(Rejection::NotActivePlayer {
                actor: seat,
                active: state.active,
            });
        }

        let player = state.player(seat);
        let position = player
            .hand_position(instance)
            .ok_or(Rejection::NotInHand(instance))?;
        let card = &player.hand[position];
        let cost = card.cost();
        if player.mana < cost {
            return Err(Rejection::InsufficientMana {
                cost,
                available: player.mana,
            });
        }
        let is_monster = card.is_monster();
        if is_monster {
            match player.field.monsters.get(slot) {
                None => return Err(Rejection::InvalidSlot(slot)),
                Some(Some(_)) => return Err(Rejection::SlotOccupied(slot)),
                Some(None) => {}
            }
        }

        let player = state.player_mut(seat);
        let mut card = player.hand.remove(position);
        player.mana -= cost;
        if is_monster {
            card.can_attack = true;
            player.field.monsters[slot] = Some(card);
        } else {
            // Spells and traps have no resolved effect yet.
            player.graveyard.push_back(card);
        }
        Ok(())
    }

    fn play_commands(&self, state: &MatchState, seat: Seat, out: &mut Vec<Command>) {
        let player = state.player(seat);
        let open_slot = player.field.monsters.iter().position(Option::is_none);

        for card in player.hand.iter().filter(|c| c.cost() <= player.mana) {
            let slot = if card.is_monster() {
                match open_slot {
                    Some(slot) => slot,
                    None => continue,
                }
            } else {
                0
            };
            out.push(Command::PlayCard {
                seat,
                instance: card.instance_id,
                slot,
            });
        }
    }

    fn attack_commands(&self, state: &MatchState, seat: Seat, out: &mut Vec<Command>) {
        let defender = &state.player(seat.opponent()).field;

        for attacker in state.player(seat).field.monsters() {
            if !attacker.can_attack || attacker.attack_power() <= 0 {
                continue;
            }
            if defender.has_monsters() {
                for target in defender.monsters() {
                    out.push(Command::Attack {
                        attacker: attacker.instance_id,
                        target: AttackTarget::Monster(target.instance_id),
                    });
                }
            } else {
                out.push(Command::Attack {
                    attacker: attacker.instance_id,
                    target: AttackTarget::Direct,
                });
            }
        }
    }
}

impl RulesEngine for DuelRules {
    fn config(&self) -> &MatchConfig {
        &self.config
    }

    fn apply(&self, state: &MatchState, command: &Command) -> Result<Applied, Rejection> {
        if command.is_replicated() && state.is_over() {
            return Err(Rejection::MatchOver);
        }

        let mut next = state.clone();
        let event = match command {
            Command::DrawCard { seat } => {
                self.draw_card(&mut next, *seat)?;
                None
            }
            Command::PlayCard {
                seat,
                instance,
                slot,
            } => {
                self.play_card(&mut next, *seat, *instance, *slot)?;
                None
            }
            Command::Attack { attacker, target } => {
                Some(combat::resolve_attack(&mut next, *attacker, *target)?)
            }
            Command::AdvancePhase { actor } => {
                self.advance_phase(&mut next, *actor)?;
                None
            }
            Command::SelectAttacker { instance } => {
                next.selection = instance.map(|attacker| Selection { attacker });
                None
            }
        };

        if let Some(event) = &event {
            next.last_event = Some(event.clone());
        }

        debug!(
            command = command.kind(),
            turn = next.turn,
            phase = ?next.phase,
            active = %next.active,
            "applied command"
        );

        Ok(Applied { state: next, event })
    }

    fn legal_commands(&self, state: &MatchState, seat: Seat) -> Vec<Command> {
        if state.is_over() || seat != state.active {
            return vec![];
        }

        let mut commands = Vec::new();
        match state.phase {
            Phase::Main => self.play_commands(state, seat, &mut commands),
            Phase::Battle => self.attack_commands(state, seat, &mut commands),
            Phase::Draw | Phase::End => {}
        }
        commands.push(Command::AdvancePhase { actor: seat });
        commands
    }
}
