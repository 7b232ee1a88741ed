//! Combat resolver.
//!
//! An attack compares the attacker's current attack (X) against the
//! target's current attack (Y):
//!
//! | Outcome | Destroyed | Hit points lost |
//! |---|---|---|
//! | X > Y | target | defender loses X − Y |
//! | X < Y | attacker | attacking player loses Y − X |
//! | X = Y | both | none |
//!
//! A direct attack (legal only against an empty monster row) costs the
//! defender X. Destroyed monsters go to their owner's graveyard.

use smallvec::SmallVec;
use tracing::info;

use crate::core::command::AttackTarget;
use crate::core::ids::InstanceId;
use crate::core::seat::Seat;
use crate::core::state::{CombatEvent, MatchState, Phase};
use crate::error::Rejection;

/// Outcome of one monster fighting another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clash {
    /// Target destroyed; defender loses `damage`.
    AttackerWins { damage: i32 },
    /// Attacker destroyed; attacking player loses `damage`.
    DefenderWins { damage: i32 },
    /// Both destroyed.
    Trade,
}

/// Compare attack values.
///
/// ```
/// use duel_engine::rules::combat::{clash, Clash};
///
/// assert_eq!(clash(2000, 1200), Clash::AttackerWins { damage: 800 });
/// assert_eq!(clash(1000, 1500), Clash::DefenderWins { damage: 500 });
/// assert_eq!(clash(900, 900), Clash::Trade);
/// ```
#[must_use]
pub fn clash(attack: i32, target_attack: i32) -> Clash {
    match attack.cmp(&target_attack) {
        std::cmp::Ordering::Greater => Clash::AttackerWins {
            damage: attack - target_attack,
        },
        std::cmp::Ordering::Less => Clash::DefenderWins {
            damage: target_attack - attack,
        },
        std::cmp::Ordering::Equal => Clash::Trade,
    }
}

/// Resolve `Attack { attacker, target }` for the active seat.
pub(crate) fn resolve_attack(
    state: &mut MatchState,
    attacker: InstanceId,
    target: AttackTarget,
) -> Result<CombatEvent, Rejection> {
    if state.phase != Phase::Battle {
        return Err(Rejection::WrongPhase {
            required: Phase::Battle,
            actual: state.phase,
        });
    }

    let attacking = state.active;
    let defending = attacking.opponent();

    let attacker_slot = state
        .player(attacking)
        .field
        .monster_slot(attacker)
        .ok_or(Rejection::AttackerNotFound(attacker))?;
    let (can_attack, attack) = match &state.player(attacking).field.monsters[attacker_slot] {
        Some(monster) => (monster.can_attack, monster.attack_power()),
        None => return Err(Rejection::AttackerNotFound(attacker)),
    };
    if !can_attack {
        return Err(Rejection::CannotAttack(attacker));
    }
    if attack <= 0 {
        return Err(Rejection::NoAttackPower(attacker));
    }

    let mut destroyed = SmallVec::new();
    let (damaged, damage) = match target {
        AttackTarget::Direct => {
            if state.player(defending).field.has_monsters() {
                return Err(Rejection::DirectAttackBlocked);
            }
            (Some(defending), attack)
        }
        AttackTarget::Monster(target_id) => {
            let defender_field = &state.player(defending).field;
            let target_slot = defender_field
                .monster_slot(target_id)
                .ok_or(Rejection::IllegalTarget(target_id))?;
            let target_attack = defender_field.monsters[target_slot]
                .as_ref()
                .map_or(0, |m| m.attack_power());

            match clash(attack, target_attack) {
                Clash::AttackerWins { damage } => {
                    destroy(state, defending, target_slot, &mut destroyed);
                    (Some(defending), damage)
                }
                Clash::DefenderWins { damage } => {
                    destroy(state, attacking, attacker_slot, &mut destroyed);
                    (Some(attacking), damage)
                }
                Clash::Trade => {
                    destroy(state, defending, target_slot, &mut destroyed);
                    destroy(state, attacking, attacker_slot, &mut destroyed);
                    (None, 0)
                }
            }
        }
    };

    if let Some(seat) = damaged {
        state.player_mut(seat).hp -= damage;
    }
    if let Some(survivor) = state.player_mut(attacking).field.monsters[attacker_slot].as_mut() {
        survivor.can_attack = false;
    }
    state.selection = None;

    state.winner = decide_winner(state, attacking);
    if let Some(winner) = state.winner {
        info!(winner = %winner, turn = state.turn, "match decided");
    }

    Ok(CombatEvent {
        attacker,
        target,
        damage,
        damaged,
        destroyed,
    })
}

/// Winner after damage from an attack by `attacking`.
///
/// The attacking player's own hit points are checked first, so if both
/// sides are at or below zero the defending seat wins.
fn decide_winner(state: &MatchState, attacking: Seat) -> Option<Seat> {
    let defending = attacking.opponent();
    if state.player(attacking).is_defeated() {
        Some(defending)
    } else if state.player(defending).is_defeated() {
        Some(attacking)
    } else {
        None
    }
}

fn destroy(state: &mut MatchState, owner: Seat, slot: usize, destroyed: &mut SmallVec<[InstanceId; 2]>) {
    let player = state.player_mut(owner);
    if let Some(monster) = player.field.take_monster(slot) {
        destroyed.push(monster.instance_id);
        player.graveyard.push_back(monster);
    }
}
