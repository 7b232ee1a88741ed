//! Combat through `RulesEngine::apply`.

use std::sync::Arc;

use duel_engine::cards::{CardCatalog, CardDefinition, CardId, Element};
use duel_engine::core::{AttackTarget, Command, InstanceId, MatchConfig, MatchState, Phase, Seat};
use duel_engine::error::Rejection;
use duel_engine::rules::{DuelRules, RulesEngine};
use proptest::prelude::*;

fn rules() -> DuelRules {
    let catalog = CardCatalog::from_definitions([
        CardDefinition::monster("whelp", "Cinder Whelp", Element::Fire, 1, 800, 400),
        CardDefinition::monster("sentinel", "Dawn Sentinel", Element::Light, 3, 1200, 1600),
        CardDefinition::monster("walker", "Void Walker", Element::Dark, 4, 2000, 1500),
    ])
    .unwrap();
    DuelRules::new(Arc::new(catalog), MatchConfig::default())
}

fn battle(rules: &DuelRules) -> MatchState {
    let mut state = MatchState::new(["North", "South"], rules.config());
    state.phase = Phase::Battle;
    state
}

fn place(rules: &DuelRules, state: &mut MatchState, seat: Seat, slot: usize, card: &str) -> InstanceId {
    let id = state.ids.alloc();
    let instance = rules.catalog().instantiate(&CardId::new(card), id).unwrap();
    state.player_mut(seat).field.monsters[slot] = Some(instance);
    id
}

fn attack(attacker: InstanceId, target: AttackTarget) -> Command {
    Command::Attack { attacker, target }
}

/// Test the 2000-vs-1200 example through to a decided match.
#[test]
fn test_documented_example() {
    let rules = rules();
    let mut state = battle(&rules);
    let a = place(&rules, &mut state, Seat::First, 0, "walker");
    let b = place(&rules, &mut state, Seat::First, 1, "walker");
    let x = place(&rules, &mut state, Seat::Second, 0, "sentinel");
    let y = place(&rules, &mut state, Seat::Second, 3, "sentinel");
    state.player_mut(Seat::Second).hp = 1000;

    let first = rules.apply(&state, &attack(a, AttackTarget::Monster(x))).unwrap();
    assert_eq!(first.state.player(Seat::Second).hp, 200);
    assert_eq!(first.state.winner, None);
    let event = first.event.unwrap();
    assert_eq!(event.damage, 800);
    assert_eq!(first.state.last_event.as_ref(), Some(&event));

    let second = rules.apply(&first.state, &attack(b, AttackTarget::Monster(y))).unwrap();
    assert_eq!(second.state.player(Seat::Second).hp, -600);
    assert_eq!(second.state.winner, Some(Seat::First));

    let err = rules
        .apply(&second.state, &Command::AdvancePhase { actor: Seat::First })
        .unwrap_err();
    assert_eq!(err, Rejection::MatchOver);
}

/// Test that a monster cannot attack twice in one turn.
#[test]
fn test_one_attack_per_monster_per_turn() {
    let rules = rules();
    let mut state = battle(&rules);
    let a = place(&rules, &mut state, Seat::First, 0, "walker");
    place(&rules, &mut state, Seat::Second, 0, "whelp");
    let x = place(&rules, &mut state, Seat::Second, 1, "whelp");

    let after = rules.apply(&state, &attack(a, AttackTarget::Monster(x))).unwrap().state;
    let survivor = after.player(Seat::First).field.monsters[0].as_ref().unwrap();
    assert!(!survivor.can_attack);

    let err = rules.apply(&after, &attack(a, AttackTarget::Direct)).unwrap_err();
    assert_eq!(err, Rejection::CannotAttack(a));
    assert!(rules.legal_commands(&after, Seat::First).iter().all(|c| !matches!(c, Command::Attack { .. })));
}

/// Test that a direct attack is refused while the defender has monsters.
#[test]
fn test_direct_attack_needs_empty_row() {
    let rules = rules();
    let mut state = battle(&rules);
    let a = place(&rules, &mut state, Seat::First, 0, "whelp");
    let x = place(&rules, &mut state, Seat::Second, 4, "walker");

    let err = rules.apply(&state, &attack(a, AttackTarget::Direct)).unwrap_err();
    assert_eq!(err, Rejection::DirectAttackBlocked);

    state.player_mut(Seat::Second).field.monsters[4] = None;
    let applied = rules.apply(&state, &attack(a, AttackTarget::Direct)).unwrap();
    assert_eq!(applied.state.player(Seat::Second).hp, 3200);
    assert_eq!(applied.event.unwrap().target, AttackTarget::Direct);
    assert_ne!(x, a);
}

/// Test that attacking outside the battle phase leaves the state untouched.
#[test]
fn test_attack_outside_battle_rejected_unchanged() {
    let rules = rules();
    let mut state = battle(&rules);
    let a = place(&rules, &mut state, Seat::First, 0, "whelp");
    state.phase = Phase::Main;

    let err = rules.apply(&state, &attack(a, AttackTarget::Direct)).unwrap_err();

    assert!(matches!(err, Rejection::WrongPhase { required: Phase::Battle, .. }));
    assert_eq!(state.player(Seat::Second).hp, 4000);
}

/// Test that legal commands list every ready attacker against every target.
#[test]
fn test_legal_attacks_enumerated() {
    let rules = rules();
    let mut state = battle(&rules);
    let a = place(&rules, &mut state, Seat::First, 0, "walker");
    let x = place(&rules, &mut state, Seat::Second, 0, "whelp");
    let y = place(&rules, &mut state, Seat::Second, 1, "sentinel");

    let legal = rules.legal_commands(&state, Seat::First);

    assert_eq!(
        legal,
        vec![
            attack(a, AttackTarget::Monster(x)),
            attack(a, AttackTarget::Monster(y)),
            Command::AdvancePhase { actor: Seat::First },
        ]
    );
    assert!(rules.legal_commands(&state, Seat::Second).is_empty());
}

proptest! {
    /// Property: the clash table decides who is destroyed and who takes damage.
    #[test]
    fn proptest_clash_outcomes(x in 1i32..5000, y in 0i32..5000) {
        let catalog = CardCatalog::from_definitions([
            CardDefinition::monster("a", "A", Element::Fire, 1, x, 0),
            CardDefinition::monster("b", "B", Element::Dark, 1, y, 0),
        ])
        .unwrap();
        let rules = DuelRules::new(Arc::new(catalog), MatchConfig::default().starting_hp(100_000));
        let mut state = battle(&rules);
        let a = place(&rules, &mut state, Seat::First, 0, "a");
        let b = place(&rules, &mut state, Seat::Second, 0, "b");

        let applied = rules.apply(&state, &attack(a, AttackTarget::Monster(b))).unwrap();
        let after = &applied.state;
        let attacker_alive = after.player(Seat::First).field.monster_slot(a).is_some();
        let target_alive = after.player(Seat::Second).field.monster_slot(b).is_some();
        let lost_first = 100_000 - after.player(Seat::First).hp;
        let lost_second = 100_000 - after.player(Seat::Second).hp;

        if x > y {
            prop_assert!(attacker_alive && !target_alive);
            prop_assert_eq!((lost_first, lost_second), (0, x - y));
        } else if x < y {
            prop_assert!(!attacker_alive && target_alive);
            prop_assert_eq!((lost_first, lost_second), (y - x, 0));
        } else {
            prop_assert!(!attacker_alive && !target_alive);
            prop_assert_eq!((lost_first, lost_second), (0, 0));
        }
        prop_assert_eq!(applied.event.map(|e| e.damage), Some(lost_first + lost_second));
    }
}
