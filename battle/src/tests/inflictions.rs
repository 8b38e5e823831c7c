//! Infliction stacking, merging and expiry.

use super::*;

fn victim() -> Character {
    Character::from_template(
        CharacterId(1),
        Faction::Enemy,
        &templates()[1],
        &test_catalog(),
    )
    .expect("ghoul template is valid")
}

#[test]
fn duplicate_application_merges_instead_of_stacking_instances() {
    let mut victim = victim();
    victim.apply_infliction(spec(InflictionKind::Poison, 5, 3));
    victim.apply_infliction(spec(InflictionKind::Poison, 8, 2));

    assert_eq!(victim.inflictions().len(), 1);
    let poison = victim.infliction(InflictionKind::Poison).expect("poisoned");
    // Longest duration, one extra stack, largest per-stack magnitude.
    assert_eq!(poison.duration(), 3);
    assert_eq!(poison.stacks(), 2);
    assert_eq!(poison.magnitude(), 16);
}

#[test]
fn stacks_cap_at_five() {
    let mut victim = victim();
    for _ in 0..8 {
        victim.apply_infliction(spec(InflictionKind::Poison, 4, 2));
    }
    let poison = victim.infliction(InflictionKind::Poison).expect("poisoned");
    assert_eq!(poison.stacks(), MAX_STACKS);
    assert_eq!(poison.magnitude(), 20);
}

#[test]
fn freeze_takes_hold_synchronously() {
    let mut victim = victim();
    victim.can_act = true;
    victim.apply_infliction(spec(InflictionKind::Freeze, 0, 2));
    assert!(!victim.can_act);
}

#[test]
fn different_kinds_coexist() {
    let mut victim = victim();
    victim.apply_infliction(spec(InflictionKind::Poison, 5, 3));
    victim.apply_infliction(spec(InflictionKind::HealthRestore, 10, 2));
    assert_eq!(victim.inflictions().len(), 2);
}

#[test]
fn expiry_fires_exactly_once_and_removes_the_infliction() {
    let mut victim = victim();
    victim.apply_infliction(spec(InflictionKind::Poison, 5, 2));

    assert!(!victim.tick_infliction(InflictionKind::Poison));
    assert!(victim.tick_infliction(InflictionKind::Poison));
    // Gone now, so a further tick reports nothing.
    assert!(!victim.tick_infliction(InflictionKind::Poison));
    assert!(victim.infliction(InflictionKind::Poison).is_none());
}
