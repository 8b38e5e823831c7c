//! Shared fixtures for battle tests.

mod battles;
mod inflictions;

use crate::*;

pub fn spec(kind: InflictionKind, magnitude: i32, duration: u32) -> InflictionSpec {
    InflictionSpec {
        kind,
        magnitude,
        duration,
    }
}

pub fn strike() -> AttackDef {
    AttackDef::new(
        "Strike",
        "Deal {dmg} damage.",
        10,
        30,
        TargetSelector::SingleEnemy,
        AttackKind::Damage,
    )
}

pub fn mend() -> AttackDef {
    AttackDef::new(
        "Mend",
        "Restore {dmg} health.",
        20,
        30,
        TargetSelector::SingleFriendly,
        AttackKind::Heal,
    )
}

pub fn venom() -> AttackDef {
    AttackDef::new(
        "Venom",
        "Deal {dmg} damage and poison the target.",
        5,
        5,
        TargetSelector::SingleEnemy,
        AttackKind::Damage,
    )
    .with_infliction(spec(InflictionKind::Poison, 5, 3))
}

pub fn chill() -> AttackDef {
    AttackDef::new(
        "Chill",
        "Deal {dmg} damage and freeze the target.",
        15,
        10,
        TargetSelector::SingleEnemy,
        AttackKind::Damage,
    )
    .with_infliction(spec(InflictionKind::Freeze, 0, 2))
}

pub fn claw() -> AttackDef {
    AttackDef::new(
        "Claw",
        "Rake the target for {dmg} damage.",
        0,
        8,
        TargetSelector::SingleEnemy,
        AttackKind::Damage,
    )
}

pub fn raise_ally() -> AttackDef {
    AttackDef::new(
        "Raise ally",
        "Raise a skeleton to fight for you.",
        20,
        0,
        TargetSelector::None,
        AttackKind::Summon {
            template: String::from("Skeleton"),
        },
    )
}

pub fn cataclysm() -> AttackDef {
    AttackDef::new(
        "Cataclysm",
        "Deal {dmg} damage to everyone.",
        150,
        60,
        TargetSelector::Everyone,
        AttackKind::Damage,
    )
}

pub fn test_attacks() -> Vec<AttackDef> {
    vec![
        strike(),
        mend(),
        venom(),
        chill(),
        claw(),
        raise_ally(),
        cataclysm(),
    ]
}

pub fn test_catalog() -> Catalog {
    Catalog::new(test_attacks()).expect("test attacks are unique")
}

pub fn stats(speed: i32) -> CharacterStats {
    CharacterStats {
        max_health: 100,
        max_mana: 100,
        strength: 10,
        intellect: 10,
        speed,
    }
}

pub fn template(name: &str, speed: i32, attacks: &[&str], ai_controlled: bool) -> CharacterTemplate {
    CharacterTemplate {
        name: String::from(name),
        stats: stats(speed),
        attacks: attacks.iter().map(|name| String::from(*name)).collect(),
        ai_controlled,
    }
}

pub fn templates() -> Vec<CharacterTemplate> {
    vec![
        template(
            "Hero",
            50,
            &["Strike", "Mend", "Venom", "Chill", "Raise ally", "Cataclysm"],
            false,
        ),
        template("Ghoul", 30, &["Claw"], true),
        template("Skeleton", 20, &["Claw"], true),
    ]
}

pub fn spawn_points(per_faction: usize) -> Vec<SpawnPoint> {
    let mut points = Vec::new();
    for _ in 0..per_faction {
        points.push(SpawnPoint::new(Faction::Friendly));
        points.push(SpawnPoint::new(Faction::Enemy));
    }
    points
}

pub fn new_battle(seed: u64) -> Battle {
    Battle::new(test_catalog(), templates(), spawn_points(4), seed)
}

/// Drives the battle forward until input is awaited or it ends.
pub fn pump_until_input(battle: &mut Battle, now: &mut Tick) {
    for _ in 0..10_000 {
        if battle.awaiting_input().is_some() || battle.phase() == BattlePhase::Ended {
            return;
        }
        battle.drive(*now);
        *now += 1;
    }
    panic!("battle stalled");
}

/// Drives the battle forward a fixed number of ticks.
pub fn pump(battle: &mut Battle, now: &mut Tick, ticks: Tick) {
    for _ in 0..ticks {
        battle.drive(*now);
        *now += 1;
    }
}
