//! Full battle flow through the orchestrator.

use super::*;

fn setup() -> (Battle, CharacterId, CharacterId) {
    let mut battle = new_battle(42);
    let hero = battle
        .add_character(Faction::Friendly, "Hero")
        .expect("template exists")
        .expect("free slot");
    let ghoul = battle
        .add_character(Faction::Enemy, "Ghoul")
        .expect("template exists")
        .expect("free slot");
    battle.start().expect("fresh battle starts");
    (battle, hero, ghoul)
}

fn turn_starts(events: &[BattleEvent]) -> Vec<CharacterId> {
    events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::TurnStarted { character } => Some(*character),
            _ => None,
        })
        .collect()
}

#[test]
fn faster_characters_act_first_and_rotation_alternates() {
    let (mut battle, hero, ghoul) = setup();
    let mut now = 0;

    pump_until_input(&mut battle, &mut now);
    assert_eq!(battle.awaiting_input(), Some(hero));

    battle
        .submit_attack_choice(hero, "Strike", &[ghoul])
        .expect("valid cast");
    pump_until_input(&mut battle, &mut now);

    assert_eq!(turn_starts(&battle.drain_events()), vec![hero, ghoul, hero]);
}

#[test]
fn mana_is_spent_at_cast_but_damage_lands_after_the_delay() {
    let (mut battle, hero, ghoul) = setup();
    let mut now = 0;
    pump_until_input(&mut battle, &mut now);

    battle
        .submit_attack_choice(hero, "Strike", &[ghoul])
        .expect("valid cast");
    // Cost is gone immediately, the hit has not landed yet.
    assert_eq!(battle.character(hero).expect("alive").mana(), 90);
    assert_eq!(battle.character(ghoul).expect("alive").health(), 100);

    battle.drive(now);
    assert_eq!(battle.character(ghoul).expect("alive").health(), 70);
}

#[test]
fn input_is_rejected_out_of_turn_or_without_mana() {
    let (mut battle, hero, ghoul) = setup();
    let mut now = 0;

    // Nobody is awaited yet.
    assert_eq!(
        battle.submit_attack_choice(hero, "Strike", &[ghoul]),
        Err(BattleError::NotYourTurn)
    );

    pump_until_input(&mut battle, &mut now);
    assert_eq!(
        battle.submit_attack_choice(ghoul, "Claw", &[hero]),
        Err(BattleError::NotYourTurn)
    );
    assert_eq!(
        battle.submit_attack_choice(hero, "Cataclysm", &[]),
        Err(BattleError::NotEnoughMana {
            have: 100,
            need: 150
        })
    );
    // A failed submission keeps the input window open.
    assert_eq!(battle.awaiting_input(), Some(hero));
}

#[test]
fn poison_ticks_at_the_start_of_the_owners_turn() {
    let (mut battle, hero, ghoul) = setup();
    let mut now = 0;
    pump_until_input(&mut battle, &mut now);

    battle
        .submit_attack_choice(hero, "Venom", &[ghoul])
        .expect("valid cast");
    pump_until_input(&mut battle, &mut now);

    // 5 impact damage plus one 5 point poison tick on the ghoul's turn.
    assert_eq!(battle.character(ghoul).expect("alive").health(), 90);
    let poison = battle
        .character(ghoul)
        .expect("alive")
        .infliction(InflictionKind::Poison)
        .expect("still poisoned");
    assert_eq!(poison.duration(), 2);
    // The ghoul still got to claw back.
    assert_eq!(battle.character(hero).expect("alive").health(), 92);
}

#[test]
fn frozen_characters_lose_their_turn() {
    let (mut battle, hero, ghoul) = setup();
    let mut now = 0;
    pump_until_input(&mut battle, &mut now);

    battle
        .submit_attack_choice(hero, "Chill", &[ghoul])
        .expect("valid cast");
    battle.drive(now);

    // Freeze takes hold at resolution, before the ghoul's turn comes up.
    assert!(!battle.character(ghoul).expect("alive").can_act);

    pump_until_input(&mut battle, &mut now);
    // The ghoul's turn passed without a claw landing.
    assert_eq!(battle.character(hero).expect("alive").health(), 100);
    assert!(battle.drain_events().iter().any(|event| matches!(
        event,
        BattleEvent::InflictionApplied {
            kind: InflictionKind::Freeze,
            ..
        }
    )));
}

#[test]
fn summons_join_the_rotation_on_the_casters_side() {
    let (mut battle, hero, _ghoul) = setup();
    let mut now = 0;
    pump_until_input(&mut battle, &mut now);

    battle
        .submit_attack_choice(hero, "Raise ally", &[])
        .expect("valid cast");
    battle.drive(now);

    assert_eq!(battle.roster().len(), 3);
    let events = battle.drain_events();
    let summoned = events.iter().find_map(|event| match event {
        BattleEvent::CharacterSummoned {
            character, faction, ..
        } => Some((*character, *faction)),
        _ => None,
    });
    let (skeleton, faction) = summoned.expect("summon event emitted");
    assert_eq!(faction, Faction::Friendly);
    assert_eq!(battle.character(skeleton).expect("alive").name, "Skeleton");
}

#[test]
fn summoning_onto_a_full_bench_spends_the_mana_and_nothing_else() {
    let mut battle = Battle::new(
        test_catalog(),
        templates(),
        vec![
            SpawnPoint::new(Faction::Friendly),
            SpawnPoint::new(Faction::Enemy),
        ],
        9,
    );
    let hero = battle
        .add_character(Faction::Friendly, "Hero")
        .expect("template exists")
        .expect("free slot");
    battle
        .add_character(Faction::Enemy, "Ghoul")
        .expect("template exists")
        .expect("free slot");
    battle.start().expect("fresh battle starts");

    let mut now = 0;
    pump_until_input(&mut battle, &mut now);
    battle
        .submit_attack_choice(hero, "Raise ally", &[])
        .expect("a full bench is not the caster's problem");
    battle.drive(now);

    assert_eq!(battle.character(hero).expect("alive").mana(), 80);
    assert_eq!(battle.roster().len(), 2);
    assert!(!battle
        .drain_events()
        .iter()
        .any(|event| matches!(event, BattleEvent::CharacterSummoned { .. })));
    assert_eq!(battle.phase(), BattlePhase::Active);
}

#[test]
fn items_restore_pools_and_end_the_turn() {
    let (mut battle, hero, ghoul) = setup();
    battle.set_inventory(Inventory::from_items(vec![Item::health_potion(1)]));
    let mut now = 0;

    // Take a claw to the face first so the potion has something to do.
    pump_until_input(&mut battle, &mut now);
    battle
        .submit_attack_choice(hero, "Strike", &[ghoul])
        .expect("valid cast");
    pump_until_input(&mut battle, &mut now);
    assert_eq!(battle.character(hero).expect("alive").health(), 92);

    battle
        .submit_item_choice(hero, "Health potion")
        .expect("potion in inventory");
    assert!(battle.inventory().items().is_empty());
    battle.drive(now);
    assert_eq!(battle.character(hero).expect("alive").health(), 100);

    assert_eq!(
        battle.submit_item_choice(hero, "Health potion"),
        Err(BattleError::NotYourTurn)
    );
    // The turn moved on to the ghoul.
    pump_until_input(&mut battle, &mut now);
    assert!(battle
        .drain_events()
        .iter()
        .any(|event| matches!(event, BattleEvent::ItemUsed { .. })));
}

#[test]
fn missing_items_are_an_error_and_keep_the_turn() {
    let (mut battle, hero, _ghoul) = setup();
    let mut now = 0;
    pump_until_input(&mut battle, &mut now);

    assert_eq!(
        battle.submit_item_choice(hero, "Philter of gloom"),
        Err(BattleError::ItemNotFound {
            name: String::from("Philter of gloom")
        })
    );
    assert_eq!(battle.awaiting_input(), Some(hero));
}

#[test]
fn wiping_a_faction_ends_the_battle_exactly_once() {
    let (mut battle, hero, ghoul) = setup();
    let mut now = 0;

    for _ in 0..16 {
        pump_until_input(&mut battle, &mut now);
        if battle.phase() == BattlePhase::Ended {
            break;
        }
        battle
            .submit_attack_choice(hero, "Strike", &[ghoul])
            .expect("valid cast");
    }

    assert_eq!(battle.phase(), BattlePhase::Ended);
    assert_eq!(battle.outcome(), Some(BattleOutcome::Victory));
    assert_eq!(battle.pending_actions(), 0);
    assert_eq!(battle.current_turn(), None);
    assert!(battle.spawn_points().iter().all(|sp| !sp.taken));

    let events = battle.drain_events();
    let endings = events
        .iter()
        .filter(|event| matches!(event, BattleEvent::BattleEnded { .. }))
        .count();
    assert_eq!(endings, 1);

    // Driving a finished battle does nothing.
    pump(&mut battle, &mut now, 10);
    assert!(battle.drain_events().is_empty());
    assert_eq!(
        battle.submit_attack_choice(hero, "Strike", &[ghoul]),
        Err(BattleError::WrongPhase)
    );
}

#[test]
fn starting_twice_is_an_error() {
    let (mut battle, _hero, _ghoul) = setup();
    assert_eq!(battle.start(), Err(BattleError::WrongPhase));
}
