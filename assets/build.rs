//! Turns `attacks.json` and `characters.json` into Rust constructors so the
//! game data ships inside the binary with no runtime parsing.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct AttackData {
    name: String,
    text: String,
    mana_cost: i32,
    power: i32,
    selector: String,
    kind: String,
    summon_template: Option<String>,
    infliction: Option<InflictionData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct InflictionData {
    kind: String,
    magnitude: i32,
    duration: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CharacterData {
    name: String,
    stats: StatsData,
    attacks: Vec<String>,
    ai_controlled: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct StatsData {
    max_health: i32,
    max_mana: i32,
    strength: i32,
    intellect: i32,
    speed: i32,
}

const SELECTORS: &[&str] = &[
    "SingleFriendly",
    "AllFriendly",
    "SingleEnemy",
    "AllEnemy",
    "Everyone",
    "None",
];

const INFLICTION_KINDS: &[&str] = &["Freeze", "Poison", "ManaRestore", "HealthRestore"];

fn main() {
    println!("cargo:rerun-if-changed=attacks.json");
    println!("cargo:rerun-if-changed=characters.json");

    let attacks: Vec<AttackData> = serde_json::from_str(
        &fs::read_to_string("attacks.json").expect("attacks.json is readable"),
    )
    .expect("attacks.json parses");
    let characters: Vec<CharacterData> = serde_json::from_str(
        &fs::read_to_string("characters.json").expect("characters.json is readable"),
    )
    .expect("characters.json parses");

    let mut out = String::new();
    gen_attacks(&mut out, &attacks);
    gen_characters(&mut out, &characters, &attacks);

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    fs::write(Path::new(&out_dir).join("assets_generated.rs"), out)
        .expect("generated data is writable");
}

fn gen_attacks(out: &mut String, attacks: &[AttackData]) {
    writeln!(out, "/// Every attack definition shipped with the game.").unwrap();
    writeln!(out, "pub fn default_attacks() -> Vec<AttackDef> {{").unwrap();
    writeln!(out, "    vec![").unwrap();
    for attack in attacks {
        assert!(
            SELECTORS.contains(&attack.selector.as_str()),
            "unknown selector '{}' on '{}'",
            attack.selector,
            attack.name
        );
        let kind = match attack.kind.as_str() {
            "Damage" => "AttackKind::Damage".to_string(),
            "Heal" => "AttackKind::Heal".to_string(),
            "Utility" => "AttackKind::Utility".to_string(),
            "Summon" => {
                let template = attack
                    .summon_template
                    .as_ref()
                    .unwrap_or_else(|| panic!("'{}' is a summon without a template", attack.name));
                format!(
                    "AttackKind::Summon {{ template: String::from({:?}) }}",
                    template
                )
            }
            other => panic!("unknown attack kind '{}' on '{}'", other, attack.name),
        };
        let infliction = match &attack.infliction {
            Some(spec) => {
                assert!(
                    INFLICTION_KINDS.contains(&spec.kind.as_str()),
                    "unknown infliction kind '{}' on '{}'",
                    spec.kind,
                    attack.name
                );
                format!(
                    "Some(InflictionSpec {{ kind: InflictionKind::{}, magnitude: {}, duration: {} }})",
                    spec.kind, spec.magnitude, spec.duration
                )
            }
            None => "None".to_string(),
        };
        writeln!(out, "        AttackDef {{").unwrap();
        writeln!(out, "            name: String::from({:?}),", attack.name).unwrap();
        writeln!(out, "            text: String::from({:?}),", attack.text).unwrap();
        writeln!(out, "            mana_cost: {},", attack.mana_cost).unwrap();
        writeln!(out, "            power: {},", attack.power).unwrap();
        writeln!(out, "            selector: TargetSelector::{},", attack.selector).unwrap();
        writeln!(out, "            kind: {},", kind).unwrap();
        writeln!(out, "            infliction: {},", infliction).unwrap();
        writeln!(out, "        }},").unwrap();
    }
    writeln!(out, "    ]").unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
}

fn gen_characters(out: &mut String, characters: &[CharacterData], attacks: &[AttackData]) {
    assert!(
        characters.iter().any(|c| c.name == "Caster"),
        "the player template 'Caster' must exist"
    );
    writeln!(out, "/// Every character template shipped with the game.").unwrap();
    writeln!(out, "pub fn character_templates() -> Vec<CharacterTemplate> {{").unwrap();
    writeln!(out, "    vec![").unwrap();
    for character in characters {
        for name in &character.attacks {
            assert!(
                attacks.iter().any(|attack| &attack.name == name),
                "'{}' references unknown attack '{}'",
                character.name,
                name
            );
        }
        let attack_list = character
            .attacks
            .iter()
            .map(|name| format!("String::from({:?})", name))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "        CharacterTemplate {{").unwrap();
        writeln!(out, "            name: String::from({:?}),", character.name).unwrap();
        writeln!(out, "            stats: CharacterStats {{").unwrap();
        writeln!(out, "                max_health: {},", character.stats.max_health).unwrap();
        writeln!(out, "                max_mana: {},", character.stats.max_mana).unwrap();
        writeln!(out, "                strength: {},", character.stats.strength).unwrap();
        writeln!(out, "                intellect: {},", character.stats.intellect).unwrap();
        writeln!(out, "                speed: {},", character.stats.speed).unwrap();
        writeln!(out, "            }},").unwrap();
        writeln!(out, "            attacks: vec![{}],", attack_list).unwrap();
        writeln!(out, "            ai_controlled: {},", character.ai_controlled).unwrap();
        writeln!(out, "        }},").unwrap();
    }
    writeln!(out, "    ]").unwrap();
    writeln!(out, "}}").unwrap();
}
