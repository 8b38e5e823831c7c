//! Built-in game data for Caster.
//!
//! The attack catalog and character templates live in `attacks.json` and
//! `characters.json` next to this crate's manifest. The build script
//! turns them into plain constructors so nothing is parsed at runtime.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use caster_battle::CharacterTemplate;

mod generated {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use caster_battle::{
        AttackDef, AttackKind, CharacterStats, CharacterTemplate, InflictionKind, InflictionSpec,
        TargetSelector,
    };

    include!(concat!(env!("OUT_DIR"), "/assets_generated.rs"));
}

pub use generated::{character_templates, default_attacks};

/// Template name of the input-controlled player character.
pub const PLAYER_TEMPLATE: &str = "Caster";

/// Template name of the stock enemy.
pub const ENEMY_TEMPLATE: &str = "Ghoul";

/// The player's own template.
pub fn player_template() -> CharacterTemplate {
    character_templates()
        .into_iter()
        .find(|template| template.name == PLAYER_TEMPLATE)
        .expect("player template is part of the generated data")
}

#[cfg(test)]
mod tests {
    use super::*;
    use caster_battle::Catalog;

    #[test]
    fn catalog_builds_from_the_generated_attacks() {
        let catalog = Catalog::new(default_attacks()).expect("attack names are unique");
        assert!(!catalog.is_empty());
        assert!(catalog.attack("Fireball").is_ok());
    }

    #[test]
    fn every_template_attack_resolves_in_the_catalog() {
        let catalog = Catalog::new(default_attacks()).expect("attack names are unique");
        for template in character_templates() {
            for name in &template.attacks {
                catalog
                    .attack(name)
                    .unwrap_or_else(|_| panic!("{} references unknown attack {}", template.name, name));
            }
        }
    }

    #[test]
    fn player_and_enemy_templates_exist() {
        assert_eq!(player_template().name, PLAYER_TEMPLATE);
        assert!(!player_template().ai_controlled);
        let templates = character_templates();
        assert!(templates.iter().any(|t| t.name == ENEMY_TEMPLATE));
    }
}
