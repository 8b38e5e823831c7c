//! Error types for the battle crate.

use alloc::string::String;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Everything that can go wrong while assembling or running a battle.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BattleError {
    /// No attack with this name exists in the catalog.
    AttackNotFound { name: String },
    /// The catalog source data contains the same attack name twice.
    DuplicateAttack { name: String },
    /// No character template with this name is known to the battle.
    TemplateNotFound { name: String },
    /// The referenced character is not part of the battle.
    UnknownCharacter,
    /// Input submitted by a character whose input is not being awaited.
    NotYourTurn,
    /// The attack costs more mana than the caster has.
    NotEnoughMana { have: i32, need: i32 },
    /// The named item is not in the inventory.
    ItemNotFound { name: String },
    /// No free spawn point for the faction.
    NoSpawnPoint,
    /// The operation is not valid in the battle's current phase.
    WrongPhase,
}

#[cfg(feature = "std")]
impl core::fmt::Display for BattleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BattleError::AttackNotFound { name } => write!(f, "attack '{name}' not found"),
            BattleError::DuplicateAttack { name } => write!(f, "duplicate attack '{name}'"),
            BattleError::TemplateNotFound { name } => write!(f, "template '{name}' not found"),
            BattleError::UnknownCharacter => write!(f, "character is not in the battle"),
            BattleError::NotYourTurn => write!(f, "input is not awaited for this character"),
            BattleError::NotEnoughMana { have, need } => {
                write!(f, "not enough mana: have {have}, need {need}")
            }
            BattleError::ItemNotFound { name } => write!(f, "item '{name}' not in inventory"),
            BattleError::NoSpawnPoint => write!(f, "no free spawn point"),
            BattleError::WrongPhase => write!(f, "operation not valid in this phase"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BattleError {}

pub type BattleResult<T> = Result<T, BattleError>;
