//! The attack catalog.
//!
//! Loaded once at startup from asset data, sorted by name, then queried
//! with exact-match lookups for the rest of the session. The catalog is
//! immutable after construction.

use alloc::string::ToString;
use alloc::vec::Vec;

use crate::error::{BattleError, BattleResult};
use crate::types::AttackDef;

/// Sorted collection of every attack definition in the game.
#[derive(Debug, Clone)]
pub struct Catalog {
    attacks: Vec<AttackDef>,
}

impl Catalog {
    /// Builds a catalog from raw definitions, sorting them by name.
    /// Duplicate names in the source data are fatal.
    pub fn new(mut attacks: Vec<AttackDef>) -> BattleResult<Self> {
        attacks.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(pair) = attacks.windows(2).find(|pair| pair[0].name == pair[1].name) {
            return Err(BattleError::DuplicateAttack {
                name: pair[0].name.clone(),
            });
        }
        Ok(Self { attacks })
    }

    /// Exact-match lookup by name.
    pub fn attack(&self, name: &str) -> BattleResult<&AttackDef> {
        self.attacks
            .binary_search_by(|def| def.name.as_str().cmp(name))
            .map(|at| &self.attacks[at])
            .map_err(|_| BattleError::AttackNotFound {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttackDef> {
        self.attacks.iter()
    }
}
