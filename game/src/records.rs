//! Versioned save records.
//!
//! Every record starts with an explicit version byte. A record written by
//! a build this one does not understand is rejected on decode instead of
//! being silently reinterpreted.

use caster_battle::{CharacterStats, Item};
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

use crate::store::{StoreError, StoreResult};

/// Version written into every new record.
pub const RECORD_VERSION: u8 = 1;

fn decode_versioned<T: Decode>(bytes: &[u8]) -> StoreResult<T> {
    match bytes.first() {
        Some(&RECORD_VERSION) => {
            T::decode(&mut &bytes[..]).map_err(|_| StoreError::Corrupt)
        }
        Some(&found) => Err(StoreError::UnsupportedVersion { found }),
        None => Err(StoreError::Corrupt),
    }
}

/// The player's permanent stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub struct StatsRecord {
    pub version: u8,
    pub stats: CharacterStats,
}

impl StatsRecord {
    pub fn new(stats: CharacterStats) -> Self {
        Self {
            version: RECORD_VERSION,
            stats,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> StoreResult<Self> {
        decode_versioned(bytes)
    }
}

/// The player's battle-to-battle progress: current pools and inventory.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub struct SaveRecord {
    pub version: u8,
    pub current_health: i32,
    pub current_mana: i32,
    pub items: Vec<Item>,
}

impl SaveRecord {
    pub fn new(current_health: i32, current_mana: i32, items: Vec<Item>) -> Self {
        Self {
            version: RECORD_VERSION,
            current_health,
            current_mana,
            items,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> StoreResult<Self> {
        decode_versioned(bytes)
    }
}
