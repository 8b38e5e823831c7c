//! Status inflictions.
//!
//! An infliction is a stacking, duration-limited effect carried by a
//! character. A character holds at most one instance per kind; applying
//! a duplicate merges into the existing instance instead of adding a
//! second one. Per-turn effects are scheduled at the start of the
//! owner's turn and the duration counts down when the effect runs.

use parity_scale_codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::types::InflictionSpec;

/// Hard cap on how high an infliction can stack.
pub const MAX_STACKS: u32 = 5;

/// The kinds of status infliction a character can carry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Encode,
    Decode,
    MaxEncodedLen,
    TypeInfo,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum InflictionKind {
    /// The owner cannot act while frozen. No per-turn magnitude.
    Freeze,
    /// Damages the owner each of its turns.
    Poison,
    /// Restores the owner's mana each of its turns.
    ManaRestore,
    /// Restores the owner's health each of its turns.
    HealthRestore,
}

/// A live infliction on a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Infliction {
    pub kind: InflictionKind,
    duration: u32,
    stacks: u32,
    magnitude_per_stack: i32,
}

impl Infliction {
    pub fn new(spec: InflictionSpec) -> Self {
        Self {
            kind: spec.kind,
            duration: spec.duration,
            stacks: 1,
            magnitude_per_stack: spec.magnitude,
        }
    }

    /// Merge a duplicate application of the same kind: the longer duration
    /// wins, one stack is added (capped at [`MAX_STACKS`]) and the larger
    /// per-stack magnitude is kept.
    pub fn merge(&mut self, spec: &InflictionSpec) {
        debug_assert_eq!(self.kind, spec.kind);
        self.duration = self.duration.max(spec.duration);
        self.stacks = (self.stacks + 1).min(MAX_STACKS);
        self.magnitude_per_stack = self.magnitude_per_stack.max(spec.magnitude);
    }

    /// Effective per-turn magnitude: per-stack magnitude times stack count.
    pub fn magnitude(&self) -> i32 {
        self.magnitude_per_stack * self.stacks as i32
    }

    /// Counts down one owner turn. Returns true once expired, at which
    /// point the owner must remove it.
    pub fn tick(&mut self) -> bool {
        self.duration = self.duration.saturating_sub(1);
        self.duration == 0
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn stacks(&self) -> u32 {
        self.stacks
    }
}
