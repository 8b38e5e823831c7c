//! Core data model shared across the battle crate.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::infliction::InflictionKind;

// ==========================================
// Identity
// ==========================================

/// Unique identifier for a character instance within a battle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Encode,
    Decode,
    MaxEncodedLen,
    TypeInfo,
    Serialize,
    Deserialize,
)]
pub struct CharacterId(pub u32);

/// Which side of the battle a character fights on.
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
pub enum Faction {
    Friendly,
    Enemy,
}

impl Faction {
    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Faction::Friendly => Faction::Enemy,
            Faction::Enemy => Faction::Friendly,
        }
    }
}

// ==========================================
// Attack definitions
// ==========================================

/// An attack's declared targeting rule. Selectors are relative to the
/// caster's faction and resolved against the live roster at cast time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetSelector {
    SingleFriendly,
    AllFriendly,
    SingleEnemy,
    AllEnemy,
    Everyone,
    /// Targets the caster itself.
    None,
}

/// Behavior variant of an attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AttackKind {
    /// Subtracts `power` from each target's health.
    Damage,
    /// Adds `power` to each target's health.
    Heal,
    /// Adds a fresh character built from the named template to the
    /// target's faction.
    Summon { template: String },
    /// No direct health effect; only the carried infliction applies.
    Utility,
}

/// Template for the status infliction an attack carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InflictionSpec {
    pub kind: InflictionKind,
    /// Per-stack magnitude applied each of the owner's turns.
    pub magnitude: i32,
    /// Owner turns until the infliction wears off.
    pub duration: u32,
}

/// Immutable, catalog-owned definition of an attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackDef {
    pub name: String,
    /// Display text. `{dmg}` and `{mana}` placeholders are filled in by
    /// [`AttackDef::describe`].
    pub text: String,
    pub mana_cost: i32,
    pub power: i32,
    pub selector: TargetSelector,
    pub kind: AttackKind,
    pub infliction: Option<InflictionSpec>,
}

impl AttackDef {
    pub fn new(
        name: impl Into<String>,
        text: impl Into<String>,
        mana_cost: i32,
        power: i32,
        selector: TargetSelector,
        kind: AttackKind,
    ) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            mana_cost,
            power,
            selector,
            kind,
            infliction: None,
        }
    }

    pub fn with_infliction(mut self, spec: InflictionSpec) -> Self {
        self.infliction = Some(spec);
        self
    }

    /// Tooltip line: mana cost prefix plus the display text with its
    /// placeholders substituted.
    pub fn describe(&self) -> String {
        let mut text = self.text.clone();
        if let Some(at) = text.find("{dmg}") {
            text.replace_range(at..at + 5, &self.power.abs().to_string());
        }
        if let Some(at) = text.find("{mana}") {
            text.replace_range(at..at + 6, &self.mana_cost.to_string());
        }
        let mut out = self.mana_cost.to_string();
        out.push_str(" mana: ");
        out.push_str(&text);
        out
    }
}

// ==========================================
// Character blueprints
// ==========================================

/// Base stats of a character. Health and mana pools are clamped to the
/// `max_*` values here at all times.
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
pub struct CharacterStats {
    pub max_health: i32,
    pub max_mana: i32,
    pub strength: i32,
    pub intellect: i32,
    pub speed: i32,
}

/// Blueprint for a battle character: identity, stats and attack roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterTemplate {
    pub name: String,
    pub stats: CharacterStats,
    /// Attack names, looked up in the catalog when the character is built.
    pub attacks: Vec<String>,
    /// AI-driven on its own turn; false for input-controlled characters.
    #[serde(default = "ai_default")]
    pub ai_controlled: bool,
}

fn ai_default() -> bool {
    true
}
