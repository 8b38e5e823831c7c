//! The character model: resource pools, attack roster and inflictions.

use alloc::string::String;
use alloc::vec::Vec;

use log::debug;

use crate::catalog::Catalog;
use crate::error::BattleResult;
use crate::infliction::{Infliction, InflictionKind};
use crate::scheduler::{ActionKind, ActionQueue, EFFECT_DELAY};
use crate::types::{
    AttackDef, AttackKind, CharacterId, CharacterStats, CharacterTemplate, Faction,
    InflictionSpec,
};

// ==========================================
// Attacks as held by a character
// ==========================================

/// A runtime attack: an immutable definition plus the operations that
/// apply it during a battle.
#[derive(Debug, Clone, PartialEq)]
pub struct Attack {
    pub def: AttackDef,
}

/// What applying an attack to one target changed. The orchestrator turns
/// this into presentation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackImpact {
    /// Signed health change and the resulting pool, when the attack
    /// touches health at all.
    pub health: Option<(i32, i32)>,
    /// Kind, stacks and duration of the infliction after application.
    pub infliction: Option<(InflictionKind, u32, u32)>,
}

impl Attack {
    pub fn from_def(def: &AttackDef) -> Self {
        Self { def: def.clone() }
    }

    /// Mana gate only. Spawn capacity for summons is checked by the
    /// orchestrator, which owns the spawn points.
    pub fn is_usable(&self, user: &Character) -> bool {
        user.mana() >= self.def.mana_cost
    }

    /// Applies this attack's direct effect to one target. The carried
    /// infliction lands first, then the health delta, so a freeze takes
    /// hold even if the damage would matter later.
    pub fn apply(&self, target: &mut Character) -> AttackImpact {
        let infliction = self.def.infliction.map(|spec| {
            let landed = target.apply_infliction(spec);
            (spec.kind, landed.stacks(), landed.duration())
        });
        let health = match self.def.kind {
            AttackKind::Damage => Some(self.def.power),
            AttackKind::Heal => Some(-self.def.power),
            AttackKind::Summon { .. } | AttackKind::Utility => None,
        }
        .map(|amount| {
            let before = target.health();
            let after = target.apply_damage(amount);
            (after - before, after)
        });
        AttackImpact { health, infliction }
    }
}

// ==========================================
// Characters
// ==========================================

/// A live participant in a battle.
#[derive(Debug, Clone)]
pub struct Character {
    id: CharacterId,
    pub name: String,
    pub faction: Faction,
    stats: CharacterStats,
    health: i32,
    mana: i32,
    attacks: Vec<Attack>,
    inflictions: Vec<Infliction>,
    /// Cleared by freeze and by death; reset at the start of each of the
    /// character's own turns.
    pub can_act: bool,
    /// Whether the character acts on its own or waits for input.
    pub ai_controlled: bool,
    spawn_slot: Option<usize>,
}

impl Character {
    /// Builds a character from a template, resolving its attack names
    /// against the catalog. Pools start full.
    pub fn from_template(
        id: CharacterId,
        faction: Faction,
        template: &CharacterTemplate,
        catalog: &Catalog,
    ) -> BattleResult<Self> {
        let mut attacks = Vec::with_capacity(template.attacks.len());
        for name in &template.attacks {
            attacks.push(Attack::from_def(catalog.attack(name)?));
        }
        Ok(Self {
            id,
            name: template.name.clone(),
            faction,
            stats: template.stats,
            health: template.stats.max_health,
            mana: template.stats.max_mana,
            attacks,
            inflictions: Vec::new(),
            can_act: false,
            ai_controlled: template.ai_controlled,
            spawn_slot: None,
        })
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn stats(&self) -> &CharacterStats {
        &self.stats
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn mana(&self) -> i32 {
        self.mana
    }

    pub fn speed(&self) -> i32 {
        self.stats.speed
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn attacks(&self) -> &[Attack] {
        &self.attacks
    }

    pub fn attack_named(&self, name: &str) -> Option<&Attack> {
        self.attacks.iter().find(|attack| attack.def.name == name)
    }

    pub fn inflictions(&self) -> &[Infliction] {
        &self.inflictions
    }

    pub fn infliction(&self, kind: InflictionKind) -> Option<&Infliction> {
        self.inflictions.iter().find(|inf| inf.kind == kind)
    }

    pub(crate) fn spawn_slot(&self) -> Option<usize> {
        self.spawn_slot
    }

    pub(crate) fn set_spawn_slot(&mut self, slot: usize) {
        self.spawn_slot = Some(slot);
    }

    /// Overwrites stats and pools, e.g. when restoring a saved character.
    /// Pools are clamped to the new maxima.
    pub fn restore(&mut self, stats: CharacterStats, health: i32, mana: i32) {
        self.stats = stats;
        self.health = health.clamp(0, stats.max_health);
        self.mana = mana.clamp(0, stats.max_mana);
    }

    /// The single clamped path for all health changes. `amount` is damage;
    /// negative amounts heal. Returns the resulting pool. Reaching zero
    /// also clears `can_act` so a dying character never gets its action.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        self.health = (self.health - amount).clamp(0, self.stats.max_health);
        if self.health == 0 {
            self.can_act = false;
        }
        self.health
    }

    /// The single clamped path for all mana changes. Positive restores,
    /// negative spends. Returns the resulting pool.
    pub fn apply_mana_delta(&mut self, amount: i32) -> i32 {
        self.mana = (self.mana + amount).clamp(0, self.stats.max_mana);
        self.mana
    }

    pub fn can_use(&self, attack: &Attack) -> bool {
        attack.is_usable(self)
    }

    /// Applies or merges an infliction. Freeze clears `can_act`
    /// synchronously, before any queued effect gets a chance to run.
    pub fn apply_infliction(&mut self, spec: InflictionSpec) -> &Infliction {
        if spec.kind == InflictionKind::Freeze {
            self.can_act = false;
        }
        let at = match self.inflictions.iter().position(|inf| inf.kind == spec.kind) {
            Some(at) => {
                self.inflictions[at].merge(&spec);
                at
            }
            None => {
                self.inflictions.push(Infliction::new(spec));
                self.inflictions.len() - 1
            }
        };
        &self.inflictions[at]
    }

    /// Counts down the named infliction, removing it on expiry. Returns
    /// true exactly once, when the infliction wears off.
    pub fn tick_infliction(&mut self, kind: InflictionKind) -> bool {
        let Some(at) = self.inflictions.iter().position(|inf| inf.kind == kind) else {
            return false;
        };
        if self.inflictions[at].tick() {
            self.inflictions.remove(at);
            return true;
        }
        false
    }

    /// Begins this character's own turn: resets `can_act`, schedules every
    /// active infliction's per-turn effect and then the act itself behind
    /// them. Freeze preempts the turn synchronously, so the queued act
    /// sees `can_act == false` when it runs.
    pub fn start_turn(&mut self, queue: &mut ActionQueue) {
        debug!("{} starts their turn", self.name);
        self.can_act = true;
        for inf in &self.inflictions {
            if inf.kind == InflictionKind::Freeze {
                self.can_act = false;
            }
            queue.enqueue(
                ActionKind::InflictionTick {
                    owner: self.id,
                    kind: inf.kind,
                },
                EFFECT_DELAY,
            );
        }
        queue.enqueue(ActionKind::TakeTurn { character: self.id }, 0);
    }
}
