//! The battle orchestrator.
//!
//! Owns the roster, the spawn points, the action queue and the turn
//! rotation. The host drives it once per frame with [`Battle::drive`] and
//! reads back presentation events with [`Battle::drain_events`]; input
//! for the player's character arrives through the `submit_*` methods.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::character::{Attack, Character};
use crate::error::{BattleError, BattleResult};
use crate::infliction::InflictionKind;
use crate::item::{Inventory, ItemKind};
use crate::rng::{BattleRng, XorShiftRng};
use crate::scheduler::{ActionKind, ActionQueue, Tick, EFFECT_DELAY};
use crate::types::{AttackKind, CharacterId, CharacterTemplate, Faction, TargetSelector};

// ==========================================
// Phases, outcomes, events
// ==========================================

/// Lifecycle of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BattlePhase {
    /// Roster assembly; the queue is not running yet.
    Assembling,
    /// Turns are being taken.
    Active,
    /// One faction has been wiped out.
    Ended,
}

/// How a finished battle went, from the friendly side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

/// A place a character can occupy for the duration of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnPoint {
    pub faction: Faction,
    pub taken: bool,
}

impl SpawnPoint {
    pub fn new(faction: Faction) -> Self {
        Self {
            faction,
            taken: false,
        }
    }
}

/// Fire-and-forget notifications for the presentation layer. The
/// simulation never waits on these; a headless host can drop them all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum BattleEvent {
    TurnStarted {
        character: CharacterId,
    },
    /// The input-controlled character may now choose an attack or item.
    AwaitingInput {
        character: CharacterId,
    },
    AttackUsed {
        caster: CharacterId,
        attack: String,
        targets: Vec<CharacterId>,
    },
    /// Signed health change after clamping; negative is damage.
    HealthChanged {
        character: CharacterId,
        change: i32,
        remaining: i32,
    },
    /// Signed mana change after clamping.
    ManaChanged {
        character: CharacterId,
        change: i32,
        remaining: i32,
    },
    InflictionApplied {
        character: CharacterId,
        kind: InflictionKind,
        stacks: u32,
        duration: u32,
    },
    InflictionExpired {
        character: CharacterId,
        kind: InflictionKind,
    },
    ItemUsed {
        user: CharacterId,
        name: String,
    },
    CharacterSummoned {
        character: CharacterId,
        name: String,
        faction: Faction,
    },
    CharacterDied {
        character: CharacterId,
        name: String,
    },
    /// Status text to broadcast for `duration` ticks.
    Message {
        text: String,
        duration: Tick,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
}

// ==========================================
// The battle itself
// ==========================================

pub struct Battle {
    catalog: Catalog,
    templates: Vec<CharacterTemplate>,
    roster: Vec<Character>,
    spawn_points: Vec<SpawnPoint>,
    queue: ActionQueue,
    current_turn: Option<CharacterId>,
    awaiting_input: Option<CharacterId>,
    phase: BattlePhase,
    outcome: Option<BattleOutcome>,
    inventory: Inventory,
    events: Vec<BattleEvent>,
    rng: XorShiftRng,
    next_id: u32,
}

impl Battle {
    pub fn new(
        catalog: Catalog,
        templates: Vec<CharacterTemplate>,
        spawn_points: Vec<SpawnPoint>,
        seed: u64,
    ) -> Self {
        Self {
            catalog,
            templates,
            roster: Vec::new(),
            spawn_points,
            queue: ActionQueue::new(),
            current_turn: None,
            awaiting_input: None,
            phase: BattlePhase::Assembling,
            outcome: None,
            inventory: Inventory::new(),
            events: Vec::new(),
            rng: XorShiftRng::seed_from_u64(seed),
            next_id: 0,
        }
    }

    // ==========================================
    // Accessors
    // ==========================================

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn roster(&self) -> &[Character] {
        &self.roster
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.roster.iter().find(|c| c.id() == id)
    }

    pub fn current_turn(&self) -> Option<CharacterId> {
        self.current_turn
    }

    /// The character whose input is currently awaited, if any.
    pub fn awaiting_input(&self) -> Option<CharacterId> {
        self.awaiting_input
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn set_inventory(&mut self, inventory: Inventory) {
        self.inventory = inventory;
    }

    pub fn spawn_points(&self) -> &[SpawnPoint] {
        &self.spawn_points
    }

    pub fn pending_actions(&self) -> usize {
        self.queue.len()
    }

    /// Moves every event emitted since the last call to the caller.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        core::mem::take(&mut self.events)
    }

    fn position(&self, id: CharacterId) -> Option<usize> {
        self.roster.iter().position(|c| c.id() == id)
    }

    // ==========================================
    // Roster assembly
    // ==========================================

    /// Adds a character built from the named template, if a spawn point of
    /// the faction is free. The roster re-sorts by descending speed so the
    /// newcomer joins the rotation immediately. Returns `None` when every
    /// slot of the faction is taken; the character is discarded, which is
    /// not an error.
    pub fn add_character(
        &mut self,
        faction: Faction,
        template: &str,
    ) -> BattleResult<Option<CharacterId>> {
        let template = self
            .templates
            .iter()
            .find(|t| t.name == template)
            .ok_or_else(|| BattleError::TemplateNotFound {
                name: template.to_string(),
            })?
            .clone();
        let Some(slot) = self
            .spawn_points
            .iter()
            .position(|sp| sp.faction == faction && !sp.taken)
        else {
            debug!("no free spawn point for {}", template.name);
            return Ok(None);
        };
        let id = CharacterId(self.next_id);
        let mut character = Character::from_template(id, faction, &template, &self.catalog)?;
        character.set_spawn_slot(slot);
        self.next_id += 1;
        self.spawn_points[slot].taken = true;
        self.roster.push(character);
        self.roster.sort_by_key(|c| core::cmp::Reverse(c.speed()));
        Ok(Some(id))
    }

    /// Overwrites a character's stats and pools from persisted values,
    /// then re-sorts the rotation in case its speed changed.
    pub fn restore_character(
        &mut self,
        id: CharacterId,
        stats: crate::types::CharacterStats,
        health: i32,
        mana: i32,
    ) -> BattleResult<()> {
        let at = self.position(id).ok_or(BattleError::UnknownCharacter)?;
        self.roster[at].restore(stats, health, mana);
        self.roster.sort_by_key(|c| core::cmp::Reverse(c.speed()));
        Ok(())
    }

    /// Locks the roster and queues the first turn.
    pub fn start(&mut self) -> BattleResult<()> {
        if self.phase != BattlePhase::Assembling {
            return Err(BattleError::WrongPhase);
        }
        info!("=== BATTLE START ===");
        self.phase = BattlePhase::Active;
        self.events.push(BattleEvent::Message {
            text: String::from("Battle started!"),
            duration: 3,
        });
        self.queue.enqueue(ActionKind::AdvanceTurn, 0);
        Ok(())
    }

    // ==========================================
    // Driving
    // ==========================================

    /// Advances the simulation by one host tick, executing at most one
    /// queued action. A no-op while the battle is not active, while the
    /// queue is empty (e.g. input is being awaited) or while the gate
    /// from the previous action has not opened yet.
    pub fn drive(&mut self, now: Tick) {
        if self.phase != BattlePhase::Active {
            return;
        }
        let Some(action) = self.queue.pop_eligible(now) else {
            return;
        };
        match action {
            ActionKind::AdvanceTurn => self.advance_turn(),
            ActionKind::TakeTurn { character } => self.take_turn(character),
            ActionKind::ResolveAttack {
                caster,
                attack,
                targets,
            } => self.resolve_attack(caster, &attack, &targets),
            ActionKind::InflictionTick { owner, kind } => self.infliction_tick(owner, kind),
            ActionKind::ApplyItem { user, kind, power } => self.apply_item(user, kind, power),
        }
    }

    // ==========================================
    // Input
    // ==========================================

    /// Targets the given selector would resolve to right now, for the
    /// caster's faction. Single selectors return the full candidate pool;
    /// the picked target narrows it to one.
    pub fn resolve_targets(&self, caster: CharacterId, selector: TargetSelector) -> Vec<CharacterId> {
        let Some(at) = self.position(caster) else {
            return Vec::new();
        };
        let faction = self.roster[at].faction;
        match selector {
            TargetSelector::SingleFriendly | TargetSelector::AllFriendly => self
                .roster
                .iter()
                .filter(|c| c.faction == faction)
                .map(|c| c.id())
                .collect(),
            TargetSelector::SingleEnemy | TargetSelector::AllEnemy => self
                .roster
                .iter()
                .filter(|c| c.faction == faction.opposite())
                .map(|c| c.id())
                .collect(),
            TargetSelector::Everyone => self.roster.iter().map(|c| c.id()).collect(),
            TargetSelector::None => vec![caster],
        }
    }

    /// The awaited character casts an attack. Mana is deducted here,
    /// synchronously; the attack itself lands after the effect delay.
    /// `chosen` narrows single-target selectors; for everything else the
    /// selector decides and `chosen` is ignored.
    pub fn submit_attack_choice(
        &mut self,
        caster: CharacterId,
        attack: &str,
        chosen: &[CharacterId],
    ) -> BattleResult<()> {
        if self.phase != BattlePhase::Active {
            return Err(BattleError::WrongPhase);
        }
        if self.awaiting_input != Some(caster) {
            return Err(BattleError::NotYourTurn);
        }
        let at = self.position(caster).ok_or(BattleError::UnknownCharacter)?;
        let attack = self.roster[at]
            .attack_named(attack)
            .ok_or_else(|| BattleError::AttackNotFound {
                name: attack.to_string(),
            })?
            .clone();
        if !self.roster[at].can_use(&attack) {
            return Err(BattleError::NotEnoughMana {
                have: self.roster[at].mana(),
                need: attack.def.mana_cost,
            });
        }
        let targets = self.pick_targets(caster, attack.def.selector, chosen);
        self.awaiting_input = None;
        self.perform_attack(caster, &attack, targets);
        Ok(())
    }

    /// The awaited character uses an item instead of attacking. The item
    /// is spent synchronously; its effect lands after the effect delay and
    /// the turn ends.
    pub fn submit_item_choice(&mut self, user: CharacterId, item: &str) -> BattleResult<()> {
        if self.phase != BattlePhase::Active {
            return Err(BattleError::WrongPhase);
        }
        if self.awaiting_input != Some(user) {
            return Err(BattleError::NotYourTurn);
        }
        let (kind, power) =
            self.inventory
                .consume(item)
                .ok_or_else(|| BattleError::ItemNotFound {
                    name: item.to_string(),
                })?;
        self.awaiting_input = None;
        self.events.push(BattleEvent::ItemUsed {
            user,
            name: item.to_string(),
        });
        self.queue
            .enqueue(ActionKind::ApplyItem { user, kind, power }, EFFECT_DELAY);
        self.end_turn();
        Ok(())
    }

    // ==========================================
    // Turn flow
    // ==========================================

    fn advance_turn(&mut self) {
        if self.roster.is_empty() {
            return;
        }
        // One past the previous holder, wrapping; a removed holder falls
        // back to the head of the speed order.
        let next = match self.current_turn.and_then(|id| self.position(id)) {
            Some(at) => (at + 1) % self.roster.len(),
            None => 0,
        };
        let id = self.roster[next].id();
        self.current_turn = Some(id);
        self.events.push(BattleEvent::TurnStarted { character: id });
        let Self { roster, queue, .. } = self;
        roster[next].start_turn(queue);
    }

    fn take_turn(&mut self, id: CharacterId) {
        let Some(at) = self.position(id) else {
            // Died between turn start and the act. The turn just passes.
            self.end_turn();
            return;
        };
        if !self.roster[at].can_act {
            self.events.push(BattleEvent::Message {
                text: format!("{} cannot act", self.roster[at].name),
                duration: 2,
            });
            self.end_turn();
            return;
        }
        if self.roster[at].ai_controlled {
            self.ai_act(at);
        } else {
            self.awaiting_input = Some(id);
            self.events.push(BattleEvent::AwaitingInput { character: id });
        }
    }

    /// AI policy: the first usable attack in roster order, aimed by its
    /// selector with random single-target picks.
    fn ai_act(&mut self, at: usize) {
        let id = self.roster[at].id();
        let choice = self.roster[at]
            .attacks()
            .iter()
            .find(|attack| {
                self.roster[at].can_use(attack)
                    && match attack.def.kind {
                        AttackKind::Summon { .. } => self.has_free_spawn(self.roster[at].faction),
                        _ => true,
                    }
            })
            .cloned();
        let Some(attack) = choice else {
            self.events.push(BattleEvent::Message {
                text: format!("{} bides their time", self.roster[at].name),
                duration: 2,
            });
            self.end_turn();
            return;
        };
        let candidates = self.resolve_targets(id, attack.def.selector);
        let targets = match attack.def.selector {
            TargetSelector::SingleFriendly | TargetSelector::SingleEnemy => {
                if candidates.is_empty() {
                    vec![id]
                } else {
                    vec![candidates[self.rng.gen_range(candidates.len())]]
                }
            }
            _ => {
                if candidates.is_empty() {
                    vec![id]
                } else {
                    candidates
                }
            }
        };
        self.perform_attack(id, &attack, targets);
    }

    fn pick_targets(
        &self,
        caster: CharacterId,
        selector: TargetSelector,
        chosen: &[CharacterId],
    ) -> Vec<CharacterId> {
        let candidates = self.resolve_targets(caster, selector);
        match selector {
            TargetSelector::SingleFriendly | TargetSelector::SingleEnemy => chosen
                .iter()
                .copied()
                .find(|t| candidates.contains(t))
                .or_else(|| candidates.first().copied())
                .map(|t| vec![t])
                .unwrap_or_else(|| vec![caster]),
            _ => {
                if candidates.is_empty() {
                    vec![caster]
                } else {
                    candidates
                }
            }
        }
    }

    fn perform_attack(&mut self, caster: CharacterId, attack: &Attack, targets: Vec<CharacterId>) {
        let Some(at) = self.position(caster) else {
            return;
        };
        debug!("{} casts {}", self.roster[at].name, attack.def.name);
        let before = self.roster[at].mana();
        let remaining = self.roster[at].apply_mana_delta(-attack.def.mana_cost);
        self.events.push(BattleEvent::ManaChanged {
            character: caster,
            change: remaining - before,
            remaining,
        });
        self.queue.enqueue(
            ActionKind::ResolveAttack {
                caster,
                attack: attack.def.name.clone(),
                targets,
            },
            EFFECT_DELAY,
        );
    }

    fn resolve_attack(&mut self, caster: CharacterId, name: &str, targets: &[CharacterId]) {
        // The caster may have died while the cast was in flight.
        let attack = self
            .position(caster)
            .and_then(|at| self.roster[at].attack_named(name))
            .cloned();
        let Some(attack) = attack else {
            self.end_turn();
            return;
        };
        self.events.push(BattleEvent::AttackUsed {
            caster,
            attack: name.to_string(),
            targets: targets.to_vec(),
        });
        for &target in targets {
            // Dead targets are skipped silently; the cost stays spent.
            let Some(at) = self.position(target) else {
                continue;
            };
            if let AttackKind::Summon { ref template } = attack.def.kind {
                self.summon(target, template);
                continue;
            }
            let impact = attack.apply(&mut self.roster[at]);
            if let Some((kind, stacks, duration)) = impact.infliction {
                self.events.push(BattleEvent::InflictionApplied {
                    character: target,
                    kind,
                    stacks,
                    duration,
                });
            }
            if let Some((change, remaining)) = impact.health {
                self.events.push(BattleEvent::HealthChanged {
                    character: target,
                    change,
                    remaining,
                });
            }
        }
        self.sweep_dead();
        self.try_end_battle();
        if self.phase == BattlePhase::Active {
            self.end_turn();
        }
    }

    /// Summons next to the target, on the target's side. A full bench
    /// swallows the summon without complaint; a missing template is a
    /// data bug and gets logged.
    fn summon(&mut self, beside: CharacterId, template: &str) {
        let Some(at) = self.position(beside) else {
            return;
        };
        let faction = self.roster[at].faction;
        match self.add_character(faction, template) {
            Ok(Some(id)) => {
                let name = self
                    .character(id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                info!("{} joins the battle", name);
                self.events.push(BattleEvent::CharacterSummoned {
                    character: id,
                    name,
                    faction,
                });
            }
            Ok(None) => {}
            Err(err) => {
                error!("summon failed: {:?}", err);
                self.events.push(BattleEvent::Message {
                    text: String::from("The summons goes unanswered..."),
                    duration: 2,
                });
            }
        }
    }

    fn infliction_tick(&mut self, owner: CharacterId, kind: InflictionKind) {
        let Some(at) = self.position(owner) else {
            return;
        };
        let Some(magnitude) = self.roster[at].infliction(kind).map(|inf| inf.magnitude())
        else {
            return;
        };
        match kind {
            InflictionKind::Freeze => {
                self.events.push(BattleEvent::Message {
                    text: format!("{} is frozen solid", self.roster[at].name),
                    duration: 2,
                });
            }
            InflictionKind::Poison => {
                self.events.push(BattleEvent::Message {
                    text: format!("{} suffers from poison", self.roster[at].name),
                    duration: 2,
                });
                self.apply_health_change(owner, magnitude);
            }
            InflictionKind::HealthRestore => {
                self.apply_health_change(owner, -magnitude);
            }
            InflictionKind::ManaRestore => {
                let before = self.roster[at].mana();
                let remaining = self.roster[at].apply_mana_delta(magnitude);
                self.events.push(BattleEvent::ManaChanged {
                    character: owner,
                    change: remaining - before,
                    remaining,
                });
            }
        }
        if let Some(at) = self.position(owner) {
            if self.roster[at].tick_infliction(kind) {
                self.events.push(BattleEvent::InflictionExpired {
                    character: owner,
                    kind,
                });
            }
        }
        self.sweep_dead();
        self.try_end_battle();
    }

    fn apply_item(&mut self, user: CharacterId, kind: ItemKind, power: i32) {
        let Some(at) = self.position(user) else {
            return;
        };
        match kind {
            ItemKind::HealthPotion => self.apply_health_change(user, -power),
            ItemKind::ManaPotion => {
                let before = self.roster[at].mana();
                let remaining = self.roster[at].apply_mana_delta(power);
                self.events.push(BattleEvent::ManaChanged {
                    character: user,
                    change: remaining - before,
                    remaining,
                });
            }
        }
    }

    /// Ends the current turn. The advance goes through the queue so it is
    /// ordered behind anything the ending turn already enqueued.
    fn end_turn(&mut self) {
        self.queue.enqueue(ActionKind::AdvanceTurn, 0);
    }

    // ==========================================
    // Damage, death, battle end
    // ==========================================

    /// Routes a damage amount (negative heals) through the target's
    /// clamped pool and reports the actual change.
    fn apply_health_change(&mut self, target: CharacterId, amount: i32) {
        let Some(at) = self.position(target) else {
            return;
        };
        let before = self.roster[at].health();
        let remaining = self.roster[at].apply_damage(amount);
        self.events.push(BattleEvent::HealthChanged {
            character: target,
            change: remaining - before,
            remaining,
        });
    }

    /// Removes every dead character from the roster and frees their spawn
    /// points. Death is terminal for the rest of the battle.
    fn sweep_dead(&mut self) {
        let mut at = 0;
        while at < self.roster.len() {
            if self.roster[at].is_dead() {
                let fallen = self.roster.remove(at);
                if let Some(slot) = fallen.spawn_slot() {
                    self.spawn_points[slot].taken = false;
                }
                if self.current_turn == Some(fallen.id()) {
                    self.current_turn = None;
                }
                info!("{} has died", fallen.name);
                self.events.push(BattleEvent::CharacterDied {
                    character: fallen.id(),
                    name: fallen.name,
                });
            } else {
                at += 1;
            }
        }
    }

    fn has_free_spawn(&self, faction: Faction) -> bool {
        self.spawn_points
            .iter()
            .any(|sp| sp.faction == faction && !sp.taken)
    }

    /// The battle ends when one faction has no one left. The phase check
    /// makes the transition fire exactly once no matter how many deaths
    /// land in the same resolution.
    fn try_end_battle(&mut self) {
        if self.phase != BattlePhase::Active {
            return;
        }
        let friendly_alive = self.roster.iter().any(|c| c.faction == Faction::Friendly);
        let enemy_alive = self.roster.iter().any(|c| c.faction == Faction::Enemy);
        if friendly_alive && enemy_alive {
            return;
        }
        let outcome = if enemy_alive {
            BattleOutcome::Defeat
        } else {
            BattleOutcome::Victory
        };
        info!("=== BATTLE OVER: {:?} ===", outcome);
        self.queue.clear();
        self.current_turn = None;
        self.awaiting_input = None;
        for sp in &mut self.spawn_points {
            sp.taken = false;
        }
        self.phase = BattlePhase::Ended;
        self.outcome = Some(outcome);
        let text = match outcome {
            BattleOutcome::Victory => String::from("Your foes have been slain!"),
            BattleOutcome::Defeat => String::from("You have been defeated..."),
        };
        self.events.push(BattleEvent::Message { text, duration: 5 });
        self.events.push(BattleEvent::BattleEnded { outcome });
    }
}
