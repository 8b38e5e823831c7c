//! The time-gated FIFO action queue at the heart of turn resolution.
//!
//! Every deferred state mutation in a battle funnels through this queue.
//! Actions execute strictly in enqueue order and at most one executes per
//! drive tick. An action's delay holds back the *next* dequeue, not its
//! own execution, which paces a burst of queued effects out over time
//! without ever reordering them.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use crate::infliction::InflictionKind;
use crate::item::ItemKind;
use crate::types::CharacterId;

/// Simulation time, advanced by the host once per frame.
pub type Tick = u32;

/// The standard delay that paces visible effects (attack resolution,
/// infliction ticks, item effects) to a watchable speed.
pub const EFFECT_DELAY: Tick = 2;

/// The commands a scheduled action can carry. These are executed by the
/// battle's drive step; nothing else mutates battle state mid-turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Advance the rotation cursor and start the next character's turn.
    AdvanceTurn,
    /// Let the character whose turn it is act.
    TakeTurn { character: CharacterId },
    /// Apply a cast attack to its resolved targets, then end the turn.
    ResolveAttack {
        caster: CharacterId,
        attack: String,
        targets: Vec<CharacterId>,
    },
    /// Apply one infliction's per-turn effect and count down its duration.
    InflictionTick {
        owner: CharacterId,
        kind: InflictionKind,
    },
    /// Apply a consumed item's restore effect.
    ApplyItem {
        user: CharacterId,
        kind: ItemKind,
        power: i32,
    },
}

/// A deferred, single-shot effect awaiting execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledAction {
    pub effect: ActionKind,
    /// Ticks to wait after this action runs before the next one may.
    pub delay: Tick,
}

/// FIFO queue of scheduled actions plus the eligibility gate.
#[derive(Debug, Default)]
pub struct ActionQueue {
    actions: VecDeque<ScheduledAction>,
    next_eligible: Tick,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action to the tail. Never reorders, never blocks.
    pub fn enqueue(&mut self, effect: ActionKind, delay: Tick) {
        self.actions.push_back(ScheduledAction { effect, delay });
    }

    /// Pops the head action if the gate has opened. After a pop the gate
    /// closes again until `now + delay`, so at most one action comes out
    /// per tick.
    pub fn pop_eligible(&mut self, now: Tick) -> Option<ActionKind> {
        if now < self.next_eligible {
            return None;
        }
        let action = self.actions.pop_front()?;
        self.next_eligible = now + action.delay;
        Some(action.effect)
    }

    /// Drops every pending action and reopens the gate. The only
    /// cancellation primitive; used when the battle ends.
    pub fn clear(&mut self) {
        self.actions.clear();
        self.next_eligible = 0;
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
