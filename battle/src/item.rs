//! Consumable items and the inventory that holds them.

use alloc::string::String;
use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// What a consumed item restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    HealthPotion,
    ManaPotion,
}

/// A stack of identical consumables.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    /// How much the pool is restored per use.
    pub power: i32,
    pub amount: u32,
}

impl Item {
    pub fn health_potion(amount: u32) -> Self {
        Self {
            name: String::from("Health potion"),
            kind: ItemKind::HealthPotion,
            power: 100,
            amount,
        }
    }

    pub fn mana_potion(amount: u32) -> Self {
        Self {
            name: String::from("Mana potion"),
            kind: ItemKind::ManaPotion,
            power: 100,
            amount,
        }
    }
}

/// The items a character carries between battles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        let mut inventory = Self::new();
        for item in items {
            inventory.add(item);
        }
        inventory
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Adds a stack, merging by name so the same item never appears twice.
    pub fn add(&mut self, item: Item) {
        match self.items.iter_mut().find(|held| held.name == item.name) {
            Some(held) => held.amount += item.amount,
            None => self.items.push(item),
        }
    }

    /// Spends one use of the named item, returning what it restores.
    /// Depleted stacks disappear from the inventory.
    pub fn consume(&mut self, name: &str) -> Option<(ItemKind, i32)> {
        let at = self
            .items
            .iter()
            .position(|held| held.name == name && held.amount > 0)?;
        let held = &mut self.items[at];
        held.amount -= 1;
        let effect = (held.kind, held.power);
        if held.amount == 0 {
            self.items.remove(at);
        }
        Some(effect)
    }
}
