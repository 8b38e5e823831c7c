//! Caster battle simulation core.
//!
//! This crate implements the whole battle loop for the Caster game:
//! the attack catalog, the character model, status inflictions, the
//! time-gated action queue and the battle orchestrator on top of it.
//! Everything is deterministic per seed so a battle can be replayed or
//! verified headlessly.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod battle;
mod catalog;
mod character;
mod error;
mod infliction;
mod item;
mod rng;
mod scheduler;
mod types;

#[cfg(test)]
mod tests;

pub use battle::*;
pub use catalog::*;
pub use character::*;
pub use error::*;
pub use infliction::*;
pub use item::*;
pub use rng::*;
pub use scheduler::*;
pub use types::*;
