//! Deterministic RNG for AI decisions.
//!
//! Battles must replay identically per seed, so random target picks use
//! a small xorshift generator owned by the battle instead of a platform
//! RNG.

/// Source of randomness for battle decisions.
pub trait BattleRng {
    fn next_u32(&mut self) -> u32;

    /// A random index in `[0, max)`; 0 when `max` is 0.
    fn gen_range(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u32() as usize) % max
    }
}

/// XorShift32 generator. Same seed, same battle.
#[derive(Debug, Clone)]
pub struct XorShiftRng {
    state: u32,
}

impl XorShiftRng {
    /// Folds a 64-bit seed into the 32-bit state. The state must never be
    /// zero or the generator gets stuck, hence the clamp.
    pub fn seed_from_u64(seed: u64) -> Self {
        let state = ((seed as u32) ^ ((seed >> 32) as u32)).max(1);
        Self { state }
    }
}

impl BattleRng for XorShiftRng {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}
