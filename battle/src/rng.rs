//! Deterministic RNG for battle resolution
//!
//! Every random choice in a battle (targeting and priority tie-breaks) draws from one
//! seeded generator owned by that battle. Nothing reads a process-wide generator.

use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

/// Trait for random number generation in battles
pub trait BattleRng {
    /// Generate a random u32
    fn next_u32(&mut self) -> u32;

    /// Generate a random number in range [0, max)
    fn gen_range(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u32() as usize) % max
    }

    /// Shuffle a slice using Fisher-Yates algorithm
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.gen_range(i + 1);
            slice.swap(i, j);
        }
    }

    /// Pick up to `count` distinct items, in draw order.
    fn sample<T: Clone>(&mut self, items: &[T], count: usize) -> Vec<T> {
        let mut pool: Vec<T> = items.to_vec();
        self.shuffle(&mut pool);
        pool.truncate(count);
        pool
    }
}

/// XorShift32 RNG - simple, fast, deterministic
///
/// This is suitable for game logic where cryptographic security is not needed.
/// The same seed will always produce the same sequence.
#[derive(Debug, Clone, Encode, Decode, TypeInfo)]
pub struct XorShiftRng {
    state: u32,
}

impl XorShiftRng {
    /// Create a new RNG from a u64 seed
    ///
    /// The seed is scrambled first so nearby seeds start far apart, then folded into a
    /// u32, ensuring state is never 0.
    pub fn seed_from_u64(seed: u64) -> Self {
        let mixed = splitmix64(seed);
        let state = ((mixed as u32) ^ ((mixed >> 32) as u32)).max(1);
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

/// Seed for the battle between participants `a` and `b` of a round robin.
///
/// Every matchup gets an independent stream no matter which thread runs it.
pub fn derive_seed(base: u64, a: usize, b: usize) -> u64 {
    splitmix64(
        base.wrapping_add((a as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .wrapping_add((b as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)),
    )
}

// SplitMix64 finalizer.
fn splitmix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
