//! Creatures with fixed stats for deterministic scenarios

#![allow(dead_code)]

use ruincrawl::entities::Creature;

/// A target that barely fights back
pub fn dummy(name: &str, hp: i32, xp: u32) -> Creature {
    Creature::new(name, 1, hp, 0, 1, 0, xp)
}

/// Kills any starting character in one blow and cannot be killed quickly
pub fn brute(name: &str) -> Creature {
    Creature::new(name, 20, 100_000, 0, 5_000, 10_000, 0)
}

/// A harmless creature whose hits poison for `venom` per turn
pub fn poisoner(name: &str, venom: i32) -> Creature {
    Creature::new(name, 1, 100_000, 0, 1, 10_000, 0).with_venom(venom)
}
