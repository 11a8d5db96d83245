//! Damage calculation
//!
//! Handles the hit formula shared by players and creatures:
//! - Strikes: `max(1, attack + weapon bonus - defense)`
//! - Specials: scaled attack plus a bonus roll, ignoring defense
//! - Poison: flat damage at the start of the victim's turn
//!
//! A defending target takes half (rounded down, minimum 1) of the next hit.

use serde::{Deserialize, Serialize};

/// Where a hit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    /// Basic attack (player or creature)
    Strike,
    /// Class special ability
    Special,
    /// Poison ticking at turn start
    Poison,
}

impl std::fmt::Display for DamageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DamageKind::Strike => "strike",
            DamageKind::Special => "special",
            DamageKind::Poison => "poison",
        };
        write!(f, "{}", s)
    }
}

/// Modifier applied to incoming damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageModifier {
    /// Takes full damage
    Normal,
    /// Defending - takes 50% damage (rounded down, at least 1)
    Halved,
}

impl DamageModifier {
    /// Scale a raw damage amount
    pub fn apply(&self, damage: i32) -> i32 {
        match self {
            DamageModifier::Normal => damage,
            DamageModifier::Halved => (damage / 2).max(1),
        }
    }

    /// Modifier for a target that may be defending
    pub fn for_defending(defending: bool) -> Self {
        if defending {
            DamageModifier::Halved
        } else {
            DamageModifier::Normal
        }
    }
}

/// Damage dealt by one hit after modifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageResult {
    /// Damage before modifiers
    pub base_damage: i32,
    /// Damage after modifiers
    pub final_damage: i32,
    pub kind: DamageKind,
    pub modifier: DamageModifier,
}

impl DamageResult {
    pub fn new(base: i32, kind: DamageKind, modifier: DamageModifier) -> Self {
        let base = base.max(1);
        Self {
            base_damage: base,
            final_damage: modifier.apply(base),
            kind,
            modifier,
        }
    }

    /// Whether the Defend status absorbed part of this hit
    pub fn was_defended(&self) -> bool {
        self.modifier == DamageModifier::Halved
    }
}

/// Base damage of a strike before the defend check
pub fn strike_damage(attack: i32, weapon_bonus: i32, defense: i32) -> i32 {
    (attack + weapon_bonus - defense).max(1)
}

/// Base damage of a special: `attack * multiplier_tenths / 10 + bonus`
pub fn special_damage(attack: i32, multiplier_tenths: i32, bonus: i32) -> i32 {
    (attack * multiplier_tenths / 10 + bonus).max(1)
}
