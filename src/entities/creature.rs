//! Creatures and the bestiary
//!
//! Creatures only change while a combat session holds them. Ordinary
//! encounters are scaled from the party's average level; the elite and the
//! boss are fixed stat blocks.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::DifficultyTier;
use crate::combat::EnemyStrategy;

/// Names rolled for ordinary encounters
const BESTIARY: [&str; 7] = [
    "Skeleton",
    "Goblin",
    "Wight",
    "Cave Bat",
    "Giant Rat",
    "Cultist",
    "Dire Wolf",
];

/// Creatures whose bite poisons
const VENOMOUS: [&str; 2] = ["Giant Rat", "Dire Wolf"];

/// Creatures that pick off the weakest player
const CUNNING: [&str; 2] = ["Wight", "Cultist"];

/// Ordinary encounters sit within this many levels of the party average
const LEVEL_SPREAD: i32 = 2;

/// A monster or NPC combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub name: String,
    pub level: u32,
    pub max_hp: i32,
    pub hp: i32,
    pub max_mp: i32,
    pub mp: i32,
    pub attack: i32,
    pub defense: i32,
    /// XP awarded for the kill
    pub xp_value: u32,
    #[serde(default)]
    pub tier: DifficultyTier,
    #[serde(default)]
    pub strategy: EnemyStrategy,
    /// Poison damage per turn applied on hit, zero for none
    #[serde(default)]
    pub venom: i32,
    /// Drops the Ancient Ruins Key when killed
    #[serde(default)]
    pub carries_key: bool,
}

impl Creature {
    /// A plain creature at full pools
    pub fn new(name: &str, level: u32, hp: i32, mp: i32, attack: i32, defense: i32, xp_value: u32) -> Self {
        Self {
            name: name.to_string(),
            level,
            max_hp: hp,
            hp,
            max_mp: mp,
            mp,
            attack,
            defense,
            xp_value,
            tier: DifficultyTier::Normal,
            strategy: EnemyStrategy::RandomTarget,
            venom: 0,
            carries_key: false,
        }
    }

    /// A bestiary creature with stats scaled to `level`
    pub fn scaled(name: &str, level: u32) -> Self {
        let l = level.max(1) as i32;
        let mut creature = Self::new(name, level.max(1), 20 + 8 * l, 5 + 2 * l, 4 + 2 * l, 1 + l, 10 + 5 * l as u32);
        if VENOMOUS.contains(&name) {
            creature.venom = 1 + l / 4;
        }
        if CUNNING.contains(&name) {
            creature.strategy = EnemyStrategy::Weakest;
        }
        creature
    }

    /// The key-carrying elite guarding the ruins
    pub fn ruins_sentinel() -> Self {
        let mut creature = Self::new("Ruins Sentinel (Elite)", 23, 350, 80, 28, 12, 1500);
        creature.tier = DifficultyTier::Elite;
        creature.carries_key = true;
        creature
    }

    /// The final boss
    pub fn ancient_dragon() -> Self {
        let mut creature = Self::new("Ancient Dragon", 25, 600, 200, 40, 15, 2000);
        creature.tier = DifficultyTier::Boss;
        creature.strategy = EnemyStrategy::Weakest;
        creature
    }

    pub fn with_strategy(mut self, strategy: EnemyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_venom(mut self, venom: i32) -> Self {
        self.venom = venom;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Reduce HP, clamped at zero; returns HP actually lost
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let lost = amount.max(0).min(self.hp);
        self.hp -= lost;
        lost
    }
}

impl std::fmt::Display for Creature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (Lv{}) HP:{}/{}", self.name, self.level, self.hp, self.max_hp)
    }
}

/// Roll a group of 1 to 3 creatures around the party's average level
pub fn spawn_group<R: Rng + ?Sized>(party_levels: &[u32], rng: &mut R) -> Vec<Creature> {
    let average = if party_levels.is_empty() {
        1
    } else {
        (party_levels.iter().sum::<u32>() / party_levels.len() as u32).max(1)
    };
    let count = rng.random_range(1..=3);
    (0..count)
        .map(|_| {
            let level = (average as i32 + rng.random_range(-LEVEL_SPREAD..=LEVEL_SPREAD)).max(1) as u32;
            let name = BESTIARY.choose(rng).copied().unwrap_or("Skeleton");
            Creature::scaled(name, level)
        })
        .collect()
}
