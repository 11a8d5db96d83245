//! Game configuration
//!
//! Tunable rules (class stats, XP curve, loot odds, death penalties) live in
//! one immutable [`GameConfig`] that is passed by reference into the engine.
//! Sources are layered with figment: built-in defaults, then an optional TOML
//! file, then `RUINCRAWL_*` environment variables (nested keys split on `__`).

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::DiceRoll;
use crate::entities::{DifficultyTier, PlayerClass};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "RUINCRAWL_";

/// Default inventory size for every player
pub const INVENTORY_CAPACITY: usize = 30;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A block of the four core stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub hp: i32,
    pub mp: i32,
    pub attack: i32,
    pub defense: i32,
}

impl StatLine {
    pub const fn new(hp: i32, mp: i32, attack: i32, defense: i32) -> Self {
        Self { hp, mp, attack, defense }
    }
}

/// Class special ability parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialConfig {
    /// Display name ("Cleave", "Arcane Burst", ...)
    pub name: String,
    /// MP spent on use
    pub mp_cost: i32,
    /// Attack multiplier in tenths (18 = 1.8x)
    pub multiplier_tenths: i32,
    /// Bonus damage rolled on top of the scaled attack
    pub bonus: DiceRoll,
    /// Hits every living enemy instead of one random target
    pub area: bool,
}

/// Per-class stats: value at level L is `base + gain * L`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProfile {
    pub base: StatLine,
    pub gain: StatLine,
    pub special: SpecialConfig,
}

impl ClassProfile {
    /// Stats for a fresh character of this class at `level`
    pub fn stats_at(&self, level: u32) -> StatLine {
        let l = level as i32;
        StatLine {
            hp: self.base.hp + self.gain.hp * l,
            mp: self.base.mp + self.gain.mp * l,
            attack: self.base.attack + self.gain.attack * l,
            defense: self.base.defense + self.gain.defense * l,
        }
    }
}

/// Class table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassTable {
    pub warrior: ClassProfile,
    pub mage: ClassProfile,
    pub ranger: ClassProfile,
}

impl ClassTable {
    pub fn profile(&self, class: PlayerClass) -> &ClassProfile {
        match class {
            PlayerClass::Warrior => &self.warrior,
            PlayerClass::Mage => &self.mage,
            PlayerClass::Ranger => &self.ranger,
        }
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self {
            warrior: ClassProfile {
                base: StatLine::new(80, 20, 12, 8),
                gain: StatLine::new(10, 2, 2, 1),
                special: SpecialConfig {
                    name: "Cleave".to_string(),
                    mp_cost: 6,
                    multiplier_tenths: 18,
                    bonus: DiceRoll::new(1, 5, -1),
                    area: false,
                },
            },
            mage: ClassProfile {
                base: StatLine::new(50, 80, 8, 4),
                gain: StatLine::new(6, 8, 1, 0),
                special: SpecialConfig {
                    name: "Arcane Burst".to_string(),
                    mp_cost: 8,
                    multiplier_tenths: 12,
                    bonus: DiceRoll::new(1, 5, 2),
                    area: true,
                },
            },
            ranger: ClassProfile {
                base: StatLine::new(65, 40, 11, 6),
                gain: StatLine::new(8, 4, 1, 1),
                special: SpecialConfig {
                    name: "Piercing Shot".to_string(),
                    mp_cost: 5,
                    multiplier_tenths: 16,
                    bonus: DiceRoll::new(1, 5, 0),
                    area: false,
                },
            },
        }
    }
}

/// XP curve and level bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// XP needed for the next level is `xp_multiplier * level`
    pub xp_multiplier: u32,
    pub max_level: u32,
    pub start_level: u32,
}

impl ProgressionConfig {
    /// XP required to advance from `level` to `level + 1`
    pub fn required_xp(&self, level: u32) -> u32 {
        self.xp_multiplier.saturating_mul(level.max(1))
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_multiplier: 30,
            max_level: 25,
            start_level: 5,
        }
    }
}

/// Combat tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatConfig {
    /// Probability that Run succeeds
    pub flee_chance: f64,
    /// Ask y/n before fleeing or using an item
    pub confirm_actions: bool,
    /// Turns a poison lasts once applied
    pub poison_turns: u32,
    /// Turns an attack buff lasts once applied
    pub buff_turns: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            flee_chance: 0.6,
            confirm_actions: false,
            poison_turns: 3,
            buff_turns: 3,
        }
    }
}

/// Inclusive gold range, optionally multiplied by creature level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldRange {
    pub min: u32,
    pub max: u32,
    pub per_level: bool,
}

impl GoldRange {
    pub const fn new(min: u32, max: u32, per_level: bool) -> Self {
        Self { min, max, per_level }
    }

    /// Roll an amount for a creature (or party) of `level`
    pub fn roll<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> u32 {
        let base = if self.max > self.min {
            rng.random_range(self.min..=self.max)
        } else {
            self.min
        };
        if self.per_level {
            base.saturating_mul(level.max(1))
        } else {
            base
        }
    }
}

/// Gold ranges per difficulty tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldTiers {
    pub normal: GoldRange,
    pub elite: GoldRange,
    pub boss: GoldRange,
}

impl GoldTiers {
    pub fn range(&self, tier: DifficultyTier) -> GoldRange {
        match tier {
            DifficultyTier::Normal => self.normal,
            DifficultyTier::Elite => self.elite,
            DifficultyTier::Boss => self.boss,
        }
    }
}

impl Default for GoldTiers {
    fn default() -> Self {
        Self {
            normal: GoldRange::new(5, 15, true),
            elite: GoldRange::new(20, 40, true),
            boss: GoldRange::new(500, 500, false),
        }
    }
}

/// Loot odds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootConfig {
    /// Chance a kill drops a weapon
    pub weapon_drop_chance: f64,
    /// Chance a kill without a weapon drop yields junk
    pub junk_drop_chance: f64,
    /// Chance a kill without weapon or junk yields a consumable
    pub consumable_drop_chance: f64,
    /// Weapons within this many levels of the creature are preferred
    pub level_window: u32,
    /// Rolls per chest
    pub chest_rolls: usize,
    pub gold: GoldTiers,
    /// Gold pouch found in chests
    pub chest_gold: GoldRange,
    /// Bronze, silver, gold scrap weights
    pub junk_weights: [f64; 3],
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            weapon_drop_chance: 0.30,
            junk_drop_chance: 0.35,
            consumable_drop_chance: 0.25,
            level_window: 6,
            chest_rolls: 2,
            gold: GoldTiers::default(),
            chest_gold: GoldRange::new(30, 120, false),
            junk_weights: [60.0, 30.0, 10.0],
        }
    }
}

/// Death and revive penalties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathConfig {
    /// Gold lost per death is `min(death_count, gold_penalty_cap)`
    pub gold_penalty_cap: u32,
    pub items_lost_min: usize,
    pub items_lost_max: usize,
    /// HP restored by a Revive Token, percent of max
    pub revive_hp_percent: u32,
    /// HP after respawning without a token, percent of max
    pub respawn_hp_percent: u32,
}

impl Default for DeathConfig {
    fn default() -> Self {
        Self {
            gold_penalty_cap: 30,
            items_lost_min: 1,
            items_lost_max: 3,
            revive_hp_percent: 50,
            respawn_hp_percent: 50,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub inventory_capacity: usize,
    pub classes: ClassTable,
    pub progression: ProgressionConfig,
    pub combat: CombatConfig,
    pub loot: LootConfig,
    pub death: DeathConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            inventory_capacity: INVENTORY_CAPACITY,
            classes: ClassTable::default(),
            progression: ProgressionConfig::default(),
            combat: CombatConfig::default(),
            loot: LootConfig::default(),
            death: DeathConfig::default(),
        }
    }
}

impl GameConfig {
    /// Build the layered figment: defaults, optional TOML file, environment
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(GameConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate configuration
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: GameConfig = Self::figment(path).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probability = |name: &str, p: f64| {
            if (0.0..=1.0).contains(&p) {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{} must be within 0..=1, got {}", name, p)))
            }
        };
        probability("combat.flee_chance", self.combat.flee_chance)?;
        probability("loot.weapon_drop_chance", self.loot.weapon_drop_chance)?;
        probability("loot.junk_drop_chance", self.loot.junk_drop_chance)?;
        probability("loot.consumable_drop_chance", self.loot.consumable_drop_chance)?;

        if self.inventory_capacity == 0 {
            return Err(ConfigError::Invalid("inventory_capacity must be positive".into()));
        }
        if self.progression.xp_multiplier == 0 {
            return Err(ConfigError::Invalid("progression.xp_multiplier must be positive".into()));
        }
        if self.progression.start_level == 0
            || self.progression.start_level > self.progression.max_level
        {
            return Err(ConfigError::Invalid(format!(
                "progression.start_level {} must be within 1..={}",
                self.progression.start_level, self.progression.max_level
            )));
        }
        if self.death.items_lost_min > self.death.items_lost_max {
            return Err(ConfigError::Invalid(
                "death.items_lost_min cannot exceed death.items_lost_max".into(),
            ));
        }
        if self.loot.junk_weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Invalid("loot.junk_weights must be non-negative".into()));
        }
        for range in [
            self.loot.gold.normal,
            self.loot.gold.elite,
            self.loot.gold.boss,
            self.loot.chest_gold,
        ] {
            if range.min > range.max {
                return Err(ConfigError::Invalid(format!(
                    "gold range {}..={} is empty",
                    range.min, range.max
                )));
            }
        }
        Ok(())
    }
}
