//! Player characters
//!
//! A player owns its pools, gold, equipped weapon and inventory outright.
//! New characters start at the configured level with their class's bound
//! starter weapon equipped (it is not placed in the inventory).

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use uuid::Uuid;

use super::catalog::Catalog;
use super::inventory::{Inventory, InventoryError};
use super::item::{Item, Weapon};
use super::PlayerClass;
use crate::config::{GameConfig, StatLine};

/// Letter first, then up to 23 letters, digits, spaces, `_`, `'` or `-`
static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9 _'-]{0,23}$").expect("valid regex"));

/// Rejected player names
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("name cannot be empty")]
    Empty,

    #[error("invalid name {0:?}: start with a letter, at most 24 characters of letters, digits, spaces, _ ' -")]
    Invalid(String),
}

/// Validate and trim a player name
pub fn validate_name(name: &str) -> Result<String, NameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if !NAME_REGEX.is_match(name) {
        return Err(NameError::Invalid(name.to_string()));
    }
    Ok(name.to_string())
}

/// A player character
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub class: PlayerClass,
    pub level: u32,
    /// Progress toward the next level
    pub xp: u32,
    pub gold: u32,
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub attack: i32,
    pub defense: i32,
    pub weapon: Option<Weapon>,
    pub inventory: Inventory,
    /// Deaths without a Revive Token; never decreases
    pub death_count: u32,
}

impl Player {
    /// Create a fresh character at the configured start level
    pub fn new(name: &str, class: PlayerClass, config: &GameConfig) -> Result<Self, NameError> {
        let name = validate_name(name)?;
        let level = config.progression.start_level;
        let stats = config.classes.profile(class).stats_at(level);
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            class,
            level,
            xp: 0,
            gold: 0,
            hp: stats.hp,
            max_hp: stats.hp,
            mp: stats.mp,
            max_mp: stats.mp,
            attack: stats.attack,
            defense: stats.defense,
            weapon: Some(Catalog::starter_weapon(class)),
            inventory: Inventory::new(config.inventory_capacity),
            death_count: 0,
        })
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn weapon_bonus(&self) -> i32 {
        self.weapon.as_ref().map_or(0, |w| w.attack_bonus)
    }

    /// Reduce HP, clamped at zero; returns HP actually lost
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let lost = amount.max(0).min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Restore HP up to max; returns HP actually gained
    pub fn heal(&mut self, amount: i32) -> i32 {
        let gained = amount.max(0).min(self.max_hp - self.hp);
        self.hp += gained;
        gained
    }

    /// Restore MP up to max; returns MP actually gained
    pub fn restore_mp(&mut self, amount: i32) -> i32 {
        let gained = amount.max(0).min(self.max_mp - self.mp);
        self.mp += gained;
        gained
    }

    /// Spend MP if there is enough; nothing changes otherwise
    pub fn spend_mp(&mut self, cost: i32) -> bool {
        if self.mp < cost {
            return false;
        }
        self.mp -= cost;
        true
    }

    /// Set HP to a percentage of max (at least 1)
    pub fn restore_to_percent(&mut self, percent: u32) {
        self.hp = percent_of(self.max_hp, percent);
    }

    /// Apply one level's worth of class gains and refill both pools
    pub fn apply_level_gain(&mut self, gain: &StatLine) {
        self.max_hp += gain.hp;
        self.max_mp += gain.mp;
        self.attack += gain.attack;
        self.defense += gain.defense;
        self.hp = self.max_hp;
        self.mp = self.max_mp;
    }

    /// Remove up to `amount` gold; returns gold actually removed
    pub fn lose_gold(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.gold);
        self.gold -= lost;
        lost
    }

    /// Check class and level requirements for a weapon
    pub fn can_equip(&self, weapon: &Weapon) -> Result<(), InventoryError> {
        if let Some(class) = weapon.class_req {
            if class != self.class {
                return Err(InventoryError::RequirementUnmet {
                    name: weapon.name.clone(),
                    reason: format!("{} only", class),
                });
            }
        }
        if self.level < weapon.level_req {
            return Err(InventoryError::RequirementUnmet {
                name: weapon.name.clone(),
                reason: format!("requires level {}", weapon.level_req),
            });
        }
        Ok(())
    }

    /// Equip the weapon in inventory slot `index`
    ///
    /// The previously equipped weapon takes the vacated slot. Returns its
    /// name, if there was one.
    pub fn equip(&mut self, index: usize) -> Result<Option<String>, InventoryError> {
        let item = self
            .inventory
            .get(index)
            .ok_or(InventoryError::InvalidIndex(index))?;
        let weapon = item
            .as_weapon()
            .ok_or_else(|| InventoryError::NotAWeapon(item.name.clone()))?
            .clone();
        self.can_equip(&weapon)?;

        let previous = self.weapon.take();
        let previous_name = previous.as_ref().map(|w| w.name.clone());
        match previous {
            Some(old) => {
                self.inventory.replace(index, Item::weapon(old))?;
            }
            None => {
                self.inventory.remove(index)?;
            }
        }
        self.weapon = Some(weapon);
        Ok(previous_name)
    }

    /// One-line status for listings
    pub fn status_line(&self) -> String {
        format!(
            "{} the {} (Lv{}) HP {}/{} MP {}/{} XP {} Gold {}",
            self.name,
            self.class,
            self.level,
            self.hp,
            self.max_hp,
            self.mp,
            self.max_mp,
            self.xp,
            self.gold
        )
    }
}

/// `max * percent / 100`, never below 1
pub(crate) fn percent_of(max: i32, percent: u32) -> i32 {
    (max.saturating_mul(percent as i32) / 100).max(1)
}
