//! Entity model
//!
//! Records for everything the engine mutates:
//! - Items, weapons and consumables
//! - Inventories with a fixed slot capacity
//! - Players (class, level, XP, gold, pools, equipment)
//! - Creatures and the bestiary that spawns them
//! - The catalog of weapon and item templates

mod catalog;
mod creature;
mod inventory;
mod item;
mod player;

pub use catalog::{Catalog, KEY_ITEM_NAME};
pub use creature::{spawn_group, Creature};
pub use inventory::{Inventory, InventoryError};
pub use item::{Consumable, Item, ItemFlags, ItemKind, Weapon, SUPER_RARE_WEIGHT};
pub use player::{validate_name, NameError, Player};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Playable classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerClass {
    Warrior,
    Mage,
    Ranger,
}

impl PlayerClass {
    pub const ALL: [PlayerClass; 3] = [PlayerClass::Warrior, PlayerClass::Mage, PlayerClass::Ranger];
}

impl FromStr for PlayerClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warrior" | "w" | "1" => Ok(PlayerClass::Warrior),
            "mage" | "m" | "2" => Ok(PlayerClass::Mage),
            "ranger" | "r" | "3" => Ok(PlayerClass::Ranger),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for PlayerClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlayerClass::Warrior => "Warrior",
            PlayerClass::Mage => "Mage",
            PlayerClass::Ranger => "Ranger",
        };
        write!(f, "{}", s)
    }
}

/// Encounter difficulty; selects the gold range of a kill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    #[default]
    Normal,
    Elite,
    Boss,
}

impl std::fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DifficultyTier::Normal => "normal",
            DifficultyTier::Elite => "elite",
            DifficultyTier::Boss => "boss",
        };
        write!(f, "{}", s)
    }
}
