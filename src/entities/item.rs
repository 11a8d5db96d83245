//! Items and weapons
//!
//! Item instances are plain values owned by exactly one inventory (a player's
//! or a merchant's) at a time. Weapons share the item shape and add combat
//! numbers and requirements. Starter weapons are bound.

use serde::{Deserialize, Serialize};

use super::PlayerClass;

/// Rarity weight at or below which a weapon counts as super-rare
pub const SUPER_RARE_WEIGHT: f64 = 0.05;

/// A weapon template or instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    /// Only this class may equip it, if set
    pub class_req: Option<PlayerClass>,
    pub level_req: u32,
    /// Added to the wielder's attack on every strike
    pub attack_bonus: i32,
    /// Drop weight; lower is rarer
    pub rarity: f64,
    /// Granted at character creation, bound to the player
    pub starter: bool,
    /// May appear in loot rolls
    pub droppable: bool,
}

impl Weapon {
    /// A droppable class weapon
    pub fn new(name: &str, class_req: PlayerClass, level_req: u32, attack_bonus: i32, rarity: f64) -> Self {
        Self {
            name: name.to_string(),
            class_req: Some(class_req),
            level_req,
            attack_bonus,
            rarity,
            starter: false,
            droppable: true,
        }
    }

    /// A bound starter weapon
    pub fn starter(name: &str, class_req: PlayerClass, attack_bonus: i32) -> Self {
        Self {
            name: name.to_string(),
            class_req: Some(class_req),
            level_req: 1,
            attack_bonus,
            rarity: 1.0,
            starter: true,
            droppable: false,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.starter
    }

    pub fn is_super_rare(&self) -> bool {
        self.rarity <= SUPER_RARE_WEIGHT
    }

    /// Price a merchant pays, None if the weapon cannot be sold
    pub fn sell_price(&self) -> Option<u32> {
        if self.is_bound() || self.is_super_rare() {
            return None;
        }
        Some(self.level_req * 10)
    }

    /// Price a merchant asks when reselling
    pub fn resell_price(&self) -> u32 {
        self.level_req * 12
    }
}

impl std::fmt::Display for Weapon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (Lv{}) [+{} atk]", self.name, self.level_req, self.attack_bonus)?;
        if self.starter {
            write!(f, " (bound)")?;
        }
        Ok(())
    }
}

/// What using a consumable does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", content = "amount", rename_all = "snake_case")]
pub enum Consumable {
    /// Restore HP to the user
    HealHp(i32),
    /// Restore MP to the user
    RestoreMp(i32),
    /// Remove debuffs from the user
    Cure,
    /// Attack bonus for a few turns
    Empower(i32),
    /// Bring a fallen teammate back at this percent of max HP
    Revive(u32),
}

/// Item category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ItemKind {
    Consumable { use_effect: Consumable },
    /// Sell-only scrap with a fixed value
    Junk { value: u32 },
    Key,
    Quest,
    /// Spent automatically by the death policy
    ReviveToken,
    Weapon { weapon: Weapon },
}

/// Protection flags carried by every item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFlags {
    /// Never traded, sold or lost
    pub bound: bool,
    /// Never sold or lost
    pub super_rare: bool,
}

/// An inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub flags: ItemFlags,
}

impl Item {
    pub fn consumable(name: &str, use_effect: Consumable) -> Self {
        Self::plain(name, ItemKind::Consumable { use_effect })
    }

    pub fn junk(name: &str, value: u32) -> Self {
        Self::plain(name, ItemKind::Junk { value })
    }

    pub fn key(name: &str) -> Self {
        Self::plain(name, ItemKind::Key)
    }

    pub fn quest(name: &str) -> Self {
        Self::plain(name, ItemKind::Quest)
    }

    pub fn revive_token() -> Self {
        Self::plain("Revive Token", ItemKind::ReviveToken)
    }

    /// Wrap a weapon; flags follow the weapon's starter and rarity
    pub fn weapon(weapon: Weapon) -> Self {
        let flags = ItemFlags {
            bound: weapon.is_bound(),
            super_rare: weapon.is_super_rare(),
        };
        Self {
            name: weapon.name.clone(),
            kind: ItemKind::Weapon { weapon },
            flags,
        }
    }

    fn plain(name: &str, kind: ItemKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            flags: ItemFlags::default(),
        }
    }

    /// Mark this item bound
    pub fn bound(mut self) -> Self {
        self.flags.bound = true;
        self
    }

    /// Mark this item super-rare
    pub fn super_rare(mut self) -> Self {
        self.flags.super_rare = true;
        self
    }

    pub fn is_bound(&self) -> bool {
        self.flags.bound || self.as_weapon().is_some_and(Weapon::is_bound)
    }

    pub fn is_super_rare(&self) -> bool {
        self.flags.super_rare || self.as_weapon().is_some_and(Weapon::is_super_rare)
    }

    pub fn is_revive_token(&self) -> bool {
        matches!(self.kind, ItemKind::ReviveToken)
    }

    /// Excluded from death-penalty item loss
    pub fn is_protected_from_loss(&self) -> bool {
        self.is_bound() || self.is_super_rare() || self.is_revive_token()
    }

    pub fn as_weapon(&self) -> Option<&Weapon> {
        match &self.kind {
            ItemKind::Weapon { weapon } => Some(weapon),
            _ => None,
        }
    }

    pub fn use_effect(&self) -> Option<Consumable> {
        match self.kind {
            ItemKind::Consumable { use_effect } => Some(use_effect),
            _ => None,
        }
    }

    /// Gold a merchant pays for this item, None if unsellable
    pub fn sell_price(&self) -> Option<u32> {
        if self.is_bound() || self.is_super_rare() {
            return None;
        }
        match &self.kind {
            ItemKind::Junk { value } => Some(*value),
            ItemKind::Weapon { weapon } => weapon.sell_price(),
            _ => None,
        }
    }

    /// Gold a merchant asks when reselling this item
    pub fn resell_price(&self) -> Option<u32> {
        match &self.kind {
            ItemKind::Junk { value } => Some(*value),
            ItemKind::Weapon { weapon } => Some(weapon.resell_price()),
            _ => None,
        }
    }

    /// Short category label for listings
    pub fn category(&self) -> &'static str {
        match self.kind {
            ItemKind::Consumable { .. } => "consumable",
            ItemKind::Junk { .. } => "junk",
            ItemKind::Key => "key",
            ItemKind::Quest => "quest",
            ItemKind::ReviveToken => "revive",
            ItemKind::Weapon { .. } => "weapon",
        }
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ItemKind::Weapon { weapon } => write!(f, "{}", weapon),
            _ => {
                write!(f, "{} ({})", self.name, self.category())?;
                if self.flags.bound {
                    write!(f, " (bound)")?;
                }
                Ok(())
            }
        }
    }
}
