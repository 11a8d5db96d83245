//! Plain-record snapshots of game state
//!
//! Records hold only data: the equipped weapon is stored by template name
//! and resolved through the [`Catalog`] when the record is turned back into
//! a live [`Player`]. Every check runs before a live value is built.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SaveError;
use crate::config::GameConfig;
use crate::entities::{validate_name, Catalog, Inventory, Item, Player, PlayerClass};
use crate::trade::{Merchant, StockEntry};

/// Saved player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: Uuid,
    pub name: String,
    pub class: PlayerClass,
    pub level: u32,
    pub xp: u32,
    pub gold: u32,
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub attack: i32,
    pub defense: i32,
    /// Template name of the equipped weapon
    pub weapon: Option<String>,
    pub inventory: Vec<Item>,
    pub death_count: u32,
}

impl PlayerRecord {
    pub fn capture(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            class: player.class,
            level: player.level,
            xp: player.xp,
            gold: player.gold,
            hp: player.hp,
            max_hp: player.max_hp,
            mp: player.mp,
            max_mp: player.max_mp,
            attack: player.attack,
            defense: player.defense,
            weapon: player.weapon.as_ref().map(|w| w.name.clone()),
            inventory: player.inventory.items().to_vec(),
            death_count: player.death_count,
        }
    }

    fn invalid(&self, reason: impl Into<String>) -> SaveError {
        SaveError::InvalidRecord {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Rebuild a live player, validating every field first
    pub fn restore(self, catalog: &Catalog, config: &GameConfig) -> Result<Player, SaveError> {
        let name = validate_name(&self.name).map_err(|e| self.invalid(e.to_string()))?;

        let progression = &config.progression;
        if self.level == 0 || self.level > progression.max_level {
            return Err(self.invalid(format!(
                "level {} outside 1..={}",
                self.level, progression.max_level
            )));
        }
        if self.level < progression.max_level && self.xp >= progression.required_xp(self.level) {
            return Err(self.invalid(format!(
                "xp {} already reaches level {}",
                self.xp,
                self.level + 1
            )));
        }
        if self.max_hp <= 0 || self.hp < 0 || self.hp > self.max_hp {
            return Err(self.invalid(format!("hp {}/{} out of range", self.hp, self.max_hp)));
        }
        if self.max_mp < 0 || self.mp < 0 || self.mp > self.max_mp {
            return Err(self.invalid(format!("mp {}/{} out of range", self.mp, self.max_mp)));
        }

        let weapon = match &self.weapon {
            Some(template) => Some(
                catalog
                    .weapon(template)
                    .ok_or_else(|| SaveError::UnknownWeapon(template.clone()))?,
            ),
            None => None,
        };
        let inventory = Inventory::from_items(self.inventory.clone(), config.inventory_capacity)
            .map_err(|e| self.invalid(e.to_string()))?;

        Ok(Player {
            id: self.id,
            name,
            class: self.class,
            level: self.level,
            xp: self.xp,
            gold: self.gold,
            hp: self.hp,
            max_hp: self.max_hp,
            mp: self.mp,
            max_mp: self.max_mp,
            attack: self.attack,
            defense: self.defense,
            weapon,
            inventory,
            death_count: self.death_count,
        })
    }
}

/// Saved merchant stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MerchantRecord {
    pub stock: Vec<StockEntry>,
}

impl MerchantRecord {
    pub fn capture(merchant: &Merchant) -> Self {
        Self {
            stock: merchant.stock().to_vec(),
        }
    }

    pub fn restore(self) -> Merchant {
        Merchant::new(self.stock)
    }
}

/// Everything a save file holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<PlayerRecord>,
    #[serde(default)]
    pub merchant: MerchantRecord,
}

impl GameState {
    pub fn capture(players: &[&Player], merchant: &Merchant) -> Self {
        Self {
            players: players.iter().map(|p| PlayerRecord::capture(p)).collect(),
            merchant: MerchantRecord::capture(merchant),
        }
    }

    /// Rebuild players and merchant; fails as a whole if any record is bad
    pub fn restore(
        self,
        catalog: &Catalog,
        config: &GameConfig,
    ) -> Result<(Vec<Player>, Merchant), SaveError> {
        if self.players.is_empty() {
            return Err(SaveError::InvalidRecord {
                name: "<party>".to_string(),
                reason: "no players".to_string(),
            });
        }
        let players = self
            .players
            .into_iter()
            .map(|record| record.restore(catalog, config))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((players, self.merchant.restore()))
    }
}
