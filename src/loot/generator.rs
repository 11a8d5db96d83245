//! Kill drops and chest contents
//!
//! All rolls are pure functions of the configuration, the catalog and the
//! caller's generator. [`LootDrop::award_to`] hands a result to a player.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use super::table::LootTable;
use crate::config::LootConfig;
use crate::entities::{
    Catalog, Creature, DifficultyTier, InventoryError, Item, Player, PlayerClass, Weapon,
};

/// One unit of loot
#[derive(Debug, Clone, PartialEq)]
pub enum LootDrop {
    Item(Item),
    Gold(u32),
}

impl std::fmt::Display for LootDrop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LootDrop::Item(item) => write!(f, "{}", item),
            LootDrop::Gold(amount) => write!(f, "{} gold", amount),
        }
    }
}

impl LootDrop {
    /// Give this drop to `player`
    ///
    /// Returns whether it was accepted and the line to show. Items that do
    /// not fit stay out of the inventory.
    pub fn award_to(&self, player: &mut Player) -> (bool, String) {
        match self {
            LootDrop::Gold(amount) => {
                player.gold = player.gold.saturating_add(*amount);
                (true, format!("{} picks up {} gold.", player.name, amount))
            }
            LootDrop::Item(item) => match player.inventory.add(item.clone()) {
                Ok(()) => (true, format!("{} receives {}.", player.name, item)),
                Err(InventoryError::Full { rejected, .. }) => (
                    false,
                    format!("{}'s inventory is full; {} is left behind.", player.name, rejected.name),
                ),
                Err(e) => (false, format!("{}: {}", item.name, e)),
            },
        }
    }
}

/// Chest table rows
#[derive(Debug, Clone, PartialEq)]
pub enum ChestRoll {
    /// A level-appropriate weapon
    Weapon,
    Item(Item),
    GoldPouch,
    Junk,
}

/// Rolls loot against a configuration and template catalog
pub struct LootGenerator<'a> {
    config: &'a LootConfig,
    catalog: &'a Catalog,
    junk: LootTable<Item>,
    consumables: LootTable<Item>,
    chest: LootTable<ChestRoll>,
}

impl<'a> LootGenerator<'a> {
    pub fn new(config: &'a LootConfig, catalog: &'a Catalog) -> Self {
        let [bronze, silver, gold] = Catalog::junk();
        let [w_bronze, w_silver, w_gold] = config.junk_weights;
        let junk = LootTable::new()
            .with(bronze, w_bronze)
            .with(silver, w_silver)
            .with(gold, w_gold);

        let consumables = LootTable::new()
            .with(Catalog::lesser_health_potion(), 40.0)
            .with(Catalog::lesser_mana_potion(), 25.0)
            .with(Catalog::greater_health_potion(), 12.0)
            .with(Catalog::antidote(), 12.0)
            .with(Catalog::war_tonic(), 8.0)
            .with(Catalog::phoenix_feather(), 3.0);

        let chest = LootTable::new()
            .with_unique(ChestRoll::Weapon, 40.0)
            .with(ChestRoll::Item(Catalog::greater_health_potion()), 25.0)
            .with(ChestRoll::Item(Catalog::lesser_mana_potion()), 15.0)
            .with_unique(ChestRoll::GoldPouch, 25.0)
            .with(ChestRoll::Junk, 15.0);

        Self {
            config,
            catalog,
            junk,
            consumables,
            chest,
        }
    }

    /// Rarity-weighted table of one class's weapons near `level`
    ///
    /// Falls back to the whole pool when nothing is within the window.
    pub fn weapon_table(&self, class: PlayerClass, level: u32) -> LootTable<Weapon> {
        let pool = self.catalog.weapons_for(class);
        let window = self.config.level_window;
        let near: Vec<&Weapon> = pool
            .iter()
            .filter(|w| w.droppable && w.level_req.abs_diff(level) <= window)
            .collect();
        let candidates: Vec<&Weapon> = if near.is_empty() {
            pool.iter().filter(|w| w.droppable).collect()
        } else {
            near
        };
        candidates
            .into_iter()
            .fold(LootTable::new(), |table, w| table.with(w.clone(), w.rarity))
    }

    /// A weapon from a random class pool, ignoring the drop chance
    pub fn roll_weapon<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> Option<Weapon> {
        let class = *PlayerClass::ALL.choose(rng)?;
        self.weapon_table(class, level).roll_cloned(rng)
    }

    pub fn roll_junk<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Item> {
        self.junk.roll_cloned(rng)
    }

    pub fn roll_consumable<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Item> {
        self.consumables.roll_cloned(rng)
    }

    pub fn roll_gold<R: Rng + ?Sized>(&self, tier: DifficultyTier, level: u32, rng: &mut R) -> u32 {
        self.config.gold.range(tier).roll(level, rng)
    }

    /// Everything one defeated creature leaves behind
    pub fn kill_drops<R: Rng + ?Sized>(&self, creature: &Creature, rng: &mut R) -> Vec<LootDrop> {
        let mut drops = vec![LootDrop::Gold(self.roll_gold(creature.tier, creature.level, rng))];

        if creature.carries_key {
            drops.push(LootDrop::Item(Catalog::ruins_key()));
        }

        if rng.random_bool(self.config.weapon_drop_chance) {
            if let Some(weapon) = self.roll_weapon(creature.level, rng) {
                drops.push(LootDrop::Item(Item::weapon(weapon)));
            }
        } else if rng.random_bool(self.config.junk_drop_chance) {
            drops.extend(self.roll_junk(rng).map(LootDrop::Item));
        } else if rng.random_bool(self.config.consumable_drop_chance) {
            drops.extend(self.roll_consumable(rng).map(LootDrop::Item));
        }

        debug!(creature = %creature.name, drops = drops.len(), "kill drops rolled");
        drops
    }

    /// Contents of one chest for a party with the given levels
    pub fn chest<R: Rng + ?Sized>(&self, party_levels: &[u32], rng: &mut R) -> Vec<LootDrop> {
        let level = if party_levels.is_empty() {
            1
        } else {
            (party_levels.iter().sum::<u32>() / party_levels.len() as u32).max(1)
        };

        let rolls = self.chest.roll_many(self.config.chest_rolls, rng);
        let mut drops = Vec::with_capacity(rolls.len());
        for roll in rolls {
            let drop = match roll {
                ChestRoll::Weapon => self.roll_weapon(level, rng).map(|w| LootDrop::Item(Item::weapon(w))),
                ChestRoll::Item(item) => Some(LootDrop::Item(item.clone())),
                ChestRoll::GoldPouch => Some(LootDrop::Gold(self.config.chest_gold.roll(level, rng))),
                ChestRoll::Junk => self.roll_junk(rng).map(LootDrop::Item),
            };
            drops.extend(drop);
        }
        debug!(level, drops = drops.len(), "chest rolled");
        drops
    }
}
