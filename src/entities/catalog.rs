//! Item and weapon templates
//!
//! The catalog is the single source of weapon templates. Saves refer to the
//! equipped weapon by template name and resolve it here on load.

use super::item::{Consumable, Item, Weapon};
use super::PlayerClass;

/// Name of the key dropped by the elite
pub const KEY_ITEM_NAME: &str = "Ancient Ruins Key";

/// Weapon templates grouped by class
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    warrior: Vec<Weapon>,
    mage: Vec<Weapon>,
    ranger: Vec<Weapon>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The five-per-class weapon set; the last of each is super-rare
    pub fn standard() -> Self {
        use PlayerClass::*;
        Self {
            warrior: vec![
                Weapon::new("Iron Longsword", Warrior, 5, 8, 0.9),
                Weapon::new("Steel Cleaver", Warrior, 7, 11, 0.6),
                Weapon::new("Berserker Axe", Warrior, 10, 16, 0.4),
                Weapon::new("Guardian Blade", Warrior, 12, 18, 0.2),
                Weapon::new("Heartseeker, Ancient", Warrior, 18, 28, 0.05),
            ],
            mage: vec![
                Weapon::new("Oak Staff", Mage, 5, 6, 0.9),
                Weapon::new("Crystal Wand", Mage, 7, 9, 0.6),
                Weapon::new("Starlit Rod", Mage, 10, 13, 0.4),
                Weapon::new("Rune Scepter", Mage, 13, 17, 0.2),
                Weapon::new("Archmage Focus", Mage, 18, 27, 0.05),
            ],
            ranger: vec![
                Weapon::new("Shortbow", Ranger, 5, 7, 0.9),
                Weapon::new("Composite Bow", Ranger, 8, 10, 0.6),
                Weapon::new("Windrunner", Ranger, 11, 14, 0.4),
                Weapon::new("Hawkstrike", Ranger, 14, 18, 0.2),
                Weapon::new("Eagle of Dathen", Ranger, 18, 25, 0.05),
            ],
        }
    }

    /// Bound weapon every new character starts with
    pub fn starter_weapon(class: PlayerClass) -> Weapon {
        match class {
            PlayerClass::Warrior => Weapon::starter("Rusty Sword", PlayerClass::Warrior, 2),
            PlayerClass::Mage => Weapon::starter("Basic Staff", PlayerClass::Mage, 2),
            PlayerClass::Ranger => Weapon::starter("Basic Bow", PlayerClass::Ranger, 2),
        }
    }

    /// Droppable weapons for one class
    pub fn weapons_for(&self, class: PlayerClass) -> &[Weapon] {
        match class {
            PlayerClass::Warrior => &self.warrior,
            PlayerClass::Mage => &self.mage,
            PlayerClass::Ranger => &self.ranger,
        }
    }

    pub fn all_weapons(&self) -> impl Iterator<Item = &Weapon> {
        self.warrior.iter().chain(&self.mage).chain(&self.ranger)
    }

    /// Resolve a weapon template (droppable or starter) by name
    pub fn weapon(&self, name: &str) -> Option<Weapon> {
        self.all_weapons()
            .find(|w| w.name == name)
            .cloned()
            .or_else(|| {
                PlayerClass::ALL
                    .into_iter()
                    .map(Self::starter_weapon)
                    .find(|w| w.name == name)
            })
    }

    pub fn lesser_health_potion() -> Item {
        Item::consumable("Lesser Health Potion", Consumable::HealHp(25))
    }

    pub fn greater_health_potion() -> Item {
        Item::consumable("Greater Health Potion", Consumable::HealHp(50))
    }

    pub fn lesser_mana_potion() -> Item {
        Item::consumable("Lesser Mana Potion", Consumable::RestoreMp(25))
    }

    pub fn greater_mana_potion() -> Item {
        Item::consumable("Greater Mana Potion", Consumable::RestoreMp(60))
    }

    pub fn antidote() -> Item {
        Item::consumable("Antidote", Consumable::Cure)
    }

    pub fn war_tonic() -> Item {
        Item::consumable("War Tonic", Consumable::Empower(5))
    }

    /// Revives a fallen teammate mid-fight
    pub fn phoenix_feather() -> Item {
        Item::consumable("Phoenix Feather", Consumable::Revive(30))
    }

    /// Bronze, silver and gold scrap, cheapest first
    pub fn junk() -> [Item; 3] {
        [
            Item::junk("Bronze Scrap", 2),
            Item::junk("Silver Rock", 5),
            Item::junk("Gold Clump", 10),
        ]
    }

    pub fn ruins_key() -> Item {
        Item::key(KEY_ITEM_NAME)
    }

    /// What a merchant sells at the start of a game
    pub fn merchant_stock() -> Vec<(Item, u32)> {
        vec![
            (Self::lesser_health_potion(), 30),
            (Self::greater_health_potion(), 80),
            (Self::lesser_mana_potion(), 35),
            (Self::greater_mana_potion(), 90),
            (Item::revive_token(), 300),
        ]
    }
}
