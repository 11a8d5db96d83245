//! Loot generation
//!
//! - Generic weighted rarity tables
//! - Kill drops: tiered gold, weapons near the creature's level, junk and consumables
//! - Chest contents

mod generator;
mod table;

pub use generator::{ChestRoll, LootDrop, LootGenerator};
pub use table::{LootEntry, LootTable};
