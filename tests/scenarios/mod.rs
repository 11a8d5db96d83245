//! Scenario tests for ruincrawl
//!
//! Whole-engine play scenarios covering:
//! - Combat: turn flow, targeting, fleeing, defeat and poison
//! - Progression: XP splits, carry-over and level caps
//! - Death: revive tokens, gold and item penalties
//! - Loot: drop rates, tiers, keys and chests
//! - Persistence: save and load round trips
//! - Trade: merchant, gifts and equipment between encounters

pub mod combat;
pub mod death;
pub mod loot;
pub mod persistence;
pub mod progression;
pub mod trade;
