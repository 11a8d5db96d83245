//! Combat system module
//!
//! Turn-based encounters between a party and a group of creatures:
//! - Dice rolling (e.g., "1d5+2")
//! - Strike and special damage, halved while defending
//! - Status effects (defending, poisoned, empowered)
//! - Enemy target selection strategies
//! - The combat session state machine and its outcome report

mod ai;
mod damage;
mod dice;
mod effects;
mod session;
mod state;

pub use ai::{EnemyStrategy, TargetCandidate};
pub use damage::{special_damage, strike_damage, DamageKind, DamageModifier, DamageResult};
pub use dice::{DiceError, DiceRoll};
pub use effects::{EffectRegistry, EffectType, StatusEffect, TurnStart};
pub use session::{ActionError, CombatReport, CombatSession, LootAward, SessionError};
pub use state::{Combatant, Outcome, Phase, PlayerAction};
