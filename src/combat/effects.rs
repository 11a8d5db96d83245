//! Status effects
//!
//! Temporary effects on combatants during a session:
//! - Defending: halves the next hit, or drops unused at the start of the owner's next turn
//! - Poisoned: damage at the start of each of the owner's turns
//! - Empowered: bonus attack while active

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::state::Combatant;

/// Kinds of temporary effect a combatant can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    /// Braced for the next hit
    Defending,
    /// Takes damage at turn start
    Poisoned,
    /// Increased attack
    Empowered,
}

impl EffectType {
    /// Whether this effect is negative (cured by an antidote)
    pub fn is_debuff(&self) -> bool {
        matches!(self, EffectType::Poisoned)
    }
}

impl std::fmt::Display for EffectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EffectType::Defending => "defending",
            EffectType::Poisoned => "poisoned",
            EffectType::Empowered => "empowered",
        };
        write!(f, "{}", s)
    }
}

/// One active effect with its remaining duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEffect {
    pub effect_type: EffectType,
    /// Owner turns left; Defending uses 1 and is dropped on the next turn start
    pub remaining_turns: u32,
    /// Damage per turn (Poisoned) or attack bonus (Empowered)
    pub magnitude: i32,
}

impl StatusEffect {
    pub fn new(effect_type: EffectType, turns: u32, magnitude: i32) -> Self {
        Self {
            effect_type,
            remaining_turns: turns,
            magnitude,
        }
    }

    /// One-turn defend stance
    pub fn defending() -> Self {
        Self::new(EffectType::Defending, 1, 0)
    }

    pub fn poisoned(turns: u32, damage: i32) -> Self {
        Self::new(EffectType::Poisoned, turns, damage)
    }

    pub fn empowered(turns: u32, bonus: i32) -> Self {
        Self::new(EffectType::Empowered, turns, bonus)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_turns == 0
    }
}

/// What happened when a combatant's turn began
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnStart {
    /// Poison damage to apply before the combatant acts
    pub poison_damage: i32,
    /// Effects that wore off
    pub expired: Vec<EffectType>,
}

/// Effects on a single combatant
#[derive(Debug, Clone, Default)]
pub struct EntityEffects {
    effects: Vec<StatusEffect>,
}

impl EntityEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect, refreshing duration and magnitude if already present
    pub fn add(&mut self, effect: StatusEffect) {
        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|e| e.effect_type == effect.effect_type)
        {
            existing.remaining_turns = existing.remaining_turns.max(effect.remaining_turns);
            existing.magnitude = existing.magnitude.max(effect.magnitude);
        } else {
            self.effects.push(effect);
        }
    }

    pub fn has(&self, effect_type: EffectType) -> bool {
        self.effects
            .iter()
            .any(|e| e.effect_type == effect_type && !e.is_expired())
    }

    pub fn get(&self, effect_type: EffectType) -> Option<&StatusEffect> {
        self.effects
            .iter()
            .find(|e| e.effect_type == effect_type && !e.is_expired())
    }

    /// Remove an active effect that is used up on its first trigger
    pub fn consume(&mut self, effect_type: EffectType) -> bool {
        match self.effects.iter().position(|e| e.effect_type == effect_type && !e.is_expired()) {
            Some(index) => {
                self.effects.remove(index);
                true
            }
            None => false,
        }
    }

    /// Start-of-turn processing: Defending drops, poison deals damage, timers run down
    pub fn begin_turn(&mut self) -> TurnStart {
        let mut start = TurnStart::default();

        for effect in &mut self.effects {
            match effect.effect_type {
                EffectType::Defending => effect.remaining_turns = 0,
                EffectType::Poisoned => {
                    start.poison_damage += effect.magnitude;
                    effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
                }
                EffectType::Empowered => {
                    effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
                }
            }
            if effect.is_expired() {
                start.expired.push(effect.effect_type);
            }
        }

        self.effects.retain(|e| !e.is_expired());
        start
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Drop poison and other debuffs; true if anything was removed
    pub fn clear_debuffs(&mut self) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| !e.effect_type.is_debuff());
        self.effects.len() != before
    }
}

/// Effects for every combatant in a session
#[derive(Debug, Default)]
pub struct EffectRegistry {
    entities: HashMap<Combatant, EntityEffects>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_effect(&mut self, who: Combatant, effect: StatusEffect) {
        debug!(?who, effect = %effect.effect_type, turns = effect.remaining_turns, "effect applied");
        self.entities.entry(who).or_default().add(effect);
    }

    pub fn has_effect(&self, who: Combatant, effect_type: EffectType) -> bool {
        self.entities.get(&who).is_some_and(|e| e.has(effect_type))
    }

    /// Spend an effect on `who`; true if it was active
    pub fn consume(&mut self, who: Combatant, effect_type: EffectType) -> bool {
        let consumed = self
            .entities
            .get_mut(&who)
            .is_some_and(|e| e.consume(effect_type));
        if consumed {
            debug!(?who, effect = %effect_type, "effect consumed");
        }
        consumed
    }

    /// Magnitude of an active effect, zero when absent
    pub fn magnitude(&self, who: Combatant, effect_type: EffectType) -> i32 {
        self.entities
            .get(&who)
            .and_then(|e| e.get(effect_type))
            .map_or(0, |e| e.magnitude)
    }

    pub fn begin_turn(&mut self, who: Combatant) -> TurnStart {
        self.entities
            .get_mut(&who)
            .map(EntityEffects::begin_turn)
            .unwrap_or_default()
    }

    pub fn cure(&mut self, who: Combatant) -> bool {
        self.entities
            .get_mut(&who)
            .is_some_and(EntityEffects::clear_debuffs)
    }

    /// Drop everything on a combatant (on death)
    pub fn clear(&mut self, who: Combatant) {
        if let Some(effects) = self.entities.get_mut(&who) {
            effects.clear();
        }
    }
}
