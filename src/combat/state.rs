//! Combat state tracking
//!
//! Identifiers and phases of the turn state machine:
//! - Who is acting (players by turn order, enemies by spawn order)
//! - Which phase the session is in
//! - How it ended

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A participant in a combat session, by position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combatant {
    Player(usize),
    Enemy(usize),
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every enemy is dead
    Victory,
    /// A player ran; no XP or loot
    Flee,
    /// Every player is down
    Defeat,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Outcome::Victory => "victory",
            Outcome::Flee => "flee",
            Outcome::Defeat => "defeat",
        };
        write!(f, "{}", s)
    }
}

/// State machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting on this player's decision
    PlayerTurn(usize),
    /// This enemy acts next
    EnemyTurn(usize),
    /// Every living actor has acted; the round wraps up
    Resolving,
    Ended(Outcome),
}

impl Phase {
    pub fn is_ended(&self) -> bool {
        matches!(self, Phase::Ended(_))
    }
}

/// The five combat menu actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    Defend,
    UseItem,
    Special,
    Run,
}

impl FromStr for PlayerAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "attack" | "a" => Ok(PlayerAction::Attack),
            "2" | "defend" | "d" => Ok(PlayerAction::Defend),
            "3" | "use" | "item" | "i" => Ok(PlayerAction::UseItem),
            "4" | "special" | "s" => Ok(PlayerAction::Special),
            "5" | "run" | "flee" | "r" => Ok(PlayerAction::Run),
            _ => Err(()),
        }
    }
}
