//! Enemy target selection
//!
//! Each creature carries one strategy from a small closed set; the session
//! hands it the living players and the strategy picks who gets hit.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a creature picks its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyStrategy {
    /// Any living player, uniformly
    #[default]
    RandomTarget,
    /// Living player with the lowest current HP (ties go to the earlier player)
    Weakest,
}

/// A living player as seen by the targeting code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCandidate {
    /// Index of the player in the session
    pub index: usize,
    pub hp: i32,
}

impl EnemyStrategy {
    /// Pick a target among `candidates`, or None if nobody is standing
    pub fn choose_target<R: Rng + ?Sized>(
        &self,
        candidates: &[TargetCandidate],
        rng: &mut R,
    ) -> Option<usize> {
        match self {
            EnemyStrategy::RandomTarget => candidates.choose(rng).map(|c| c.index),
            // min_by_key returns the first of equal minima
            EnemyStrategy::Weakest => candidates.iter().min_by_key(|c| c.hp).map(|c| c.index),
        }
    }
}

impl FromStr for EnemyStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" | "random_target" => Ok(EnemyStrategy::RandomTarget),
            "weakest" => Ok(EnemyStrategy::Weakest),
            _ => Err(()),
        }
    }
}
