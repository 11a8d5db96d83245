//! Death penalty policy
//!
//! Runs once for every player who ends a lost encounter at 0 HP:
//! - Holding a Revive Token: one token is spent and the player comes back at
//!   a fraction of max HP; nothing else changes
//! - Otherwise: death_count goes up, gold is lost (`min(death_count, cap)`,
//!   never below zero), 1 to 3 unprotected inventory items are lost, and the
//!   player respawns at a fraction of max HP
//!
//! The equipped weapon is never touched.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::DeathConfig;
use crate::entities::Player;

/// What happened to one fallen player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathOutcome {
    /// A Revive Token was consumed
    Revived { hp: i32 },
    /// Full penalty applied
    Penalized {
        gold_lost: u32,
        death_count: u32,
        /// Names of the removed items, in former inventory order
        items_lost: Vec<String>,
        hp: i32,
    },
}

/// Death outcome tagged with the player it hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathReport {
    /// Index of the player in turn order
    pub player: usize,
    pub name: String,
    pub outcome: DeathOutcome,
}

impl DeathReport {
    /// Player-facing summary lines
    pub fn describe(&self) -> Vec<String> {
        match &self.outcome {
            DeathOutcome::Revived { hp } => vec![format!(
                "{} used a Revive Token and returns with {} HP.",
                self.name, hp
            )],
            DeathOutcome::Penalized {
                gold_lost,
                death_count,
                items_lost,
                hp,
            } => {
                let mut lines = vec![format!(
                    "{} has fallen (death #{}) and loses {} gold.",
                    self.name, death_count, gold_lost
                )];
                if items_lost.is_empty() {
                    lines.push(format!("{} lost no items.", self.name));
                } else {
                    lines.push(format!("{} lost: {}.", self.name, items_lost.join(", ")));
                }
                lines.push(format!("{} respawns with {} HP.", self.name, hp));
                lines
            }
        }
    }
}

/// Applies death penalties per the configured tuning
pub struct DeathPenaltyPolicy<'a> {
    config: &'a DeathConfig,
}

impl<'a> DeathPenaltyPolicy<'a> {
    pub fn new(config: &'a DeathConfig) -> Self {
        Self { config }
    }

    /// Gold lost for a death with the already-incremented `death_count`
    pub fn gold_penalty(&self, death_count: u32) -> u32 {
        death_count.min(self.config.gold_penalty_cap)
    }

    /// Resolve one player's death
    pub fn apply<R: Rng + ?Sized>(&self, player: &mut Player, rng: &mut R) -> DeathOutcome {
        if player.inventory.take_revive_token().is_some() {
            player.restore_to_percent(self.config.revive_hp_percent);
            info!(player = %player.name, hp = player.hp, "revive token consumed");
            return DeathOutcome::Revived { hp: player.hp };
        }

        player.death_count = player.death_count.saturating_add(1);
        let gold_lost = player.lose_gold(self.gold_penalty(player.death_count));

        let count = if self.config.items_lost_max > self.config.items_lost_min {
            rng.random_range(self.config.items_lost_min..=self.config.items_lost_max)
        } else {
            self.config.items_lost_min
        };
        let items_lost: Vec<String> = player
            .inventory
            .lose_random(count, rng)
            .into_iter()
            .map(|item| item.name)
            .collect();

        player.restore_to_percent(self.config.respawn_hp_percent);
        info!(
            player = %player.name,
            death_count = player.death_count,
            gold_lost,
            items_lost = items_lost.len(),
            "death penalty applied"
        );

        DeathOutcome::Penalized {
            gold_lost,
            death_count: player.death_count,
            items_lost,
            hp: player.hp,
        }
    }
}
