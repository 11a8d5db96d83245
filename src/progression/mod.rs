//! Progression ledger
//!
//! Splits kill XP among the players who are eligible for it and applies
//! level-ups:
//! - One eligible player takes everything
//! - Several split evenly; the integer remainder goes to the last-hit player
//!   if eligible, otherwise to the first eligible player in turn order
//! - Required XP for the next level is `xp_multiplier * level`; progress
//!   carries over, so one large award can cross several levels
//! - At max level progress is discarded

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GameConfig;
use crate::entities::Player;

/// XP granted to one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpAward {
    /// Index of the player in turn order
    pub player: usize,
    pub amount: u32,
}

/// A level change caused by an award
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub player: usize,
    pub name: String,
    pub from: u32,
    pub to: u32,
}

/// Everything one distribution did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpReport {
    pub total: u32,
    pub awards: Vec<XpAward>,
    pub level_ups: Vec<LevelUp>,
}

impl XpReport {
    /// XP granted to `player`, zero if they got nothing
    pub fn amount_for(&self, player: usize) -> u32 {
        self.awards
            .iter()
            .filter(|a| a.player == player)
            .map(|a| a.amount)
            .sum()
    }
}

/// Divide `total` among `eligible` players (indices in turn order)
///
/// The remainder goes to `last_hit` when that player is eligible, else to the
/// first eligible index. No eligible players means no awards.
pub fn split_xp(total: u32, eligible: &[usize], last_hit: Option<usize>) -> Vec<XpAward> {
    let Some(&first) = eligible.first() else {
        return Vec::new();
    };
    let count = eligible.len() as u32;
    let share = total / count;
    let leftover = total % count;
    let leftover_to = last_hit.filter(|p| eligible.contains(p)).unwrap_or(first);

    eligible
        .iter()
        .map(|&player| XpAward {
            player,
            amount: if player == leftover_to { share + leftover } else { share },
        })
        .collect()
}

/// Applies XP awards against the configured curve and class gains
pub struct ProgressionLedger<'a> {
    config: &'a GameConfig,
}

impl<'a> ProgressionLedger<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self { config }
    }

    /// XP needed to advance from `level`
    pub fn required_xp(&self, level: u32) -> u32 {
        self.config.progression.required_xp(level)
    }

    /// Add XP to one player and run the level-up check
    ///
    /// Returns `(old_level, new_level)` when at least one level was gained.
    pub fn grant(&self, player: &mut Player, amount: u32) -> Option<(u32, u32)> {
        let max_level = self.config.progression.max_level;
        let gain = self.config.classes.profile(player.class).gain;
        let from = player.level;

        if player.level >= max_level {
            player.xp = 0;
            return None;
        }

        player.xp = player.xp.saturating_add(amount);
        while player.level < max_level {
            let required = self.required_xp(player.level);
            if player.xp < required {
                break;
            }
            player.xp -= required;
            player.level += 1;
            player.apply_level_gain(&gain);
        }
        if player.level >= max_level {
            player.xp = 0;
        }

        if player.level > from {
            info!(player = %player.name, from, to = player.level, "level up");
            Some((from, player.level))
        } else {
            None
        }
    }

    /// Split `total` among the eligible players and apply it
    ///
    /// `players` is the session's turn order; `eligible` indexes into it.
    pub fn distribute(
        &self,
        players: &mut [&mut Player],
        eligible: &[usize],
        total: u32,
        last_hit: Option<usize>,
    ) -> XpReport {
        let eligible: Vec<usize> = eligible.iter().copied().filter(|&i| i < players.len()).collect();
        let awards = split_xp(total, &eligible, last_hit);
        let mut level_ups = Vec::new();

        for award in &awards {
            let player = &mut *players[award.player];
            if let Some((from, to)) = self.grant(player, award.amount) {
                level_ups.push(LevelUp {
                    player: award.player,
                    name: player.name.clone(),
                    from,
                    to,
                });
            }
        }

        XpReport {
            total,
            awards,
            level_ups,
        }
    }
}
