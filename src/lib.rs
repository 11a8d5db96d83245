//! ruincrawl - two-player turn-based dungeon crawl engine
//!
//! Combat, loot, progression and death rules for a local party of players
//! fighting groups of creatures. All player-facing text flows through the
//! [`io`] ports, and all randomness comes from a caller-supplied generator.

pub mod combat;
pub mod config;
pub mod death;
pub mod entities;
pub mod init;
pub mod io;
pub mod loot;
pub mod progression;
pub mod save;
pub mod trade;

use std::path::Path;

use rand::RngCore;
use tracing::info;

use combat::{CombatReport, CombatSession, LootAward, SessionError};
use config::GameConfig;
use entities::{Catalog, Creature, Player};
use io::{InputSource, OutputSink};
use loot::LootGenerator;
use save::SaveError;
use trade::{InventoryCommand, Merchant, TradeError};

/// A party, its merchant and the rules they play under
pub struct Game {
    config: GameConfig,
    catalog: Catalog,
    players: Vec<Player>,
    merchant: Merchant,
}

impl Game {
    pub fn new(config: GameConfig, players: Vec<Player>, merchant: Merchant) -> Self {
        Self {
            config,
            catalog: Catalog::standard(),
            players,
            merchant,
        }
    }

    /// Load a saved game; on failure nothing is built
    pub fn load(path: &Path, config: GameConfig) -> Result<Self, SaveError> {
        let catalog = Catalog::standard();
        let loaded = save::load_game(path, &catalog, &config)?;
        Ok(Self {
            config,
            catalog,
            players: loaded.players,
            merchant: loaded.merchant,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        let party: Vec<&Player> = self.players.iter().collect();
        save::save_game(path, &party, &self.merchant)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn merchant(&self) -> &Merchant {
        &self.merchant
    }

    pub fn party_levels(&self) -> Vec<u32> {
        self.players.iter().map(|p| p.level).collect()
    }

    /// Fight one group of creatures to the end
    pub fn encounter(
        &mut self,
        enemies: Vec<Creature>,
        input: &mut dyn InputSource,
        output: &mut dyn OutputSink,
        rng: &mut dyn RngCore,
    ) -> Result<CombatReport, SessionError> {
        let party: Vec<&mut Player> = self.players.iter_mut().collect();
        let session = CombatSession::new(&self.config, &self.catalog, party, enemies, input, output, rng);
        let report = session.run()?;
        info!(outcome = %report.outcome, rounds = report.rounds, "encounter finished");
        Ok(report)
    }

    /// Roll a chest and hand its contents to `recipient`
    pub fn open_chest(
        &mut self,
        recipient: usize,
        output: &mut dyn OutputSink,
        rng: &mut dyn RngCore,
    ) -> Vec<LootAward> {
        let levels = self.party_levels();
        let drops = LootGenerator::new(&self.config.loot, &self.catalog).chest(&levels, rng);
        let Some(player) = self.players.get_mut(recipient) else {
            return Vec::new();
        };

        output.emit(&format!("{} opens a chest.", player.name));
        drops
            .into_iter()
            .map(|drop| {
                let (accepted, line) = drop.award_to(player);
                output.emit(&line);
                LootAward {
                    player: recipient,
                    drop,
                    accepted,
                }
            })
            .collect()
    }

    /// Parse and run one inventory command typed by player `actor`
    ///
    /// The other player (the next one in turn order, wrapping) is the `give`
    /// target. Shop commands need `at_shop`.
    pub fn inventory_command(&mut self, actor: usize, line: &str, at_shop: bool) -> Result<String, TradeError> {
        let command: InventoryCommand = line.parse()?;
        let count = self.players.len();
        if actor >= count {
            return Err(TradeError::NoPartner);
        }

        let (head, tail) = self.players.split_at_mut(actor);
        let Some((me, rest)) = tail.split_first_mut() else {
            return Err(TradeError::NoPartner);
        };
        let partner = rest.first_mut().or_else(|| head.first_mut());
        let merchant = at_shop.then_some(&mut self.merchant);
        trade::execute(command, me, partner, merchant)
    }
}
