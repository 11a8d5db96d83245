//! New game creation
//!
//! Builds a fresh party and writes the first save for the ruincrawl_init tool.

use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

use crate::config::GameConfig;
use crate::entities::{Player, PlayerClass};
use crate::save;
use crate::trade::Merchant;

/// Create a new save with one fresh character per roster entry
///
/// # Arguments
/// * `path` - Save file to create (must not exist)
/// * `roster` - Name and class for each player, in turn order
/// * `config` - Game rules used to roll starting stats
///
/// # Errors
/// * Save file already exists
/// * Roster is empty or has duplicate names
/// * A name fails validation
/// * Writing the save fails
pub fn init_save(path: &Path, roster: &[(String, PlayerClass)], config: &GameConfig) -> Result<()> {
    if path.exists() {
        bail!(
            "Save file already exists: {}. Remove it first or use a different path.",
            path.display()
        );
    }
    if roster.is_empty() {
        bail!("At least one player is required");
    }

    let mut players = Vec::with_capacity(roster.len());
    for (name, class) in roster {
        let player = Player::new(name, *class, config)?;
        if players.iter().any(|p: &Player| p.name.eq_ignore_ascii_case(&player.name)) {
            bail!("Duplicate player name: {}", player.name);
        }
        info!("Created {} ({})", player.status_line(), player.id);
        players.push(player);
    }

    let party: Vec<&Player> = players.iter().collect();
    save::save_game(path, &party, &Merchant::with_default_stock())?;
    info!("New game written to {}", path.display());
    Ok(())
}
