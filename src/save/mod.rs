//! Save files
//!
//! A save is a JSON envelope around a [`GameState`]:
//! - `format` version, checked on load
//! - `saved_at` timestamp
//! - `checksum`, hex SHA-256 of the serialized state
//! - `state`, the plain records
//!
//! Writes go to a temp file in the target directory and are persisted over
//! the old save in one rename. Loads verify everything before returning, so
//! a failed load never touches live state.

mod record;

pub use record::{GameState, MerchantRecord, PlayerRecord};

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::entities::{Catalog, Player};
use crate::trade::Merchant;

/// Current save format version
pub const SAVE_FORMAT: u32 = 1;

/// Persistence failures
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save format {found} (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },

    #[error("save checksum mismatch (expected {expected}, found {actual})")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("unknown weapon template {0:?}")]
    UnknownWeapon(String),

    #[error("invalid record for {name}: {reason}")]
    InvalidRecord { name: String, reason: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    format: u32,
    saved_at: DateTime<Utc>,
    checksum: String,
    state: serde_json::Value,
}

/// A successfully loaded game
#[derive(Debug)]
pub struct LoadedGame {
    pub players: Vec<Player>,
    pub merchant: Merchant,
    pub saved_at: DateTime<Utc>,
}

/// SHA-256 of the compact serialization of `state`
///
/// `serde_json::Value` keeps object keys sorted, so the same state always
/// hashes the same way.
fn state_checksum(state: &serde_json::Value) -> Result<String, SaveError> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_string(state)?.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Write `state` to `path`, replacing any previous save atomically
pub fn write_state(path: &Path, state: &GameState) -> Result<(), SaveError> {
    let value = serde_json::to_value(state)?;
    let envelope = Envelope {
        format: SAVE_FORMAT,
        saved_at: Utc::now(),
        checksum: state_checksum(&value)?,
        state: value,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut file, &envelope)?;
    file.write_all(b"\n")?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| SaveError::Io(e.error))?;

    info!(
        path = %path.display(),
        players = state.players.len(),
        checksum = %&envelope.checksum[..12],
        "game saved"
    );
    Ok(())
}

/// Read and verify a save without building live values
pub fn read_state(path: &Path) -> Result<(GameState, DateTime<Utc>), SaveError> {
    let bytes = fs::read(path)?;
    let envelope: Envelope = serde_json::from_slice(&bytes)?;

    if envelope.format != SAVE_FORMAT {
        return Err(SaveError::UnsupportedFormat {
            found: envelope.format,
            expected: SAVE_FORMAT,
        });
    }
    let actual = state_checksum(&envelope.state)?;
    if actual != envelope.checksum {
        return Err(SaveError::ChecksumMismatch {
            expected: envelope.checksum,
            actual,
        });
    }

    let state: GameState = serde_json::from_value(envelope.state)?;
    debug!(path = %path.display(), players = state.players.len(), "save verified");
    Ok((state, envelope.saved_at))
}

/// Save the party and merchant
pub fn save_game(path: &Path, players: &[&Player], merchant: &Merchant) -> Result<(), SaveError> {
    write_state(path, &GameState::capture(players, merchant))
}

/// Load and rebuild the party and merchant
///
/// Either every record is valid and a [`LoadedGame`] is returned, or an
/// error is returned and nothing was built.
pub fn load_game(path: &Path, catalog: &Catalog, config: &GameConfig) -> Result<LoadedGame, SaveError> {
    let (state, saved_at) = read_state(path)?;
    let (players, merchant) = state.restore(catalog, config)?;
    info!(path = %path.display(), players = players.len(), %saved_at, "game loaded");
    Ok(LoadedGame {
        players,
        merchant,
        saved_at,
    })
}
