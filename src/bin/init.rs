//! ruincrawl_init - Create a new game save
//!
//! Rolls a fresh party at the configured start level and writes the first save.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ruincrawl::config::GameConfig;
use ruincrawl::entities::PlayerClass;

/// ruincrawl new game tool
#[derive(Parser, Debug)]
#[command(name = "ruincrawl_init", version, about = "Create a new ruincrawl save")]
struct Args {
    /// Save file to create (must not exist)
    #[arg(short, long, default_value = "ruincrawl.json")]
    save: PathBuf,

    /// Player as NAME:CLASS (warrior, mage or ranger); give once per player
    #[arg(short, long = "player", value_parser = parse_player, required = true)]
    players: Vec<(String, PlayerClass)>,

    /// Game rules TOML file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn parse_player(raw: &str) -> Result<(String, PlayerClass), String> {
    let (name, class) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NAME:CLASS, got {:?}", raw))?;
    let class: PlayerClass = class
        .parse()
        .map_err(|_| format!("unknown class {:?} (warrior, mage or ranger)", class))?;
    Ok((name.trim().to_string(), class))
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ruincrawl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = GameConfig::load(args.config.as_deref())?;

    ruincrawl::init::init_save(&args.save, &args.players, &config)?;

    Ok(())
}
