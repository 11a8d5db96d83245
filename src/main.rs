//! ruincrawl - play encounters against a saved party

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ruincrawl::combat::{Outcome, SessionError};
use ruincrawl::config::GameConfig;
use ruincrawl::entities::spawn_group;
use ruincrawl::io::{ConsoleInput, ConsoleOutput, InputSource, OutputSink};
use ruincrawl::Game;

/// Turn-based dungeon crawl for two players
#[derive(Parser, Debug)]
#[command(name = "ruincrawl", version, about = "Play encounters against a saved party")]
struct Args {
    /// Game rules TOML file (defaults and RUINCRAWL_* variables apply on top)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Save file created by ruincrawl_init
    #[arg(short, long, default_value = "ruincrawl.json")]
    save: PathBuf,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Number of encounters to play before saving and exiting
    #[arg(short, long, default_value_t = 1)]
    encounters: u32,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ruincrawl=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Between encounters every living player may manage their inventory and shop
fn camp(game: &mut Game, input: &mut dyn InputSource, output: &mut dyn OutputSink) -> Result<(), SessionError> {
    for actor in 0..game.players().len() {
        let player = &game.players()[actor];
        output.emit(&player.status_line());
        for (n, item) in player.inventory.iter().enumerate() {
            output.emit(&format!("  {}) {}", n + 1, item));
        }
        for line in game.merchant().listing() {
            output.emit(&format!("  shop {}", line));
        }

        loop {
            let prompt = format!("{}> equip N | use N | give N | buy N | sell N | skip: ", game.players()[actor].name);
            let line = input.read_line(&prompt).ok_or(SessionError::InputClosed)?;
            let skipping = line.trim().is_empty() || line.trim().eq_ignore_ascii_case("skip");
            match game.inventory_command(actor, &line, true) {
                Ok(message) => output.emit(&message),
                Err(e) => output.emit(&e.to_string()),
            }
            if skipping {
                break;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = GameConfig::load(args.config.as_deref()).context("loading configuration")?;
    let mut game = Game::load(&args.save, config)
        .with_context(|| format!("loading save {} (create one with ruincrawl_init)", args.save.display()))?;

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, "random generator seeded");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let stdin = std::io::stdin();
    let mut input = ConsoleInput::new(stdin.lock());
    let mut output = ConsoleOutput;

    for encounter in 1..=args.encounters {
        let enemies = spawn_group(&game.party_levels(), &mut rng);
        info!(encounter, enemies = enemies.len(), "encounter begins");

        let report = match game.encounter(enemies, &mut input, &mut output, &mut rng) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "encounter interrupted; progress of this fight is not saved");
                break;
            }
        };

        match report.outcome {
            Outcome::Victory => {
                output.emit("Victory!");
                let recipient = game.players().iter().position(|p| p.is_alive()).unwrap_or(0);
                game.open_chest(recipient, &mut output, &mut rng);
            }
            Outcome::Flee => output.emit("The party escapes."),
            Outcome::Defeat => output.emit("The party has been defeated."),
        }

        game.save(&args.save).context("saving game")?;

        if let Err(e) = camp(&mut game, &mut input, &mut output) {
            warn!(error = %e, "input closed during camp");
            break;
        }
        game.save(&args.save).context("saving game")?;
    }

    game.save(&args.save).context("saving game")?;
    info!(path = %args.save.display(), "game saved, goodbye");
    Ok(())
}
