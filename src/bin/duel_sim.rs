//! Headless duel simulator.
//!
//! Loads the catalog, deck and config, builds the opening state and hands
//! it to `sim::Simulation`. Frames reach the waiting peer at each handover;
//! `--shuffle` scrambles each turn's frames first. The exit code reports
//! whether the two replicas converged.
//!
//! ```text
//! RUST_LOG=duel_engine=debug duel-sim --seed 7 --shuffle
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use duel_engine::cards::{CardCatalog, DeckList};
use duel_engine::core::{MatchConfig, Seat};
use duel_engine::rules::{DuelRules, MatchBuilder};
use duel_engine::sim::{SimOptions, Simulation};

const SAMPLE_CATALOG: &str = r#"[
    { "id": "m-01", "name": "Cinder Whelp", "type": "monster", "attack": 800, "defense": 400,
      "element": "fire", "cost": 1, "rarity": "common", "subType": "Dragon" },
    { "id": "m-02", "name": "Gale Sprite", "type": "monster", "attack": 600, "defense": 900,
      "element": "air", "cost": 1, "rarity": "common", "subType": "Fairy" },
    { "id": "m-03", "name": "Dawn Sentinel", "type": "monster", "attack": 1400, "defense": 1600,
      "element": "light", "cost": 3, "rarity": "rare", "subType": "Warrior" },
    { "id": "m-04", "name": "Void Walker", "type": "monster", "attack": 2000, "defense": 1500,
      "element": "dark", "cost": 4, "rarity": "epic", "subType": "Ethereal Entity" },
    { "id": "m-05", "name": "Aether Colossus", "type": "monster", "attack": 2800, "defense": 2500,
      "element": "ether", "cost": 6, "rarity": "legendary" },
    { "id": "s-01", "name": "Ether Bolt", "type": "spell", "element": "ether", "cost": 2 },
    { "id": "t-01", "name": "Snare", "type": "trap", "element": "light", "cost": 1 }
]"#;

#[derive(Parser, Debug)]
#[command(name = "duel-sim", about = "Simulate a replicated duel between two in-process peers")]
struct Args {
    /// Shared seed for deck shuffles and bot choices.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Room both peers join.
    #[arg(long, default_value = "sim")]
    room: String,

    /// Stop after this many turns if nobody has won.
    #[arg(long, default_value_t = 60)]
    max_turns: u32,

    /// JSON catalog to load instead of the built-in sample.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// JSON deck list (array of card ids) for the first seat.
    #[arg(long)]
    deck: Option<PathBuf>,

    /// JSON match configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Shuffle each turn's frames before delivering them.
    #[arg(long)]
    shuffle: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            error!(error = %err, "simulation failed");
            ExitCode::FAILURE
        }
    }
}

/// Play one match. Returns whether the replicas converged.
fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let catalog = match &args.catalog {
        Some(path) => CardCatalog::from_json(&std::fs::read_to_string(path)?)?,
        None => CardCatalog::from_json(SAMPLE_CATALOG)?,
    };
    let config = match &args.config {
        Some(path) => MatchConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => MatchConfig::default(),
    }
    .seed(args.seed);

    let rules = DuelRules::new(Arc::new(catalog), config);
    let mut builder = MatchBuilder::new(&rules).names("North", "South").room(&args.room);
    if let Some(path) = &args.deck {
        let deck: DeckList = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        builder = builder.custom_deck(Seat::First, deck);
    }
    let opening = builder.build()?;

    let options = SimOptions {
        seed: args.seed,
        room: args.room.clone(),
        max_turns: args.max_turns,
        shuffle: args.shuffle,
    };
    let mut sim = Simulation::new(&rules, &opening, options);
    let result = sim.run()?;

    let first = sim.peer(Seat::First).state();
    info!(
        winner = ?first.winner,
        hp_first = first.player(Seat::First).hp,
        hp_second = first.player(Seat::Second).hp,
        deliveries = result.deliveries,
        rejected = result.rejected,
        diverged = result.diverged,
        checksum = result.checksum,
        "match finished"
    );
    Ok(result.converged)
}
