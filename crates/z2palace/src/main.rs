//! Palace generator
//!
//! Command-line driver: loads a room catalog and options, generates the
//! seven palaces and prints a summary or the full room graphs as JSON.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use z2p_core::{
    CancelSignal, CatalogError, Direction, GenRng, GenerationError, Palace, PalaceOptions,
    PalaceStyle, RoomCatalog, generate_palaces,
};

/// Generate randomized palace layouts
#[derive(Parser, Debug)]
#[command(name = "z2palace")]
#[command(author, version, about = "Generate Zelda II palace room graphs", long_about = None)]
struct Args {
    /// Room catalog (JSON array of room templates)
    #[arg(short = 'r', long = "rooms")]
    rooms: PathBuf,

    /// Generation options (JSON); unset fields use defaults
    #[arg(short = 'o', long = "options")]
    options: Option<PathBuf>,

    /// Seed; random when omitted
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Style for palaces 1-6 (vanilla, shuffled, reconstructed)
    #[arg(long = "normal-style")]
    normal_style: Option<PalaceStyle>,

    /// Style for the great palace (adds reconstructed_shortened)
    #[arg(long = "great-style")]
    great_style: Option<PalaceStyle>,

    /// The raft is needed to reach the east side
    #[arg(long = "raft-required")]
    raft_required: bool,

    /// Give up after this many seconds
    #[arg(long = "timeout")]
    timeout: Option<u64>,

    /// Print the palaces as JSON instead of a summary
    #[arg(long = "json")]
    json: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("could not read options: {0}")]
    OptionsIo(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("no valid palace set was found");
            ExitCode::from(2)
        }
        Err(e) => {
            error!(%e, "palace generation failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<bool, CliError> {
    let catalog = RoomCatalog::from_path(&args.rooms)?;
    let mut options = match &args.options {
        Some(path) => PalaceOptions::from_json(&std::fs::read_to_string(path)?)?,
        None => PalaceOptions::default(),
    };
    if let Some(style) = args.normal_style {
        options.normal_palace_style = style;
    }
    if let Some(style) = args.great_style {
        options.great_palace_style = style;
    }

    let mut rng = args.seed.map_or_else(GenRng::from_entropy, GenRng::new);
    info!(seed = rng.seed(), rooms = catalog.len(), "generating palaces");

    let cancel = CancelSignal::new();
    if let Some(secs) = args.timeout {
        let handle = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(secs));
            handle.cancel();
        });
    }

    let Some(palaces) = generate_palaces(&cancel, &mut rng, &catalog, &options, args.raft_required)?
    else {
        return Ok(false);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&palaces)?);
    } else {
        println!("seed {}", rng.seed());
        for palace in &palaces {
            print_summary(palace);
        }
    }
    Ok(true)
}

fn print_summary(palace: &Palace) {
    let drops = palace.rooms().iter().filter(|r| r.dropped_from().is_some()).count();
    println!(
        "palace {}: {} rooms, {} drops, {} enemy bytes, {} attempts",
        palace.number,
        palace.len(),
        drops,
        palace.enemy_bytes(),
        palace.generations
    );
    for id in palace.room_ids() {
        let room = palace.room(id);
        let exits: Vec<String> = Direction::ALL
            .into_iter()
            .filter_map(|dir| {
                room.connection(dir)
                    .map(|to| format!("{dir}->{}", palace.room(to).map_no))
            })
            .collect();
        let role = if room.role.is_empty() {
            String::new()
        } else {
            format!(" {:?}", room.role)
        };
        println!("  [{:>3}] {}{} {}", room.map_no, room.name, role, exits.join(" "));
    }
}
