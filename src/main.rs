//! Strictly Blokus - self-play harness
//!
//! Runs AI-only matches against the engine and validates saved snapshots.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use strictly_blokus::{
    Difficulty, GameState, MatchConfig, MoveSubmission, SearchInFlight, SeatKind, find_move,
    parse_snapshot, to_snapshot_json,
};
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            seed,
            seats,
            quiet,
            save,
        } => run_play(config, seed, seats, quiet, save),
        Command::Check { snapshot } => run_check(&snapshot),
    }
}

/// Plays one match to completion.
#[instrument(skip(config_path, seats))]
fn run_play(
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    seats: Option<Vec<Difficulty>>,
    quiet: bool,
    save: Option<PathBuf>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => MatchConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MatchConfig::default(),
    };
    if let Some(seats) = seats {
        config = config.with_seats(seats.into_iter().map(SeatKind::Ai).collect());
    }
    let seed = seed.or(*config.seed()).unwrap_or_else(rand::random);
    config = config.with_seed(seed);

    if let Some(index) = config.seats().iter().position(|s| *s == SeatKind::Human) {
        bail!("seat {index} is human; self-play needs every seat AI-controlled");
    }

    info!(seed, seats = config.seats().len(), "Starting self-play");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut token = SearchInFlight::new();
    let mut game = config.to_setup().start(Utc::now())?;

    while !game.is_finished() {
        let seat = game.current_player();
        let difficulty = game
            .current_seat()
            .difficulty()
            .with_context(|| format!("seat {seat} has no difficulty"))?;
        let submission = find_move(&game, seat, difficulty, &mut rng, &mut token)
            .unwrap_or(MoveSubmission::Pass);
        game = game.submit(seat, submission, Utc::now())?;

        if let Some(mv) = game.turn_history().last() {
            if quiet {
                debug!(%mv, "Move");
            } else {
                info!(%mv, candidates = token.last_candidates(), "Move");
            }
        }
    }

    report(&game);
    if let Some(path) = save {
        std::fs::write(&path, to_snapshot_json(&game)?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "Snapshot saved");
    }
    Ok(())
}

/// Parses a snapshot file and prints a summary.
#[instrument]
fn run_check(path: &Path) -> Result<()> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let game = parse_snapshot(&json)?;
    println!(
        "valid snapshot: {} seats, {} moves, status {}",
        game.seats().len(),
        game.move_count(),
        game.status()
    );
    Ok(())
}

fn report(game: &GameState) {
    println!("{}", game.board().display());
    if let Some(outcome) = game.outcome() {
        for (seat, penalty) in outcome.penalties.iter().enumerate() {
            println!("seat {seat}: penalty {penalty}");
        }
        match outcome.winner {
            Some(seat) => println!("winner: seat {seat}"),
            None => println!("result: tie"),
        }
    }
}
