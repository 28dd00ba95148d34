//! Command-line interface for strictly_blokus.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_blokus::Difficulty;

/// Strictly Blokus - tile-placement engine with AI self-play
#[derive(Parser, Debug)]
#[command(name = "strictly_blokus")]
#[command(about = "Blokus-style game engine and self-play harness", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a match between AI seats
    Play {
        /// Path to match configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for AI randomness (overrides the config)
        #[arg(long)]
        seed: Option<u64>,

        /// AI seats as a comma-separated list of difficulties (overrides the config)
        #[arg(long, value_delimiter = ',')]
        seats: Option<Vec<Difficulty>>,

        /// Only print the final result
        #[arg(short, long)]
        quiet: bool,

        /// Write the final snapshot as JSON
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Validate a saved snapshot
    Check {
        /// Path to the snapshot JSON
        snapshot: PathBuf,
    },
}
