//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Basketball play-by-play possession parser.
///
/// Reconstructs possessions from raw play-by-play event logs and
/// aggregates them into halfgame rate statistics.
#[derive(Debug, Parser)]
#[command(name = "pbp", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse raw play-by-play events into possessions.
    Parse {
        /// Events file, one JSON row per line.
        #[arg(short, long)]
        input: PathBuf,

        /// Possessions output file; defaults to the configured data dir.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Aggregate parsed possessions into halfgame rate statistics.
    Halfgames {
        /// Possessions file, one JSON record per line.
        #[arg(short, long)]
        input: PathBuf,

        /// Halfgames output file; defaults to the configured data dir.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show resolved configuration.
    Status,
}
