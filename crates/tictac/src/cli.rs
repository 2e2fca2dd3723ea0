//! Command-line interface for tictac.

use clap::{Parser, Subcommand};
use tictac::PlayerSettings;
use tictac_core::Difficulty;

/// Tictac - tic-tac-toe against heuristic computer players
#[derive(Parser, Debug)]
#[command(name = "tictac")]
#[command(about = "Tic-tac-toe with Normal, Hard and Expert computer players", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to an engine configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Random seed for computer players
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal
    Play {
        /// Who plays X: human, normal, hard or expert
        #[arg(long)]
        x: Option<PlayerSettings>,

        /// Who plays O: human, normal, hard or expert
        #[arg(long)]
        o: Option<PlayerSettings>,

        /// Pause before each computer move, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Play computer against computer and report the results
    Simulate {
        /// Difficulty for X
        #[arg(long, default_value = "expert")]
        x: Difficulty,

        /// Difficulty for O
        #[arg(long, default_value = "expert")]
        o: Difficulty,

        /// Number of games to play
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// Print every finished game as JSON
        #[arg(long)]
        json: bool,
    },
}
