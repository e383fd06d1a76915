//! Command-line interface for hanoi_game.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Hanoi Game - Tower of Hanoi with levels, leaderboard and saved progress
#[derive(Parser, Debug)]
#[command(name = "hanoi_game")]
#[command(about = "Tower of Hanoi in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for saved progress (overrides config and HANOI_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Player name (asked for if not given)
        #[arg(short, long)]
        player: Option<String>,

        /// Start on this level (must be unlocked)
        #[arg(short, long)]
        level: Option<u8>,
    },

    /// List levels, with lock state for a player
    Levels {
        /// Player whose unlocks to show
        #[arg(short, long)]
        player: Option<String>,
    },

    /// Show the leaderboard
    Leaderboard {
        /// Only this level
        #[arg(short, long)]
        level: Option<u8>,
    },

    /// List saved players
    Players,

    /// Show a player's completion summary
    Stats {
        /// Player name
        #[arg(short, long)]
        player: String,
    },
}
