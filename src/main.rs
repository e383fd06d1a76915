//! Hanoi Game - Unified CLI
//!
//! Play Tower of Hanoi in the terminal and inspect saved progress.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use hanoi_game::{Console, FileStore, GameConfig, GameSession, ProfileService, ProgressStore};
use std::io::{BufRead, Write};
use strictly_hanoi::{ScoreEntry, format_elapsed};
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the board.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let profiles = open_profiles(&config)?;

    match cli.command {
        Command::Play { player, level } => run_play(profiles, player, level),
        Command::Levels { player } => run_levels(&profiles, player),
        Command::Leaderboard { level } => run_leaderboard(&profiles, level),
        Command::Players => run_players(&profiles),
        Command::Stats { player } => run_stats(&profiles, &player),
    }
}

type Profiles = ProfileService<FileStore>;

/// Config file (if any), then `HANOI_DATA_DIR`, then `--data-dir`.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<GameConfig> {
    let config = match &cli.config {
        Some(path) => GameConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            debug!("No config file, using defaults");
            GameConfig::default()
        }
    };
    let config = config.with_env_overrides();
    Ok(match &cli.data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    })
}

fn open_profiles(config: &GameConfig) -> Result<Profiles> {
    let backend = FileStore::open(config.data_dir())
        .with_context(|| format!("Failed to open {}", config.data_dir().display()))?;
    let store = ProgressStore::with_capacity(backend, *config.leaderboard_capacity());
    let levels = config.level_manager()?;
    Ok(ProfileService::new(store, levels))
}

/// Asks for a player name on stdin.
fn prompt_name() -> Result<String> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        write!(stdout, "Player name: ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            bail!("No player name given");
        }
        let name = line.trim();
        if !name.is_empty() {
            return Ok(name.to_string());
        }
    }
}

/// Run the console game
#[instrument(skip(profiles))]
fn run_play(profiles: Profiles, player: Option<String>, level: Option<u8>) -> Result<()> {
    let name = match player {
        Some(name) => name,
        None => prompt_name()?,
    };
    let mut session = GameSession::start(profiles, &name).context("Failed to start session")?;
    if let Some(level) = level {
        session.select_level(level)?;
    }
    info!(player = %name, level = %session.level(), "Starting console game");

    let stdin = std::io::stdin();
    let mut console = Console::new(session, stdin.lock(), std::io::stdout());
    console.run()
}

/// List levels
fn run_levels(profiles: &Profiles, player: Option<String>) -> Result<()> {
    let player = player
        .map(|name| profiles.preview_player(&name))
        .transpose()?;
    let levels = *profiles.levels();

    for level in levels.config().levels() {
        let mut line = format!(
            "{:>2}. {} disks, optimal {} moves",
            level.number(),
            level.disk_count(),
            level.optimal_moves()
        );
        if let Some(player) = &player {
            let number = *level.number();
            let state = if player.has_completed(number) {
                "completed"
            } else if levels.is_unlocked(player, number) {
                "unlocked"
            } else {
                "locked"
            };
            line.push_str(&format!(" [{}]", state));
        }
        println!("{}", line);
    }
    Ok(())
}

fn print_board(level: u8, entries: &[ScoreEntry]) {
    println!("Level {}", level);
    if entries.is_empty() {
        println!("  no scores yet");
    }
    for (rank, entry) in entries.iter().enumerate() {
        println!(
            "  #{:<2} {:<20} {:>6} moves  {}  {}",
            rank + 1,
            entry.player_name(),
            entry.moves(),
            format_elapsed(*entry.elapsed_secs()),
            entry.recorded_at().format("%Y-%m-%d")
        );
    }
}

/// Show the leaderboard
fn run_leaderboard(profiles: &Profiles, level: Option<u8>) -> Result<()> {
    let config = *profiles.levels().config();
    match level {
        Some(number) => {
            config.level(number)?;
            print_board(number, &profiles.leaderboard(number)?);
        }
        None => {
            for level in config.levels() {
                let entries = profiles.leaderboard(*level.number())?;
                if !entries.is_empty() {
                    print_board(*level.number(), &entries);
                }
            }
        }
    }
    Ok(())
}

/// List saved players
fn run_players(profiles: &Profiles) -> Result<()> {
    let players = profiles.list_players()?;
    if players.is_empty() {
        println!("No saved players");
    }
    for name in players {
        println!("{}", name);
    }
    Ok(())
}

/// Show a player's completion summary
fn run_stats(profiles: &Profiles, name: &str) -> Result<()> {
    let Some(player) = profiles.find_player(name)? else {
        bail!("No saved player named '{}'", name.trim());
    };
    let summary = profiles.completion_summary(&player)?;

    println!(
        "{}: level {}, highest {}",
        player.name(),
        player.current_level(),
        player.highest_level()
    );
    for row in &summary {
        let best = match row.best() {
            Some(entry) => format!(
                "{} moves in {} ({}% efficient)",
                entry.moves(),
                format_elapsed(*entry.elapsed_secs()),
                row.efficiency().unwrap_or(0)
            ),
            None if *row.completed() => "completed, not ranked".to_string(),
            None => "-".to_string(),
        };
        println!(
            "{:>2}. {:>2} disks (optimal {:>4})  {}",
            row.level().number(),
            row.level().disk_count(),
            row.optimal_moves(),
            best
        );
    }
    if profiles.levels().all_completed(&player) {
        println!("Every level complete!");
    }
    Ok(())
}
