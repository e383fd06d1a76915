//! Line-based console host.
//!
//! Reads one command per line, drives a [`GameSession`], owns the clock and
//! prints the board after every command.

use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::Instant;

use derive_more::{Display, Error};
use strictly_hanoi::{GameEvent, RecordOutcome, TowerId, format_elapsed};
use tracing::{debug, instrument, warn};

use crate::session::{GameSession, SessionError};
use crate::store::KeyValueStore;

const HELP: &str = "\
Commands:
  m <from> <to>  move the top disk (towers 0, 1, 2)
  s <tower>      select / deselect a tower's top disk
  t <tower>      drop the selected disk on a tower
  u              undo
  r              restart level
  n / p          next / previous level
  l <n>          jump to level n
  sound          toggle sound
  theme          toggle theme
  h              help
  q              quit";

/// A parsed console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Select (or deselect) a tower's top disk.
    Select(TowerId),
    /// Drop the selected disk on a tower.
    Drop(TowerId),
    /// Move from one tower to another.
    Move(TowerId, TowerId),
    /// Undo the last move.
    Undo,
    /// Restart the level.
    Restart,
    /// Go to the next level.
    Next,
    /// Go to the previous level.
    Previous,
    /// Jump to a level.
    Level(u8),
    /// Toggle sound.
    Sound,
    /// Toggle theme.
    Theme,
    /// Show help.
    Help,
    /// Leave the game.
    Quit,
}

/// A line that is not a command.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{}", message)]
pub struct ParseCommandError {
    /// What was wrong.
    pub message: String,
}

impl ParseCommandError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn parse_tower(word: Option<&str>) -> Result<TowerId, ParseCommandError> {
    let word = word.ok_or_else(|| ParseCommandError::new("Missing tower number"))?;
    word.parse::<usize>()
        .ok()
        .and_then(TowerId::from_index)
        .ok_or_else(|| ParseCommandError::new(format!("No tower '{}' (use 0, 1 or 2)", word)))
}

impl FromStr for ConsoleCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(ParseCommandError::new("Empty command"));
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "m" | "move" => {
                let from = parse_tower(words.next())?;
                let to = parse_tower(words.next())?;
                ConsoleCommand::Move(from, to)
            }
            "s" | "select" => ConsoleCommand::Select(parse_tower(words.next())?),
            "t" | "to" => ConsoleCommand::Drop(parse_tower(words.next())?),
            "u" | "undo" => ConsoleCommand::Undo,
            "r" | "restart" => ConsoleCommand::Restart,
            "n" | "next" => ConsoleCommand::Next,
            "p" | "prev" | "previous" => ConsoleCommand::Previous,
            "l" | "level" => {
                let word = words
                    .next()
                    .ok_or_else(|| ParseCommandError::new("Missing level number"))?;
                let number = word
                    .parse::<u8>()
                    .map_err(|_| ParseCommandError::new(format!("Bad level '{}'", word)))?;
                ConsoleCommand::Level(number)
            }
            "sound" => ConsoleCommand::Sound,
            "theme" => ConsoleCommand::Theme,
            "h" | "help" | "?" => ConsoleCommand::Help,
            "q" | "quit" | "exit" => ConsoleCommand::Quit,
            other => {
                return Err(ParseCommandError::new(format!(
                    "Unknown command '{}' (h for help)",
                    other
                )));
            }
        };

        if words.next().is_some() {
            return Err(ParseCommandError::new("Too many arguments"));
        }
        Ok(command)
    }
}

/// Console front end over a session.
pub struct Console<S, R, W> {
    session: GameSession<S>,
    input: R,
    output: W,
    clock_start: Option<Instant>,
}

impl<S: KeyValueStore, R: BufRead, W: Write> Console<S, R, W> {
    /// Creates a console over a started session.
    pub fn new(session: GameSession<S>, input: R, output: W) -> Self {
        Self {
            session,
            input,
            output,
            clock_start: None,
        }
    }

    /// The session being played.
    pub fn session(&self) -> &GameSession<S> {
        &self.session
    }

    /// Consumes the console, returning the session and output.
    pub fn into_parts(self) -> (GameSession<S>, W) {
        (self.session, self.output)
    }

    /// Runs until `q` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input, writing output or saving
    /// progress fails.
    #[instrument(skip(self), fields(player = %self.session.player().name()))]
    pub fn run(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "Welcome, {}! Move every disk to tower 2. Type h for help.",
            self.session.player().name()
        )?;
        self.render()?;

        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                debug!("End of input");
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<ConsoleCommand>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(self.output, "{}", e)?;
                    continue;
                }
            };
            if command == ConsoleCommand::Quit {
                break;
            }
            self.handle(command)?;
        }

        writeln!(self.output, "Bye!")?;
        Ok(())
    }

    /// Applies one command and prints the result.
    ///
    /// Refused commands are reported to the player; only storage failures
    /// are returned as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if writing output or saving progress fails.
    pub fn handle(&mut self, command: ConsoleCommand) -> anyhow::Result<()> {
        if let Some(start) = self.clock_start {
            self.session.tick(start.elapsed());
        }

        let result = match command {
            ConsoleCommand::Select(tower) => self.session.select_disk(tower),
            ConsoleCommand::Drop(tower) => self.session.attempt_move(tower),
            ConsoleCommand::Move(from, to) => self.session.move_disk(from, to),
            ConsoleCommand::Undo => self.session.undo(),
            ConsoleCommand::Restart => self.session.restart(),
            ConsoleCommand::Next => self.session.next_level(),
            ConsoleCommand::Previous => self.session.previous_level(),
            ConsoleCommand::Level(n) => self.session.select_level(n),
            ConsoleCommand::Sound => {
                let on = self.session.toggle_sound()?;
                writeln!(self.output, "Sound {}", if on { "on" } else { "off" })?;
                return Ok(());
            }
            ConsoleCommand::Theme => {
                let store = self.session.profiles_mut().store_mut();
                let theme = store.theme()?.toggled();
                store.set_theme(theme)?;
                writeln!(self.output, "Theme: {}", theme)?;
                return Ok(());
            }
            ConsoleCommand::Help => {
                writeln!(self.output, "{}", HELP)?;
                return Ok(());
            }
            ConsoleCommand::Quit => return Ok(()),
        };

        match result {
            Ok(events) => {
                for event in &events {
                    self.on_event(event)?;
                }
            }
            Err(SessionError::Move(e)) => writeln!(self.output, "{}", e)?,
            Err(SessionError::Profile(crate::ProfileError::Level(e))) => {
                writeln!(self.output, "{}", e)?
            }
            Err(e) => {
                warn!(error = %e, "Session command failed");
                return Err(e.into());
            }
        }
        self.render()
    }

    fn on_event(&mut self, event: &GameEvent) -> anyhow::Result<()> {
        match event {
            GameEvent::LevelInitialized(level) => {
                self.clock_start = None;
                writeln!(self.output, "{}", level)?;
            }
            GameEvent::TimerStarted => self.clock_start = Some(Instant::now()),
            GameEvent::InvalidMoveAttempted(reason) => {
                writeln!(self.output, "Invalid move: {}", reason)?;
            }
            GameEvent::LevelWon(stats) => {
                self.clock_start = None;
                writeln!(
                    self.output,
                    "Solved in {} moves (optimal {}, efficiency {}%) in {}",
                    stats.moves(),
                    stats.optimal_moves(),
                    stats.efficiency(),
                    format_elapsed(stats.elapsed_secs())
                )?;
                if let Some(record) = self.session.last_win() {
                    match record.outcome() {
                        RecordOutcome::Added { rank: Some(rank) }
                        | RecordOutcome::Improved { rank: Some(rank) } => {
                            writeln!(self.output, "Leaderboard rank: #{}", rank)?
                        }
                        RecordOutcome::Added { rank: None } => {
                            writeln!(self.output, "First score saved, outside the leaderboard")?
                        }
                        RecordOutcome::Improved { rank: None } => writeln!(
                            self.output,
                            "New personal best, still outside the leaderboard"
                        )?,
                        RecordOutcome::NotImproved => {
                            writeln!(self.output, "Not a new personal best")?
                        }
                    }
                    if *record.all_completed() {
                        writeln!(self.output, "Every level complete. Well played!")?;
                    } else {
                        writeln!(self.output, "Type n for the next level.")?;
                    }
                }
            }
            GameEvent::DiskSelected { .. }
            | GameEvent::SelectionCleared
            | GameEvent::DiskMoved(_)
            | GameEvent::MoveUndone(_) => {}
        }
        Ok(())
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let engine = self.session.engine();
        writeln!(
            self.output,
            "{} | Moves: {} | Optimal: {} | Time: {}",
            engine.level(),
            engine.move_count(),
            engine.optimal_moves(),
            format_elapsed(engine.elapsed().as_secs())
        )?;
        write!(self.output, "{}", engine.towers().display())?;
        writeln!(self.output)?;
        if let (Some(tower), Some(disk)) = (engine.selected(), engine.selected_disk()) {
            let targets = engine
                .valid_targets()
                .iter()
                .map(|target| target.index().to_string())
                .collect::<Vec<_>>();
            let targets = if targets.is_empty() {
                "none".to_string()
            } else {
                targets.join(", ")
            };
            writeln!(
                self.output,
                "Holding disk {} from {} (can go to: {})",
                disk, tower, targets
            )?;
        }
        Ok(())
    }
}
