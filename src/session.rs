//! A player's game session: one engine plus saved progress.
//!
//! Every command drains the engine's event queue. A `LevelWon` event is
//! persisted before the events are handed back to the host.

use derive_more::{Display, From};
use std::time::Duration;
use strictly_hanoi::{
    GameEvent, HanoiEngine, Level, LevelError, MoveError, PlayerProgress, TowerId,
};
use tracing::{debug, info, instrument};

use crate::profile_service::{ProfileError, ProfileService, WinRecord};
use crate::store::KeyValueStore;

/// Errors from session commands.
#[derive(Debug, Clone, Display, From)]
pub enum SessionError {
    /// The engine refused the command.
    #[display("{}", _0)]
    Move(MoveError),
    /// Progress could not be loaded or saved, or the level is unavailable.
    #[display("{}", _0)]
    Profile(ProfileError),
}

impl From<LevelError> for SessionError {
    fn from(err: LevelError) -> Self {
        SessionError::Profile(ProfileError::Level(err))
    }
}

impl std::error::Error for SessionError {}

/// An active player with the level they are playing.
#[derive(Debug)]
pub struct GameSession<S> {
    engine: HanoiEngine,
    player: PlayerProgress,
    profiles: ProfileService<S>,
    last_win: Option<WinRecord>,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Loads or creates the player and opens their current level.
    ///
    /// A saved level outside the configured range is clamped, so the
    /// player's record and the engine always agree on the level.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] for a blank name or a storage failure.
    #[instrument(skip(profiles))]
    pub fn start(mut profiles: ProfileService<S>, player_name: &str) -> Result<Self, ProfileError> {
        let mut player = profiles.get_or_create_player(player_name)?;
        let level = profiles.levels().clamp_current_level(&mut player);
        info!(player = %player.name(), level = %level, "Session started");
        Ok(Self {
            engine: HanoiEngine::new(level),
            player,
            profiles,
            last_win: None,
        })
    }

    /// The engine for the level being played.
    pub fn engine(&self) -> &HanoiEngine {
        &self.engine
    }

    /// The player's progress.
    pub fn player(&self) -> &PlayerProgress {
        &self.player
    }

    /// The profile service backing this session.
    pub fn profiles(&self) -> &ProfileService<S> {
        &self.profiles
    }

    /// The profile service backing this session, mutably.
    pub fn profiles_mut(&mut self) -> &mut ProfileService<S> {
        &mut self.profiles
    }

    /// What the most recent win changed, until the next level starts.
    pub fn last_win(&self) -> Option<&WinRecord> {
        self.last_win.as_ref()
    }

    /// Picks up the top disk of a tower.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Move`] if the engine refuses.
    pub fn select_disk(&mut self, tower: TowerId) -> Result<Vec<GameEvent>, SessionError> {
        self.engine.select_disk(tower)?;
        self.pump()
    }

    /// Drops the selected disk on a tower.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the engine refuses or a win cannot be saved.
    pub fn attempt_move(&mut self, target: TowerId) -> Result<Vec<GameEvent>, SessionError> {
        self.engine.attempt_move(target)?;
        self.pump()
    }

    /// Moves the top disk of `source` onto `target`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the engine refuses or a win cannot be saved.
    pub fn move_disk(
        &mut self,
        source: TowerId,
        target: TowerId,
    ) -> Result<Vec<GameEvent>, SessionError> {
        self.engine.move_disk(source, target)?;
        self.pump()
    }

    /// Reverts the last move.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Move`] if there is nothing to undo or the
    /// level is won.
    pub fn undo(&mut self) -> Result<Vec<GameEvent>, SessionError> {
        self.engine.undo()?;
        self.pump()
    }

    /// Feeds the host clock to the engine.
    pub fn tick(&mut self, elapsed: Duration) {
        self.engine.tick(elapsed);
    }

    /// Restarts the current level.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] only if saving fails.
    pub fn restart(&mut self) -> Result<Vec<GameEvent>, SessionError> {
        self.engine.reset_level();
        self.last_win = None;
        self.pump()
    }

    /// Moves to the next level if it is unlocked.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Locked`] or [`LevelError::OutOfRange`] (as
    /// [`SessionError::Profile`]) with the session unchanged.
    #[instrument(skip(self), fields(player = %self.player.name()))]
    pub fn next_level(&mut self) -> Result<Vec<GameEvent>, SessionError> {
        let next = self.engine.level().number().saturating_add(1);
        let levels = *self.profiles.levels();
        levels.config().level(next)?;
        if !levels.is_unlocked(&self.player, next) {
            return Err(LevelError::Locked(next).into());
        }
        levels.advance(&mut self.player);
        self.open_current_level()
    }

    /// Moves to the previous level.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::OutOfRange`] at level 1.
    #[instrument(skip(self), fields(player = %self.player.name()))]
    pub fn previous_level(&mut self) -> Result<Vec<GameEvent>, SessionError> {
        let levels = *self.profiles.levels();
        if !levels.retreat(&mut self.player) {
            return Err(LevelError::OutOfRange(0).into());
        }
        self.open_current_level()
    }

    /// Jumps to any unlocked level.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Locked`] or [`LevelError::OutOfRange`].
    #[instrument(skip(self), fields(player = %self.player.name()))]
    pub fn select_level(&mut self, number: u8) -> Result<Vec<GameEvent>, SessionError> {
        let levels = *self.profiles.levels();
        levels.select_level(&mut self.player, number)?;
        self.open_current_level()
    }

    /// Flips the player's sound preference and saves it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if saving fails.
    pub fn toggle_sound(&mut self) -> Result<bool, SessionError> {
        let enabled = self.player.toggle_sound();
        self.profiles.save_player(&self.player)?;
        Ok(enabled)
    }

    /// The current level.
    pub fn level(&self) -> Level {
        *self.engine.level()
    }

    fn open_current_level(&mut self) -> Result<Vec<GameEvent>, SessionError> {
        self.profiles.save_player(&self.player)?;
        let level = self.profiles.levels().current_level(&self.player);
        self.engine.init_level(level);
        self.last_win = None;
        debug!(level = %level, "Level opened");
        self.pump()
    }

    fn pump(&mut self) -> Result<Vec<GameEvent>, SessionError> {
        let events = self.engine.drain_events();
        for event in &events {
            if let GameEvent::LevelWon(stats) = event {
                let record = self.profiles.record_level_win(&mut self.player, stats)?;
                self.last_win = Some(record);
            }
        }
        Ok(events)
    }
}
