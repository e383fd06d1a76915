//! Player progress business logic layer.

use derive_getters::Getters;
use derive_more::{Display, From};
use derive_new::new;
use strictly_hanoi::{
    Level, LedgerError, LevelError, LevelManager, LevelStats, PlayerProgress, RecordOutcome,
    ScoreEntry, rules,
};
use tracing::{debug, info, instrument};

use crate::store::{KeyValueStore, ProgressStore, StoreError};

/// Errors from profile operations.
#[derive(Debug, Clone, Display, From)]
pub enum ProfileError {
    /// Saved state could not be read or written.
    #[display("{}", _0)]
    Store(StoreError),
    /// Bad player name or level.
    #[display("{}", _0)]
    Level(LevelError),
    /// Score refused by the leaderboard.
    #[display("{}", _0)]
    Ledger(LedgerError),
}

impl std::error::Error for ProfileError {}

/// What a won level changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, new)]
pub struct WinRecord {
    /// Stats reported by the engine.
    stats: LevelStats,
    /// True if the level was solved for the first time.
    newly_completed: bool,
    /// What happened on the leaderboard.
    outcome: RecordOutcome,
    /// True once every level is solved.
    all_completed: bool,
}

/// One row of a player's completion summary.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct LevelSummary {
    /// The level.
    level: Level,
    /// Whether the player has solved it.
    completed: bool,
    /// The player's leaderboard entry, if still ranked.
    best: Option<ScoreEntry>,
    /// Minimum moves for the level.
    optimal_moves: u64,
    /// Efficiency of the best entry.
    efficiency: Option<u8>,
}

/// Service layer for player progress.
///
/// Wraps [`ProgressStore`] with get-or-create semantics and win recording.
#[derive(Debug, Clone)]
pub struct ProfileService<S> {
    store: ProgressStore<S>,
    levels: LevelManager,
}

impl<S: KeyValueStore> ProfileService<S> {
    /// Creates a service over a store and level rules.
    #[instrument(skip(store))]
    pub fn new(store: ProgressStore<S>, levels: LevelManager) -> Self {
        info!("Creating ProfileService");
        Self { store, levels }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    /// Returns the underlying store mutably.
    pub fn store_mut(&mut self) -> &mut ProgressStore<S> {
        &mut self.store
    }

    /// Returns the level rules.
    pub fn levels(&self) -> &LevelManager {
        &self.levels
    }

    /// Returns an existing player by name or creates and saves a new one.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] for a blank name or a storage failure.
    #[instrument(skip(self))]
    pub fn get_or_create_player(&mut self, name: &str) -> Result<PlayerProgress, ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LevelError::EmptyPlayerName.into());
        }

        if let Some(player) = self.store.load_player(name)? {
            info!(player = %player.name(), "Existing player found");
            return Ok(player);
        }

        info!(player = %name, "Creating new player");
        let player = PlayerProgress::new(name.to_string())?;
        self.store.save_player(&player)?;
        Ok(player)
    }

    /// Looks up a saved player without creating one.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] for a blank name or a storage failure.
    #[instrument(skip(self))]
    pub fn find_player(&self, name: &str) -> Result<Option<PlayerProgress>, ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LevelError::EmptyPlayerName.into());
        }
        Ok(self.store.load_player(name)?)
    }

    /// A saved player, or an unsaved fresh one for an unknown name.
    ///
    /// Nothing is written, so read-only views never create players.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] for a blank name or a storage failure.
    pub fn preview_player(&self, name: &str) -> Result<PlayerProgress, ProfileError> {
        match self.find_player(name)? {
            Some(player) => Ok(player),
            None => {
                debug!(player = %name.trim(), "Unknown player, not saving");
                Ok(PlayerProgress::new(name.to_string())?)
            }
        }
    }

    /// Saves a player's record.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] on a storage failure.
    pub fn save_player(&mut self, player: &PlayerProgress) -> Result<(), ProfileError> {
        Ok(self.store.save_player(player)?)
    }

    /// Records a won level: completion, unlocking and the leaderboard.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] if the score is refused or saving fails.
    #[instrument(skip(self, player, stats), fields(player = %player.name(), level = %stats.level()))]
    pub fn record_level_win(
        &mut self,
        player: &mut PlayerProgress,
        stats: &LevelStats,
    ) -> Result<WinRecord, ProfileError> {
        let number = *stats.level().number();
        let newly_completed = self.levels.mark_completed(player, number);

        let mut ledger = self.store.load_ledger()?;
        let entry = ScoreEntry::new(player.name().clone(), *stats.moves(), stats.elapsed_secs());
        let outcome = ledger.record_score(number, entry)?;
        self.store.save_ledger(&ledger)?;
        self.store.save_player(player)?;

        let all_completed = self.levels.all_completed(player);
        info!(
            newly_completed,
            rank = ?outcome.rank(),
            all_completed,
            "Level win recorded"
        );
        Ok(WinRecord::new(*stats, newly_completed, outcome, all_completed))
    }

    /// Ranked entries for a level.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] on a storage failure.
    #[instrument(skip(self))]
    pub fn leaderboard(&self, level: u8) -> Result<Vec<ScoreEntry>, ProfileError> {
        let ledger = self.store.load_ledger()?;
        Ok(ledger.scores_for(level).to_vec())
    }

    /// Names of every saved player.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] on a storage failure.
    pub fn list_players(&self) -> Result<Vec<String>, ProfileError> {
        Ok(self.store.list_players()?)
    }

    /// Every level with the player's completion and best ranked run.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] on a storage failure.
    #[instrument(skip(self, player), fields(player = %player.name()))]
    pub fn completion_summary(
        &self,
        player: &PlayerProgress,
    ) -> Result<Vec<LevelSummary>, ProfileError> {
        let ledger = self.store.load_ledger()?;
        let summary: Vec<LevelSummary> = self
            .levels
            .config()
            .levels()
            .map(|level| {
                let best = ledger
                    .best_score_for(*level.number(), player.name())
                    .cloned();
                let efficiency = best
                    .as_ref()
                    .map(|entry| rules::efficiency(*level.disk_count(), *entry.moves()));
                LevelSummary::new(
                    level,
                    player.has_completed(*level.number()),
                    best,
                    level.optimal_moves(),
                    efficiency,
                )
            })
            .collect();
        debug!(levels = summary.len(), "Completion summary built");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::time::Duration;
    use strictly_hanoi::LevelConfig;

    fn service() -> ProfileService<MemoryStore> {
        ProfileService::new(
            ProgressStore::new(MemoryStore::new()),
            LevelManager::default(),
        )
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut service = service();
        let first = service.get_or_create_player(" Alice ").unwrap();
        let second = service.get_or_create_player("Alice").unwrap();
        assert_eq!(first, second);
        assert_eq!(service.list_players().unwrap(), vec!["Alice".to_string()]);
    }

    #[test]
    fn test_lookups_do_not_create_players() {
        let service = service();
        assert_eq!(service.find_player("Typo").unwrap(), None);

        let guest = service.preview_player("Typo").unwrap();
        assert_eq!(guest.name(), "Typo");
        assert_eq!(*guest.current_level(), 1);
        assert!(service.completion_summary(&guest).is_ok());

        assert!(service.list_players().unwrap().is_empty());
        assert_eq!(service.store().load_player("Typo").unwrap(), None);
    }

    #[test]
    fn test_find_player_returns_saved_record() {
        let mut service = service();
        let saved = service.get_or_create_player("Alice").unwrap();
        assert_eq!(service.find_player(" alice ").unwrap(), Some(saved.clone()));
        assert_eq!(service.preview_player("Alice").unwrap(), saved);
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut service = service();
        assert!(matches!(
            service.get_or_create_player("   "),
            Err(ProfileError::Level(LevelError::EmptyPlayerName))
        ));
    }

    #[test]
    fn test_win_is_persisted() {
        let mut service = service();
        let mut player = service.get_or_create_player("Alice").unwrap();
        let level = LevelConfig::default().level(1).unwrap();
        let stats = LevelStats::new(level, 9, Duration::from_secs(42));

        let record = service.record_level_win(&mut player, &stats).unwrap();
        assert!(*record.newly_completed());
        assert_eq!(record.outcome().rank(), Some(1));
        assert!(!*record.all_completed());

        let reloaded = service.get_or_create_player("Alice").unwrap();
        assert!(reloaded.has_completed(1));
        assert_eq!(*reloaded.highest_level(), 2);

        let board = service.leaderboard(1).unwrap();
        assert_eq!(*board[0].moves(), 9);
        assert_eq!(*board[0].elapsed_secs(), 42);
    }

    #[test]
    fn test_completion_summary() {
        let mut service = service();
        let mut player = service.get_or_create_player("Alice").unwrap();
        let level = LevelConfig::default().level(1).unwrap();
        service
            .record_level_win(&mut player, &LevelStats::new(level, 14, Duration::from_secs(5)))
            .unwrap();

        let summary = service.completion_summary(&player).unwrap();
        assert_eq!(summary.len(), 8);
        assert!(*summary[0].completed());
        assert_eq!(*summary[0].efficiency(), Some(50));
        assert!(!*summary[1].completed());
        assert_eq!(summary[1].best(), &None);
        assert_eq!(*summary[1].optimal_moves(), 15);
    }
}
