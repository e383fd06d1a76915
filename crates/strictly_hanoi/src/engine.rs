//! The move engine: one level session.
//!
//! The engine owns the towers and the move history. Hosts call
//! [`select_disk`](HanoiEngine::select_disk) and
//! [`attempt_move`](HanoiEngine::attempt_move) (or
//! [`move_disk`](HanoiEngine::move_disk)), feed the clock through
//! [`tick`](HanoiEngine::tick), and drain [`GameEvent`]s after each call.
//!
//! Contract enforcement:
//! - Preconditions checked always ([`MoveContract::pre`])
//! - Postconditions checked in debug builds only

use super::contracts::{Contract, MoveContract};
use super::rules;
use super::{
    Disk, GameEvent, GamePhase, Level, LevelStats, Move, MoveError, MoveResult, RejectReason,
    TowerId, Towers,
};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// A single level session.
#[derive(Debug, Clone)]
pub struct HanoiEngine {
    pub(crate) level: Level,
    pub(crate) towers: Towers,
    pub(crate) history: Vec<Move>,
    pub(crate) moves: u32,
    phase: GamePhase,
    selected: Option<TowerId>,
    elapsed: Duration,
    stats: Option<LevelStats>,
    events: Vec<GameEvent>,
}

impl HanoiEngine {
    /// Starts a level with every disk on the left tower.
    #[instrument(skip(level), fields(level = %level))]
    pub fn new(level: Level) -> Self {
        debug!("Initializing level");
        Self {
            level,
            towers: Towers::stacked(*level.disk_count()),
            history: Vec::new(),
            moves: 0,
            phase: GamePhase::Idle,
            selected: None,
            elapsed: Duration::ZERO,
            stats: None,
            events: vec![GameEvent::LevelInitialized(level)],
        }
    }

    /// Discards the current session and starts `level` from scratch.
    ///
    /// Undrained events from the old session are dropped.
    #[instrument(skip(self, level), fields(level = %level))]
    pub fn init_level(&mut self, level: Level) {
        *self = Self::new(level);
    }

    /// Restarts the current level.
    #[instrument(skip(self), fields(level = %self.level))]
    pub fn reset_level(&mut self) {
        self.init_level(self.level);
    }

    /// Rebuilds a session by replaying recorded moves from the start.
    ///
    /// The returned engine has no pending events.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::IllegalMove`] for the first move that breaks the
    /// rules or names the wrong disk, and [`MoveError::LevelComplete`] if
    /// moves remain after the level is solved.
    #[instrument(skip(level, moves), fields(level = %level, count = moves.len()))]
    pub fn replay(level: Level, moves: &[Move]) -> Result<Self, MoveError> {
        let mut game = Self::new(level);

        for &action in moves {
            if game.towers.top_disk(action.from) != Some(action.disk) {
                return Err(MoveError::IllegalMove(
                    action,
                    RejectReason::NotTopDisk(action.disk),
                ));
            }
            let result = game.move_disk(action.from, action.to)?;
            if let Some(reason) = result.reason {
                return Err(MoveError::IllegalMove(action, reason));
            }
        }

        game.events.clear();
        Ok(game)
    }

    /// Picks up the top disk of a tower.
    ///
    /// Selecting the already-selected tower drops the selection and returns
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::EmptyTower`] (selection unchanged) if the tower
    /// holds no disks, or [`MoveError::LevelComplete`] after the win.
    #[instrument(skip(self), fields(level = %self.level))]
    pub fn select_disk(&mut self, tower: TowerId) -> Result<Option<Disk>, MoveError> {
        self.ensure_playable()?;

        if self.selected == Some(tower) {
            debug!("Deselecting");
            self.selected = None;
            self.events.push(GameEvent::SelectionCleared);
            return Ok(None);
        }

        let Some(disk) = self.towers.top_disk(tower) else {
            debug!("Cannot select from empty tower");
            return Err(MoveError::EmptyTower(tower));
        };

        self.selected = Some(tower);
        self.events.push(GameEvent::DiskSelected { tower, disk });
        debug!(disk = %disk, "Disk selected");
        Ok(Some(disk))
    }

    /// Moves the selected disk onto `target`.
    ///
    /// The selection is cleared whether or not the move is accepted. Rule
    /// violations come back as a rejected [`MoveResult`], not an error.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::LevelComplete`] after the win, or
    /// [`MoveError::InvariantViolation`] if a debug postcondition fails.
    #[instrument(skip(self), fields(level = %self.level, moves = self.moves))]
    pub fn attempt_move(&mut self, target: TowerId) -> Result<MoveResult, MoveError> {
        self.ensure_playable()?;

        let Some(source) = self.selected.take() else {
            return Ok(self.reject(RejectReason::NoSelection));
        };
        let Some(disk) = self.towers.top_disk(source) else {
            return Ok(self.reject(RejectReason::EmptySource(source)));
        };

        let action = Move::new(source, target, disk);
        if let Err(reason) = MoveContract::pre(self, &action) {
            return Ok(self.reject(reason));
        }

        #[cfg(debug_assertions)]
        let before = self.clone();

        self.apply(action)?;

        #[cfg(debug_assertions)]
        MoveContract::post(&before, self)?;

        if rules::is_solved(&self.towers, *self.level.disk_count()) {
            self.finish();
        }

        Ok(MoveResult::accepted(action))
    }

    /// Selects `source` and moves its top disk onto `target` in one call.
    ///
    /// An empty source is reported as a rejected move.
    ///
    /// # Errors
    ///
    /// Same as [`attempt_move`](Self::attempt_move).
    pub fn move_disk(&mut self, source: TowerId, target: TowerId) -> Result<MoveResult, MoveError> {
        self.ensure_playable()?;
        self.selected = Some(source);
        self.attempt_move(target)
    }

    /// Reverts the most recent move without consulting the rules.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::EmptyHistory`] (state unchanged) when there is
    /// nothing to undo, or [`MoveError::LevelComplete`] after the win.
    #[instrument(skip(self), fields(level = %self.level, moves = self.moves))]
    pub fn undo(&mut self) -> Result<Move, MoveError> {
        self.ensure_playable()?;

        let Some(last) = self.history.last().copied() else {
            debug!("Nothing to undo");
            return Err(MoveError::EmptyHistory);
        };

        let disk = self.towers.pop(last.to).map_err(|e| {
            MoveError::InvariantViolation(format!("Undo of {} failed: {}", last, e))
        })?;
        self.towers.push(last.from, disk);
        self.history.pop();
        self.moves = self.moves.saturating_sub(1);
        self.selected = None;
        self.events.push(GameEvent::MoveUndone(last));

        debug!(undone = %last, "Move undone");
        Ok(last)
    }

    /// Updates the elapsed time from the host's clock.
    ///
    /// Ignored unless the level is in progress, so the time is frozen at
    /// the win.
    pub fn tick(&mut self, elapsed: Duration) {
        if self.phase == GamePhase::InProgress {
            self.elapsed = elapsed;
        }
    }

    /// Takes all events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events queued since the last drain.
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Returns the level being played.
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Returns the towers.
    pub fn towers(&self) -> &Towers {
        &self.towers
    }

    /// Returns the move history, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns the number of moves made.
    pub fn move_count(&self) -> u32 {
        self.moves
    }

    /// Returns the session phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Returns true once the level is solved.
    pub fn is_won(&self) -> bool {
        self.phase.is_won()
    }

    /// Returns the tower whose top disk is selected.
    pub fn selected(&self) -> Option<TowerId> {
        self.selected
    }

    /// Returns the selected disk.
    pub fn selected_disk(&self) -> Option<Disk> {
        self.selected.and_then(|tower| self.towers.top_disk(tower))
    }

    /// Towers that would accept the selected disk, in tower order.
    ///
    /// Empty when nothing is selected or the level is won.
    pub fn valid_targets(&self) -> Vec<TowerId> {
        let (Some(source), Some(disk)) = (self.selected, self.selected_disk()) else {
            return Vec::new();
        };
        TowerId::ALL
            .into_iter()
            .filter(|&target| rules::is_valid_move(disk, source, target, &self.towers))
            .collect()
    }

    /// Returns the last time reported by the host.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Minimum moves needed for this level.
    pub fn optimal_moves(&self) -> u64 {
        self.level.optimal_moves()
    }

    /// Efficiency of the moves made so far (0-100).
    pub fn efficiency(&self) -> u8 {
        rules::efficiency(*self.level.disk_count(), self.moves)
    }

    /// Returns the final stats once the level is won.
    pub fn stats(&self) -> Option<&LevelStats> {
        self.stats.as_ref()
    }

    fn ensure_playable(&self) -> Result<(), MoveError> {
        if self.phase.is_won() {
            warn!(level = %self.level, "Level already complete");
            return Err(MoveError::LevelComplete);
        }
        Ok(())
    }

    fn reject(&mut self, reason: RejectReason) -> MoveResult {
        warn!(reason = %reason, "Invalid move attempted");
        self.events.push(GameEvent::InvalidMoveAttempted(reason));
        MoveResult::rejected(reason)
    }

    fn apply(&mut self, action: Move) -> Result<(), MoveError> {
        let disk = self.towers.pop(action.from).map_err(|e| {
            MoveError::InvariantViolation(format!("Validated move {} failed: {}", action, e))
        })?;
        self.towers.push(action.to, disk);
        self.history.push(action);
        self.moves += 1;
        self.events.push(GameEvent::DiskMoved(action));

        if self.phase == GamePhase::Idle {
            self.phase = GamePhase::InProgress;
            self.events.push(GameEvent::TimerStarted);
            debug!("First move, timer started");
        }

        debug!(applied = %action, moves = self.moves, "Move applied");
        Ok(())
    }

    fn finish(&mut self) {
        let stats = LevelStats::new(self.level, self.moves, self.elapsed);
        self.phase = GamePhase::Won;
        self.selected = None;
        self.stats = Some(stats);
        self.events.push(GameEvent::LevelWon(stats));
        info!(
            level = %self.level,
            moves = self.moves,
            efficiency = *stats.efficiency(),
            "Level won"
        );
    }
}
