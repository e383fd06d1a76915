//! Tests for level unlocking and the leaderboard working together.

use strictly_hanoi::{
    HanoiEngine, LevelError, LevelManager, PlayerProgress, RecordOutcome, ScoreEntry, ScoreLedger,
    TowerId,
};

fn win(game: &mut HanoiEngine) {
    // 3-disk optimal solution
    let plan = [(0, 2), (0, 1), (2, 1), (0, 2), (1, 0), (1, 2), (0, 2)];
    for (from, to) in plan {
        game.move_disk(
            TowerId::from_index(from).unwrap(),
            TowerId::from_index(to).unwrap(),
        )
        .unwrap();
    }
}

#[test]
fn test_sequential_unlocking() {
    let manager = LevelManager::default();
    let mut player = PlayerProgress::new("Alice".to_string()).unwrap();

    assert!(manager.is_unlocked(&player, 1));
    assert!(!manager.is_unlocked(&player, 2));
    assert_eq!(manager.select_level(&mut player, 3), Err(LevelError::Locked(3)));
    assert_eq!(manager.select_level(&mut player, 9), Err(LevelError::OutOfRange(9)));

    assert!(manager.mark_completed(&mut player, 1));
    assert!(manager.is_unlocked(&player, 2));
    assert!(!manager.is_unlocked(&player, 3));
    assert_eq!(*player.highest_level(), 2);

    let level = manager.select_level(&mut player, 2).unwrap();
    assert_eq!(*level.disk_count(), 4);
    assert_eq!(*player.current_level(), 2);
}

#[test]
fn test_win_flows_into_progress_and_ledger() {
    let manager = LevelManager::default();
    let mut player = PlayerProgress::new("Alice".to_string()).unwrap();
    let mut ledger = ScoreLedger::new();

    let mut game = HanoiEngine::new(manager.current_level(&player));
    win(&mut game);
    let stats = *game.stats().unwrap();

    manager.mark_completed(&mut player, *stats.level().number());
    let outcome = ledger
        .record_score(
            *stats.level().number(),
            ScoreEntry::new(player.name().clone(), *stats.moves(), stats.elapsed_secs()),
        )
        .unwrap();

    assert_eq!(outcome, RecordOutcome::Added { rank: Some(1) });
    assert!(player.has_completed(1));
    assert_eq!(*ledger.best_score_for(1, "Alice").unwrap().moves(), 7);
}

#[test]
fn test_all_levels_completed() {
    let manager = LevelManager::default();
    let mut player = PlayerProgress::new("Bob".to_string()).unwrap();
    for level in 1..=8 {
        assert!(!manager.all_completed(&player));
        manager.mark_completed(&mut player, level);
    }
    assert!(manager.all_completed(&player));
    assert_eq!(*player.highest_level(), 8);
}

#[test]
fn test_navigation_is_bounded() {
    let manager = LevelManager::default();
    let mut player = PlayerProgress::new("Carol".to_string()).unwrap();
    assert!(!manager.retreat(&mut player));
    for _ in 0..20 {
        manager.advance(&mut player);
    }
    assert_eq!(*player.current_level(), 8);
    assert_eq!(*manager.current_level(&player).disk_count(), 10);
}
