//! Tests for a full level session through the public engine API.

use std::time::Duration;
use strictly_hanoi::{
    Disk, GameEvent, GamePhase, HanoiEngine, LevelConfig, Move, MoveError, RejectReason, TowerId,
};

/// Optimal solution for `n` disks from `from` to `to`.
fn solve(n: u8, from: TowerId, to: TowerId, via: TowerId, out: &mut Vec<(TowerId, TowerId)>) {
    if n == 0 {
        return;
    }
    solve(n - 1, from, via, to, out);
    out.push((from, to));
    solve(n - 1, via, to, from, out);
}

fn solution(n: u8) -> Vec<(TowerId, TowerId)> {
    let mut out = Vec::new();
    solve(n, TowerId::Left, TowerId::Right, TowerId::Middle, &mut out);
    out
}

#[test]
fn test_every_default_level_solves_optimally() {
    let config = LevelConfig::default();
    for level in config.levels().take(4) {
        let mut game = HanoiEngine::new(level);
        let plan = solution(*level.disk_count());
        assert_eq!(plan.len() as u64, level.optimal_moves());

        for (from, to) in plan {
            let result = game.move_disk(from, to).unwrap();
            assert!(result.is_accepted(), "{} -> {} rejected", from, to);
        }

        assert!(game.is_won());
        let stats = game.stats().unwrap();
        assert_eq!(*stats.efficiency(), 100);
        assert!(stats.is_optimal());
    }
}

#[test]
fn test_event_sequence_for_a_win() {
    let level = LevelConfig::new(1, 3).unwrap().level(1).unwrap();
    let mut game = HanoiEngine::new(level);
    assert_eq!(game.drain_events(), vec![GameEvent::LevelInitialized(level)]);

    game.select_disk(TowerId::Left).unwrap();
    game.tick(Duration::from_secs(3));
    game.attempt_move(TowerId::Right).unwrap();

    let events = game.drain_events();
    assert_eq!(
        events[0],
        GameEvent::DiskSelected {
            tower: TowerId::Left,
            disk: Disk::new(1)
        }
    );
    assert_eq!(
        events[1],
        GameEvent::DiskMoved(Move::new(TowerId::Left, TowerId::Right, Disk::new(1)))
    );
    assert_eq!(events[2], GameEvent::TimerStarted);
    assert!(matches!(events[3], GameEvent::LevelWon(_)));
    assert!(game.pending_events().is_empty());
}

#[test]
fn test_rejected_move_leaves_state_untouched() {
    let mut game = HanoiEngine::new(LevelConfig::default().level(1).unwrap());
    game.move_disk(TowerId::Left, TowerId::Middle).unwrap();
    let before = game.towers().clone();

    let result = game.move_disk(TowerId::Left, TowerId::Middle).unwrap();
    assert!(!result.is_accepted());
    assert_eq!(
        result.reason,
        Some(RejectReason::LargerOnSmaller {
            disk: Disk::new(2),
            target_top: Disk::new(1)
        })
    );
    assert_eq!(game.towers(), &before);
    assert_eq!(game.move_count(), 1);
    assert_eq!(game.selected(), None);
}

#[test]
fn test_same_tower_is_rejected() {
    let mut game = HanoiEngine::new(LevelConfig::default().level(1).unwrap());
    let result = game.move_disk(TowerId::Left, TowerId::Left).unwrap();
    assert_eq!(result.reason, Some(RejectReason::SameTower));
    assert_eq!(game.phase(), GamePhase::Idle);
}

#[test]
fn test_undo_everything_returns_to_start() {
    let mut game = HanoiEngine::new(LevelConfig::default().level(2).unwrap());
    let start = game.towers().clone();
    for (from, to) in solution(4).into_iter().take(6) {
        game.move_disk(from, to).unwrap();
    }
    while game.undo().is_ok() {}

    assert_eq!(game.towers(), &start);
    assert_eq!(game.move_count(), 0);
    assert!(game.history().is_empty());
    assert!(matches!(game.undo(), Err(MoveError::EmptyHistory)));
}

#[test]
fn test_won_level_rejects_everything_until_reset() {
    let mut game = HanoiEngine::new(LevelConfig::default().level(1).unwrap());
    for (from, to) in solution(3) {
        game.move_disk(from, to).unwrap();
    }
    assert!(matches!(game.undo(), Err(MoveError::LevelComplete)));
    assert!(matches!(
        game.select_disk(TowerId::Right),
        Err(MoveError::LevelComplete)
    ));
    assert!(matches!(
        game.move_disk(TowerId::Right, TowerId::Left),
        Err(MoveError::LevelComplete)
    ));

    game.reset_level();
    assert_eq!(game.phase(), GamePhase::Idle);
    assert_eq!(game.towers().len(TowerId::Left), 3);
}

#[test]
fn test_replay_matches_live_session() {
    let level = LevelConfig::default().level(2).unwrap();
    let mut live = HanoiEngine::new(level);
    for (from, to) in solution(4).into_iter().take(9) {
        live.move_disk(from, to).unwrap();
    }

    let replayed = HanoiEngine::replay(level, live.history()).unwrap();
    assert_eq!(replayed.towers(), live.towers());
    assert_eq!(replayed.move_count(), live.move_count());
    assert!(replayed.pending_events().is_empty());
}
