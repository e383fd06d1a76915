//! Tests for sessions and the console host over an in-memory store.

use hanoi_game::{
    Console, GameSession, KeyValueStore, MemoryStore, ProfileService, ProgressStore,
    SessionError, player_key,
};
use std::io::Cursor;
use strictly_hanoi::{
    GameEvent, LevelConfig, LevelManager, MoveError, RecordOutcome, ScoreEntry, ScoreLedger,
    TowerId,
};

const SOLUTION_3: [(usize, usize); 7] = [(0, 2), (0, 1), (2, 1), (0, 2), (1, 0), (1, 2), (0, 2)];

fn profiles() -> ProfileService<MemoryStore> {
    ProfileService::new(
        ProgressStore::new(MemoryStore::new()),
        LevelManager::default(),
    )
}

fn tower(index: usize) -> TowerId {
    TowerId::from_index(index).unwrap()
}

fn win_level_one(session: &mut GameSession<MemoryStore>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for (from, to) in SOLUTION_3 {
        events.extend(session.move_disk(tower(from), tower(to)).unwrap());
    }
    events
}

#[test]
fn test_win_persists_completion_and_score() {
    let mut session = GameSession::start(profiles(), "Alice").unwrap();
    let events = win_level_one(&mut session);

    assert!(matches!(events.last(), Some(GameEvent::LevelWon(_))));
    let record = session.last_win().unwrap();
    assert_eq!(*record.outcome(), RecordOutcome::Added { rank: Some(1) });
    assert!(*record.newly_completed());

    let saved = session
        .profiles()
        .store()
        .load_player("Alice")
        .unwrap()
        .unwrap();
    assert!(saved.has_completed(1));
    assert_eq!(*saved.highest_level(), 2);

    let board = session.profiles().leaderboard(1).unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(*board[0].moves(), 7);
}

#[test]
fn test_next_level_after_win() {
    let mut session = GameSession::start(profiles(), "Alice").unwrap();
    win_level_one(&mut session);

    let events = session.next_level().unwrap();
    assert!(matches!(events[0], GameEvent::LevelInitialized(_)));
    assert_eq!(*session.level().number(), 2);
    assert_eq!(session.engine().towers().len(TowerId::Left), 4);
    assert!(session.last_win().is_none());

    // Level 3 needs level 2 first.
    assert!(session.next_level().is_err());
    session.previous_level().unwrap();
    assert_eq!(*session.level().number(), 1);
}

#[test]
fn test_won_level_refuses_moves() {
    let mut session = GameSession::start(profiles(), "Alice").unwrap();
    win_level_one(&mut session);
    assert!(matches!(
        session.undo(),
        Err(SessionError::Move(MoveError::LevelComplete))
    ));
    session.restart().unwrap();
    assert_eq!(session.engine().move_count(), 0);
}

#[test]
fn test_worse_replay_keeps_best_score() {
    let mut session = GameSession::start(profiles(), "Alice").unwrap();
    win_level_one(&mut session);
    session.restart().unwrap();

    // Waste two moves, then solve.
    session.move_disk(TowerId::Left, TowerId::Middle).unwrap();
    session.move_disk(TowerId::Middle, TowerId::Left).unwrap();
    win_level_one(&mut session);

    let record = session.last_win().unwrap();
    assert_eq!(*record.outcome(), RecordOutcome::NotImproved);
    assert!(!*record.newly_completed());
    assert_eq!(*session.profiles().leaderboard(1).unwrap()[0].moves(), 7);
}

#[test]
fn test_console_plays_a_level() {
    let session = GameSession::start(profiles(), "Alice").unwrap();
    let script = "m 0 2\nm 0 1\nm 2 1\nbogus\nm 0 0\nm 0 2\ns 1\nt 0\nm 1 2\nm 0 2\nq\n";
    let mut console = Console::new(session, Cursor::new(script), Vec::new());
    console.run().unwrap();

    let (session, output) = console.into_parts();
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("Welcome, Alice!"));
    assert!(output.contains("Unknown command 'bogus'"));
    assert!(output.contains("Invalid move"));
    assert!(output.contains("Solved in 7 moves (optimal 7, efficiency 100%)"));
    assert!(output.contains("Leaderboard rank: #1"));
    assert!(output.ends_with("Bye!\n"));
    assert!(session.engine().is_won());
    assert!(session.player().has_completed(1));
}

#[test]
fn test_console_reports_locked_level() {
    let session = GameSession::start(profiles(), "Bob").unwrap();
    let mut console = Console::new(session, Cursor::new("l 3\n"), Vec::new());
    console.run().unwrap();

    let (session, output) = console.into_parts();
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("Level 3 is locked"));
    assert_eq!(*session.level().number(), 1);
}

fn profiles_with_saved(record: &str, config: LevelConfig) -> ProfileService<MemoryStore> {
    let mut backend = MemoryStore::new();
    backend.set(&player_key("Alice"), record.to_string()).unwrap();
    ProfileService::new(ProgressStore::new(backend), LevelManager::new(config))
}

#[test]
fn test_saved_level_past_last_is_clamped() {
    let profiles = profiles_with_saved(
        r#"{"name":"Alice","currentLevel":8,"completedLevels":[1,2,3,4,5,6,7]}"#,
        LevelConfig::new(3, 5).unwrap(),
    );
    let mut session = GameSession::start(profiles, "Alice").unwrap();
    assert_eq!(*session.level().number(), 5);
    assert_eq!(*session.player().current_level(), 5);

    session.previous_level().unwrap();
    assert_eq!(*session.level().number(), 4);
    assert_eq!(*session.player().current_level(), 4);
}

#[test]
fn test_saved_level_zero_is_clamped() {
    let profiles = profiles_with_saved(
        r#"{"name":"Alice","currentLevel":0,"completedLevels":[1]}"#,
        LevelConfig::default(),
    );
    let mut session = GameSession::start(profiles, "Alice").unwrap();
    assert_eq!(*session.level().number(), 1);

    session.next_level().unwrap();
    assert_eq!(*session.level().number(), 2);
    assert_eq!(*session.player().current_level(), 2);
}

#[test]
fn test_console_reports_score_outside_leaderboard() {
    let mut store = ProgressStore::with_capacity(MemoryStore::new(), 1);
    let mut ledger = ScoreLedger::with_capacity(1);
    ledger.record_score(1, ScoreEntry::new("Bob", 1, 0)).unwrap();
    store.save_ledger(&ledger).unwrap();
    let profiles = ProfileService::new(store, LevelManager::default());

    let session = GameSession::start(profiles, "Alice").unwrap();
    let script = "m 0 2\nm 0 1\nm 2 1\nm 0 2\nm 1 0\nm 1 2\nm 0 2\nq\n";
    let mut console = Console::new(session, Cursor::new(script), Vec::new());
    console.run().unwrap();

    let (session, output) = console.into_parts();
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("First score saved, outside the leaderboard"));
    assert!(!output.contains("Not a new personal best"));
    assert_eq!(
        *session.last_win().unwrap().outcome(),
        RecordOutcome::Added { rank: None }
    );
}

#[test]
fn test_console_lists_legal_targets() {
    let session = GameSession::start(profiles(), "Alice").unwrap();
    let mut console = Console::new(session, Cursor::new("m 0 2\ns 0\n"), Vec::new());
    console.run().unwrap();

    let (_, output) = console.into_parts();
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("Holding disk 2 from Left (0) (can go to: 1)"));
}
