//! Integration tests for the scoreboard store: lifecycle, ownership, players, persistence.

use scorekeeper::{
    GameType, JsonFilePersistence, MemoryPersistence, Persistence, PlayerDelta, ScoreboardError,
    ScoreboardStore, DEFAULT_ELO,
};
use std::sync::Arc;

fn store_with_board(game_type: GameType) -> ScoreboardStore {
    let store = ScoreboardStore::in_memory();
    store.create("league", game_type, "owner").unwrap();
    store
}

#[test]
fn create_rejects_duplicate_names() {
    let store = store_with_board(GameType::WinLoss);
    assert_eq!(
        store.create("league", GameType::Points, "someone"),
        Err(ScoreboardError::AlreadyExists("league".to_string()))
    );
    assert_eq!(store.get("league").unwrap().game_type, GameType::WinLoss);
}

#[test]
fn create_rejects_empty_name() {
    let store = ScoreboardStore::in_memory();
    assert_eq!(store.create("  ", GameType::Points, "me"), Err(ScoreboardError::InvalidName));
}

#[test]
fn get_unknown_board_is_not_found() {
    let store = ScoreboardStore::in_memory();
    assert_eq!(store.get("nope"), Err(ScoreboardError::NotFound("nope".to_string())));
    assert_eq!(store.owner("nope"), None);
}

#[test]
fn repeated_get_returns_identical_data() {
    let store = store_with_board(GameType::Elo);
    store.add_player("league", "ann").unwrap();
    let first = store.get("league").unwrap();
    let second = store.get("league").unwrap();
    assert_eq!(first, second);
}

#[test]
fn only_owner_can_delete_archive_unarchive() {
    let store = store_with_board(GameType::Points);
    let not_owner = ScoreboardError::NotOwner {
        board: "league".to_string(),
        owner: "owner".to_string(),
    };
    assert_eq!(store.archive("league", "mallory"), Err(not_owner.clone()));
    assert_eq!(store.unarchive("league", "mallory"), Err(not_owner.clone()));
    assert_eq!(store.delete("league", "mallory"), Err(not_owner));
    assert!(store.get("league").is_ok());

    store.delete("league", "owner").unwrap();
    assert!(matches!(store.get("league"), Err(ScoreboardError::NotFound(_))));
}

#[test]
fn delete_unknown_board_is_not_found() {
    let store = ScoreboardStore::in_memory();
    assert!(matches!(store.delete("ghost", "me"), Err(ScoreboardError::NotFound(_))));
}

#[test]
fn list_is_sorted_by_name() {
    let store = ScoreboardStore::in_memory();
    for name in ["pool", "darts", "chess"] {
        store.create(name, GameType::WinLoss, "me").unwrap();
    }
    let names: Vec<String> = store.list().into_iter().map(|b| b.name).collect();
    assert_eq!(names, vec!["chess", "darts", "pool"]);
}

#[test]
fn add_player_starts_at_zero_with_default_elo() {
    let store = store_with_board(GameType::Elo);
    store.add_player("league", "ann").unwrap();
    let board = store.get("league").unwrap();
    let ann = &board.players["ann"];
    assert_eq!((ann.wins, ann.losses, ann.draws, ann.points), (0, 0, 0, 0));
    assert_eq!(ann.elo, DEFAULT_ELO);
    assert!(matches!(
        store.add_player("league", "ann"),
        Err(ScoreboardError::AlreadyOnBoard { .. })
    ));
}

#[test]
fn rename_preserves_record() {
    let store = store_with_board(GameType::WinLoss);
    store.add_player("league", "alice").unwrap();
    let delta = PlayerDelta {
        wins: 3,
        losses: 1,
        ..PlayerDelta::default()
    };
    store.adjust_score("league", "alice", &delta).unwrap();
    let before = store.get("league").unwrap().players["alice"].clone();

    store.rename_player("league", "alice", "bob").unwrap();

    let board = store.get("league").unwrap();
    assert!(!board.has_player("alice"));
    assert_eq!(board.players["bob"], before);
}

#[test]
fn rename_onto_existing_player_is_rejected() {
    let store = store_with_board(GameType::WinLoss);
    store.add_player("league", "alice").unwrap();
    store.add_player("league", "bob").unwrap();
    assert_eq!(
        store.rename_player("league", "alice", "bob"),
        Err(ScoreboardError::AlreadyOnBoard {
            board: "league".to_string(),
            player: "bob".to_string(),
        })
    );
    assert!(store.get("league").unwrap().has_player("alice"));
}

#[test]
fn rename_missing_player_fails() {
    let store = store_with_board(GameType::WinLoss);
    assert!(matches!(
        store.rename_player("league", "ghost", "bob"),
        Err(ScoreboardError::PlayerNotFound { .. })
    ));
}

#[test]
fn remove_absent_player_is_silent_and_does_not_save() {
    let persistence = Arc::new(MemoryPersistence::new());
    let store = ScoreboardStore::open(persistence.clone()).unwrap();
    store.create("league", GameType::Points, "me").unwrap();
    let saves = persistence.save_count();

    store.remove_player("league", "ghost").unwrap();
    assert_eq!(persistence.save_count(), saves);
}

#[test]
fn remove_player_deletes_record() {
    let store = store_with_board(GameType::Points);
    store.add_player("league", "cid").unwrap();
    store.remove_player("league", "cid").unwrap();
    assert!(store.get("league").unwrap().players.is_empty());
}

#[test]
fn archived_board_rejects_player_mutations_but_stays_readable() {
    let store = store_with_board(GameType::WinLoss);
    store.add_player("league", "ann").unwrap();
    store.archive("league", "owner").unwrap();

    let archived = Err(ScoreboardError::ArchivedBoard("league".to_string()));
    assert_eq!(store.add_player("league", "bob"), archived);
    assert_eq!(store.rename_player("league", "ann", "anna"), archived);
    assert_eq!(store.remove_player("league", "ann"), archived);
    assert!(store.adjust_score("league", "ann", &PlayerDelta::default()).is_err());
    assert!(store.get("league").unwrap().archived);

    store.unarchive("league", "owner").unwrap();
    store.add_player("league", "bob").unwrap();
}

#[test]
fn adjust_score_is_additive() {
    let store = store_with_board(GameType::Points);
    store.add_player("league", "cid").unwrap();
    let plus = PlayerDelta {
        points: 7,
        ..PlayerDelta::default()
    };
    let minus = PlayerDelta {
        points: -3,
        ..PlayerDelta::default()
    };
    store.adjust_score("league", "cid", &plus).unwrap();
    let board = store.adjust_score("league", "cid", &minus).unwrap();
    assert_eq!(board.players["cid"].points, 4);
}

#[test]
fn every_mutation_saves_full_state() {
    let persistence = Arc::new(MemoryPersistence::new());
    let store = ScoreboardStore::open(persistence.clone()).unwrap();
    store.create("a", GameType::Points, "me").unwrap();
    store.create("b", GameType::Elo, "me").unwrap();
    store.add_player("b", "ann").unwrap();

    assert_eq!(persistence.save_count(), 3);
    let saved = persistence.saved();
    assert_eq!(saved.len(), 2);
    assert!(saved["b"].has_player("ann"));
}

#[test]
fn failed_update_leaves_state_untouched() {
    let persistence = Arc::new(MemoryPersistence::new());
    let store = ScoreboardStore::open(persistence.clone()).unwrap();
    store.create("a", GameType::Points, "me").unwrap();
    let before = store.snapshot();
    let saves = persistence.save_count();

    let result: Result<(), _> = store.update("a", |board| {
        board.archived = true;
        Err(ScoreboardError::InvalidName)
    });
    assert!(result.is_err());
    assert_eq!(store.snapshot(), before);
    assert_eq!(persistence.save_count(), saves);
}

#[test]
fn json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scoreboards.json");

    {
        let store = ScoreboardStore::open(JsonFilePersistence::new(&path)).unwrap();
        store.create("chess", GameType::Elo, "ann").unwrap();
        store.add_player("chess", "ann").unwrap();
        store.archive("chess", "ann").unwrap();
    }

    let reopened = ScoreboardStore::open(JsonFilePersistence::new(&path)).unwrap();
    let board = reopened.get("chess").unwrap();
    assert_eq!(board.game_type, GameType::Elo);
    assert_eq!(board.owner, "ann");
    assert!(board.archived);
    assert_eq!(board.players["ann"].elo, DEFAULT_ELO);
}

#[test]
fn missing_json_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    assert!(JsonFilePersistence::new(&path).load().unwrap().is_empty());
}
