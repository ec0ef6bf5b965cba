use std::fs;
use std::sync::Arc;

use defense_core::model::{
    Answer, AnswerOption, BlockId, Question, SavedProgress, SessionState, WrongAnswerRecord,
};
use defense_core::time::fixed_now;
use storage::{JsonFileProgressStore, ProgressStore, Storage, StorageError};
use tempfile::TempDir;

fn build_snapshot() -> SavedProgress {
    let first = Arc::new(Question::single_choice(
        "1",
        "What does DNS resolve?",
        vec![
            AnswerOption::new("A", "Hostnames", true),
            AnswerOption::new("B", "MAC addresses", false),
        ],
    ));
    let second = Arc::new(Question::text_input("2", "Port of HTTPS?", ["443"]));

    let mut state = SessionState::playing(Some(BlockId::new(4)), vec![first.clone(), second]);
    state.current_index = 1;
    state.wrong_answers.push(WrongAnswerRecord {
        question: first,
        user_answer: Answer::choice("B"),
        correct_answer: "A. Hostnames".into(),
    });
    SavedProgress::capture(&state, fixed_now())
}

#[test]
fn file_store_round_trips_and_clears() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileProgressStore::in_dir(dir.path().join("nested"));

    assert!(store.load().unwrap().is_none());

    let saved = build_snapshot();
    store.save(&saved).unwrap();
    assert!(store.path().exists());

    let loaded = store.load().unwrap().expect("snapshot present");
    assert_eq!(loaded, saved);
    assert_eq!(loaded.wrong_answers[0].user_answer, Answer::choice("B"));

    store.clear().unwrap();
    assert!(!store.path().exists());
    assert!(store.load().unwrap().is_none());
    store.clear().unwrap();
}

#[test]
fn save_overwrites_previous_snapshot() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileProgressStore::in_dir(dir.path());

    let mut saved = build_snapshot();
    store.save(&saved).unwrap();
    saved.score = 1;
    store.save(&saved).unwrap();

    assert_eq!(store.load().unwrap().unwrap().score, 1);
}

#[test]
fn corrupt_file_reports_serialization_error() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileProgressStore::in_dir(dir.path());
    fs::write(store.path(), "][").unwrap();

    assert!(matches!(store.load(), Err(StorageError::Serialization(_))));
}

#[test]
fn blob_without_questions_is_invalid() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileProgressStore::in_dir(dir.path());
    fs::write(
        store.path(),
        r#"{"currentBlock":2,"currentQuestionIndex":0,"questions":[],"score":0,"savedAt":"2023-11-14T22:13:20Z"}"#,
    )
    .unwrap();

    assert!(matches!(store.load(), Err(StorageError::Invalid(_))));
}

#[test]
fn json_file_storage_uses_progress_key_file() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::json_file(dir.path());

    storage.progress.save(&build_snapshot()).unwrap();
    assert!(dir.path().join("network_defense_game_progress.json").exists());
    assert_eq!(storage.progress.load().unwrap(), Some(build_snapshot()));
}
