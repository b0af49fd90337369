//! Unit tests for app.rs logic

use super::*;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::backend::TestBackend;
use tempfile::TempDir;

use crate::db::{
    BoardSnapshot, KeyValueStore, MockKeyValueStore, StoreError, TaskStatus, CORRUPT_LISTS_KEY, LISTS_KEY,
};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn press(state: &mut AppState, code: KeyCode) {
    state.handle_key(key(code)).unwrap();
}

fn type_text(state: &mut AppState, text: &str) {
    for c in text.chars() {
        press(state, KeyCode::Char(c));
    }
}

/// Create a task through the form, exactly as a user would
fn create_task(state: &mut AppState, title: &str, description: &str) {
    press(state, KeyCode::Char('n'));
    type_text(state, title);
    press(state, KeyCode::Enter);
    type_text(state, description);
    press(state, KeyCode::Enter);
}

fn db_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("board.db")
}

fn file_state(dir: &TempDir) -> AppState {
    let db = Database::open(&db_path(dir)).unwrap();
    AppState::new(BoardStore::new(Box::new(db)), GlobalConfig::default()).unwrap()
}

/// Read back what is currently persisted, through a second connection
fn stored_snapshot(dir: &TempDir) -> BoardSnapshot {
    let db = Database::open(&db_path(dir)).unwrap();
    let bytes = db.get(LISTS_KEY).unwrap().expect("board record exists");
    BoardStore::decode(&bytes).unwrap()
}

fn mock_with_empty_board() -> MockKeyValueStore {
    let mut kv = MockKeyValueStore::new();
    kv.expect_contains().returning(|_| Ok(true));
    kv.expect_get()
        .returning(|_| Ok(Some(b"[[],[],[]]".to_vec())));
    kv
}

fn mock_state(kv: MockKeyValueStore) -> AppState {
    AppState::new(BoardStore::new(Box::new(kv)), GlobalConfig::default()).unwrap()
}

fn render_to_string(state: &AppState) -> String {
    let backend = TestBackend::new(120, 30);
    let mut terminal = ratatui::Terminal::new(backend).unwrap();
    terminal.draw(|frame| state.render(frame)).unwrap();

    let buffer = terminal.backend().buffer();
    buffer.content().iter().map(|c| c.symbol()).collect()
}

#[test]
fn test_first_run_persists_empty_board() {
    let dir = TempDir::new().unwrap();
    let state = file_state(&dir);

    assert!(state.board().is_empty());
    assert!(!state.is_form_active());
    assert_eq!(stored_snapshot(&dir), BoardSnapshot::empty());
}

#[test]
fn test_create_advance_delete_scenario() {
    let dir = TempDir::new().unwrap();
    let mut state = file_state(&dir);
    assert_eq!(state.board().focused(), TaskStatus::Todo);

    create_task(&mut state, "Buy milk", "2%");
    assert!(!state.is_form_active());
    assert_eq!(state.board().column(TaskStatus::Todo).len(), 1);
    assert!(state.board().column(TaskStatus::InProgress).is_empty());
    assert!(state.board().column(TaskStatus::Done).is_empty());

    let task = state.board().selected_task().unwrap();
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, "2%");
    assert_eq!(task.status(), TaskStatus::Todo);

    // Advance once
    press(&mut state, KeyCode::Enter);
    assert!(state.board().column(TaskStatus::Todo).is_empty());
    let moved = &state.board().column(TaskStatus::InProgress).tasks()[0];
    assert_eq!(moved.title, "Buy milk");
    assert_eq!(moved.status(), TaskStatus::InProgress);
    assert_eq!(state.board().len(), 1);

    // Focus in-progress and delete it
    press(&mut state, KeyCode::Char('l'));
    press(&mut state, KeyCode::Char('d'));
    assert!(state.board().is_empty());

    press(&mut state, KeyCode::Char('q'));
    assert!(state.should_quit());
    assert_eq!(stored_snapshot(&dir), BoardSnapshot::empty());
}

#[test]
fn test_form_submission_targets_focused_column() {
    let dir = TempDir::new().unwrap();
    let mut state = file_state(&dir);
    create_task(&mut state, "first", "");

    press(&mut state, KeyCode::Right);
    create_task(&mut state, "T", "D");

    let in_progress = state.board().column(TaskStatus::InProgress).tasks();
    assert_eq!(
        in_progress.last(),
        Some(&Task::new(TaskStatus::InProgress, "T", "D"))
    );
    let todo = state.board().column(TaskStatus::Todo).tasks();
    assert_eq!(todo, &[Task::new(TaskStatus::Todo, "first", "")]);
    assert!(state.board().column(TaskStatus::Done).is_empty());
}

#[test]
fn test_board_keys_are_typed_into_form() {
    let dir = TempDir::new().unwrap();
    let mut state = file_state(&dir);

    press(&mut state, KeyCode::Char('n'));
    type_text(&mut state, "ndq");
    let form = state.form().expect("form is active");
    assert_eq!(form.title().value(), "ndq");
    assert!(!state.should_quit());
    assert!(state.board().is_empty());
}

#[test]
fn test_new_task_flushes_before_form_opens() {
    let mut kv = mock_with_empty_board();
    kv.expect_set()
        .withf(|key: &str, _value: &[u8]| key == LISTS_KEY)
        .times(1)
        .returning(|_, _| Ok(()));

    let mut state = mock_state(kv);
    press(&mut state, KeyCode::Char('n'));

    assert!(state.is_form_active());
    assert_eq!(state.form().unwrap().target_status(), TaskStatus::Todo);
}

#[test]
fn test_new_task_does_not_open_form_when_flush_fails() {
    let mut kv = mock_with_empty_board();
    kv.expect_set().returning(|_, _| Err(StoreError::Closed));

    let mut state = mock_state(kv);
    assert!(state.handle_key(key(KeyCode::Char('n'))).is_err());
    assert!(!state.is_form_active());
}

#[test]
fn test_escape_cancels_form() {
    let mut kv = mock_with_empty_board();
    kv.expect_set().times(1).returning(|_, _| Ok(()));

    let mut state = mock_state(kv);
    press(&mut state, KeyCode::Char('n'));
    type_text(&mut state, "draft");
    press(&mut state, KeyCode::Esc);

    assert!(!state.is_form_active());
    assert!(state.board().is_empty());
    assert!(!state.should_quit());
}

#[test]
fn test_quit_flushes_and_closes() {
    let mut kv = mock_with_empty_board();
    kv.expect_set()
        .withf(|key: &str, value: &[u8]| {
            key == LISTS_KEY
                && BoardStore::decode(value)
                    .map(|s| s.column(TaskStatus::Done).len() == 1)
                    .unwrap_or(false)
        })
        .times(1)
        .returning(|_, _| Ok(()));
    kv.expect_close().times(1).returning(|| Ok(()));

    let mut state = mock_state(kv);
    state.board.insert_task(Task::new(TaskStatus::Done, "shipped", ""));
    press(&mut state, KeyCode::Char('q'));

    assert!(state.should_quit());
}

#[test]
fn test_interrupt_skips_flush() {
    let mut kv = mock_with_empty_board();
    kv.expect_set().never();
    kv.expect_close().never();

    let mut state = mock_state(kv);
    state.board.insert_task(Task::new(TaskStatus::Todo, "unsaved", ""));
    state.handle_key(ctrl('c')).unwrap();

    assert!(state.should_quit());
}

#[test]
fn test_interrupt_during_form_terminates() {
    let mut kv = mock_with_empty_board();
    // Only the write-through when the form opens
    kv.expect_set().times(1).returning(|_, _| Ok(()));
    kv.expect_close().never();

    let mut state = mock_state(kv);
    press(&mut state, KeyCode::Char('n'));
    type_text(&mut state, "half");
    state.handle_key(ctrl('c')).unwrap();

    assert!(state.should_quit());
    assert!(state.board().is_empty());
}

#[test]
fn test_quit_propagates_storage_failure() {
    let mut kv = mock_with_empty_board();
    kv.expect_set().returning(|_, _| Err(StoreError::Closed));
    kv.expect_close().never();

    let mut state = mock_state(kv);
    let err = state.handle_key(key(KeyCode::Char('q'))).unwrap_err();

    assert!(format!("{:#}", err).contains("Failed to save board"));
    assert!(!state.should_quit());
}

#[test]
fn test_advance_and_delete_on_empty_column_are_noops() {
    let mut kv = mock_with_empty_board();
    kv.expect_set().never();

    let mut state = mock_state(kv);
    press(&mut state, KeyCode::Enter);
    press(&mut state, KeyCode::Char('d'));
    press(&mut state, KeyCode::Backspace);

    assert!(state.board().is_empty());
    assert!(!state.should_quit());
}

#[test]
fn test_corrupt_board_starts_empty_with_notice() {
    let dir = TempDir::new().unwrap();
    {
        let db = Database::open(&db_path(&dir)).unwrap();
        db.set(LISTS_KEY, b"{ definitely not a board").unwrap();
    }

    let state = file_state(&dir);
    assert!(state.board().is_empty());
    assert!(state.notice().unwrap().contains("could not be read"));

    let db = Database::open(&db_path(&dir)).unwrap();
    assert_eq!(
        db.get(CORRUPT_LISTS_KEY).unwrap(),
        Some(b"{ definitely not a board".to_vec())
    );
}

#[test]
fn test_board_survives_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut state = file_state(&dir);
        create_task(&mut state, "one", "a");
        create_task(&mut state, "two", "b");
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Char('q'));
    }

    let state = file_state(&dir);
    let todo: Vec<&str> = state
        .board()
        .column(TaskStatus::Todo)
        .tasks()
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(todo, vec!["two"]);
    assert_eq!(
        state.board().column(TaskStatus::InProgress).tasks(),
        &[Task::new(TaskStatus::InProgress, "one", "a")]
    );
}

#[test]
fn test_render_board_columns() {
    let dir = TempDir::new().unwrap();
    let mut state = file_state(&dir);
    create_task(&mut state, "Write report", "quarterly numbers");

    let screen = render_to_string(&state);
    assert!(screen.contains("To Do (1)"));
    assert!(screen.contains("In Progress (0)"));
    assert!(screen.contains("Done (0)"));
    assert!(screen.contains("Write report"));
    assert!(screen.contains("quarterly numbers"));
    assert!(screen.contains("[n] new"));
}

#[test]
fn test_render_form_popup() {
    let dir = TempDir::new().unwrap();
    let mut state = file_state(&dir);
    press(&mut state, KeyCode::Char('l'));
    press(&mut state, KeyCode::Char('n'));
    type_text(&mut state, "Draft");

    let screen = render_to_string(&state);
    assert!(screen.contains("New Task · In Progress"));
    assert!(screen.contains("Draft█"));
    assert!(screen.contains("Enter task title"));
}

#[test]
fn test_build_footer_text() {
    assert!(build_footer_text(None).contains("[q/Esc] quit"));
    assert!(build_footer_text(Some(FormStage::EditingTitle)).contains("[Enter] next"));
    assert!(build_footer_text(Some(FormStage::EditingDescription)).contains("[Enter] save"));
}

#[test]
fn test_truncate_is_char_safe() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("héllo wörld", 6), "héllo…");
    assert_eq!(truncate("abc", 0), "…");
}
