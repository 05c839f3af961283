#![allow(dead_code)]

use spindle_rust::store::{NewIssue, SqliteStore};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(spindle_rust::logging::init_test_logging);
}

/// Fresh in-memory store.
pub fn test_db() -> SqliteStore {
    init_test_logging();
    SqliteStore::open_memory().unwrap()
}

/// Store with alice (owner of PROJ), bob (member), and mallory (registered
/// outsider). Returns the project id.
pub fn seeded_db() -> (SqliteStore, i64) {
    let mut store = test_db();
    store
        .create_principal("alice", "Alice", "alice@example.com")
        .unwrap();
    store
        .create_principal("bob", "Bob", "bob@example.com")
        .unwrap();
    store.create_principal("mallory", "", "").unwrap();
    let project = store.create_project("Board", "PROJ", "", "alice").unwrap();
    store.add_member(project.id, "bob", "alice").unwrap();
    (store, project.id)
}

pub fn new_issue(title: &str) -> NewIssue {
    NewIssue {
        title: title.to_string(),
        ..NewIssue::default()
    }
}
