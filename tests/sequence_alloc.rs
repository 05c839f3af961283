//! Sequence allocation under concurrency.
//!
//! Competing creations on the same project must never be handed the same
//! number; abandoned claims leave gaps that are never reused.

mod common;

use spindle_rust::store::{NewIssue, SqliteStore};
use std::thread;

const WRITERS: usize = 4;
const PER_WRITER: usize = 5;

#[test]
fn concurrent_creations_get_distinct_numbers() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spindle.db");

    let project_id = {
        let mut store = SqliteStore::open_with_timeout(&path, Some(10_000)).unwrap();
        store.create_principal("alice", "", "").unwrap();
        let project = store.create_project("Board", "PROJ", "", "alice").unwrap();
        project.id
    };

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let path = path.clone();
            thread::spawn(move || {
                let mut store = SqliteStore::open_with_timeout(&path, Some(10_000)).unwrap();
                let mut numbers = Vec::with_capacity(PER_WRITER);
                for i in 0..PER_WRITER {
                    let mutation = store
                        .create_issue(
                            project_id,
                            &NewIssue {
                                title: format!("writer {writer} issue {i}"),
                                ..NewIssue::default()
                            },
                            "alice",
                        )
                        .unwrap();
                    numbers.push(mutation.issue.sequence_number);
                }
                numbers
            })
        })
        .collect();

    let mut all: Vec<i64> = Vec::new();
    for handle in handles {
        all.extend(handle.join().unwrap());
    }

    let mut deduped = all.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(
        deduped.len(),
        all.len(),
        "duplicate sequence numbers handed out: {all:?}"
    );

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(
        store.count_issues().unwrap(),
        i64::try_from(WRITERS * PER_WRITER).unwrap()
    );
}

#[test]
fn abandoned_claim_leaves_a_gap() {
    let (mut store, project_id) = common::seeded_db();

    let first = store
        .create_issue(project_id, &common::new_issue("first"), "alice")
        .unwrap();
    assert_eq!(first.issue.sequence_number, 1);

    // Claim a number and walk away from it
    let claimed = store.allocate_sequence(project_id).unwrap();
    assert_eq!(claimed, 2);

    let next = store
        .create_issue(project_id, &common::new_issue("next"), "alice")
        .unwrap();
    assert_eq!(next.issue.sequence_number, 3, "claimed number was reused");
}

#[test]
fn allocation_for_missing_project_is_not_found() {
    let (store, _) = common::seeded_db();
    let err = store.allocate_sequence(9999).unwrap_err();
    assert!(matches!(
        err,
        spindle_rust::error::SpindleError::ProjectNotFound { .. }
    ));
}
