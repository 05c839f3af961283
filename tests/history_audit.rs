//! Field-level audit trail behavior.

mod common;

use common::{new_issue, seeded_db};
use spindle_rust::model::{IssueType, Priority, Status};
use spindle_rust::store::{IssueUpdate, NewIssue};

#[test]
fn status_change_writes_one_entry() {
    let (mut store, project_id) = seeded_db();
    let created = store
        .create_issue(project_id, &new_issue("First"), "alice")
        .unwrap();

    let mutation = store
        .update_issue(
            created.issue.id,
            &IssueUpdate {
                status: Some(Status::Done),
                ..IssueUpdate::default()
            },
            "bob",
        )
        .unwrap();

    assert_eq!(mutation.history.len(), 1);
    let entry = &mutation.history[0];
    assert_eq!(entry.field, "status");
    assert_eq!(entry.old_value, "TODO");
    assert_eq!(entry.new_value, "DONE");
    assert_eq!(entry.actor, "bob");

    let fetched = store.list_history(created.issue.id, "alice").unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].field, "status");
}

#[test]
fn multi_field_update_shares_one_timestamp() {
    let (mut store, project_id) = seeded_db();
    let created = store
        .create_issue(project_id, &new_issue("First"), "alice")
        .unwrap();

    let mutation = store
        .update_issue(
            created.issue.id,
            &IssueUpdate {
                title: Some("Renamed".to_string()),
                priority: Some(Priority::High),
                assignee: Some(Some("bob".to_string())),
                ..IssueUpdate::default()
            },
            "alice",
        )
        .unwrap();

    assert_eq!(mutation.history.len(), 3);
    let fields: Vec<_> = mutation.history.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["title", "priority", "assignee"]);

    let first = mutation.history[0].created_at;
    assert!(mutation.history.iter().all(|e| e.created_at == first));
}

#[test]
fn creation_writes_no_history() {
    let (mut store, project_id) = seeded_db();
    store
        .create_issue(
            project_id,
            &NewIssue {
                title: "First".to_string(),
                issue_type: IssueType::Bug,
                assignee: Some("bob".to_string()),
                ..NewIssue::default()
            },
            "alice",
        )
        .unwrap();

    assert_eq!(store.count_history().unwrap(), 0);
}

#[test]
fn setting_same_value_writes_nothing() {
    let (mut store, project_id) = seeded_db();
    let created = store
        .create_issue(project_id, &new_issue("First"), "alice")
        .unwrap();

    let mutation = store
        .update_issue(
            created.issue.id,
            &IssueUpdate {
                status: Some(Status::Todo),
                title: Some("First".to_string()),
                ..IssueUpdate::default()
            },
            "alice",
        )
        .unwrap();

    assert!(mutation.history.is_empty());
    assert_eq!(store.count_history().unwrap(), 0);
}

#[test]
fn clearing_assignee_renders_empty_new_value() {
    let (mut store, project_id) = seeded_db();
    let created = store
        .create_issue(
            project_id,
            &NewIssue {
                title: "First".to_string(),
                assignee: Some("bob".to_string()),
                ..NewIssue::default()
            },
            "alice",
        )
        .unwrap();

    let mutation = store
        .update_issue(
            created.issue.id,
            &IssueUpdate {
                assignee: Some(None),
                ..IssueUpdate::default()
            },
            "alice",
        )
        .unwrap();

    assert_eq!(mutation.history.len(), 1);
    assert_eq!(mutation.history[0].old_value, "bob");
    assert_eq!(mutation.history[0].new_value, "");
}

#[test]
fn history_is_ordered_across_commits() {
    let (mut store, project_id) = seeded_db();
    let created = store
        .create_issue(project_id, &new_issue("First"), "alice")
        .unwrap();

    store
        .update_issue(
            created.issue.id,
            &IssueUpdate {
                status: Some(Status::InProgress),
                ..IssueUpdate::default()
            },
            "alice",
        )
        .unwrap();
    store
        .update_issue(
            created.issue.id,
            &IssueUpdate {
                status: Some(Status::Done),
                ..IssueUpdate::default()
            },
            "bob",
        )
        .unwrap();

    let entries = store.list_history(created.issue.id, "alice").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].new_value, "IN_PROGRESS");
    assert_eq!(entries[1].new_value, "DONE");
    assert!(entries[0].created_at <= entries[1].created_at);
    assert!(entries[0].id < entries[1].id);
}
