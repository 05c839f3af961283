//! Project deletion cascades and its authorization.

mod common;

use common::{new_issue, seeded_db};
use spindle_rust::error::SpindleError;
use spindle_rust::store::IssueUpdate;

fn populate(store: &mut spindle_rust::store::SqliteStore, project_id: i64) {
    let a = store
        .create_issue(project_id, &new_issue("a"), "alice")
        .unwrap();
    store
        .create_issue(project_id, &new_issue("b"), "bob")
        .unwrap();
    store
        .update_issue(
            a.issue.id,
            &IssueUpdate {
                status: Some(spindle_rust::model::Status::Done),
                ..IssueUpdate::default()
            },
            "alice",
        )
        .unwrap();
    store.add_comment(a.issue.id, "looks good", "bob").unwrap();
}

#[test]
fn only_the_owner_may_delete() {
    let (mut store, project_id) = seeded_db();

    let err = store.delete_project(project_id, "bob").unwrap_err();
    assert!(matches!(err, SpindleError::Forbidden { .. }));

    let err = store.delete_project(project_id, "mallory").unwrap_err();
    assert!(matches!(err, SpindleError::Forbidden { .. }));

    store.delete_project(project_id, "alice").unwrap();
    assert!(store.get_project(project_id).unwrap().is_none());
}

#[test]
fn delete_leaves_no_orphans() {
    let (mut store, project_id) = seeded_db();
    populate(&mut store, project_id);

    assert_eq!(store.count_issues().unwrap(), 2);
    assert_eq!(store.count_history().unwrap(), 1);
    assert_eq!(store.count_comments().unwrap(), 1);
    assert_eq!(store.count_members().unwrap(), 1);

    store.delete_project(project_id, "alice").unwrap();

    assert_eq!(store.count_issues().unwrap(), 0);
    assert_eq!(store.count_history().unwrap(), 0);
    assert_eq!(store.count_comments().unwrap(), 0);
    assert_eq!(store.count_members().unwrap(), 0);
}

#[test]
fn delete_spares_other_projects() {
    let (mut store, project_id) = seeded_db();
    populate(&mut store, project_id);

    let other = store.create_project("Other", "OTH", "", "alice").unwrap();
    store
        .create_issue(other.id, &new_issue("keep me"), "alice")
        .unwrap();

    store.delete_project(project_id, "alice").unwrap();

    assert_eq!(store.count_issues().unwrap(), 1);
    let kept = store.list_issues(other.id, "alice").unwrap();
    assert_eq!(kept[0].title, "keep me");
}

#[test]
fn deleting_twice_is_not_found() {
    let (mut store, project_id) = seeded_db();
    store.delete_project(project_id, "alice").unwrap();

    let err = store.delete_project(project_id, "alice").unwrap_err();
    assert!(matches!(err, SpindleError::ProjectNotFound { .. }));
}
