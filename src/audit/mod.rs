//! Pure field-level diff between issue snapshots.
//!
//! The auditor compares the trackable field set between a pre- and
//! post-mutation snapshot and renders every difference as a display-ready
//! old/new string pair. Timestamps, `position`, and `sequence_number` are
//! deliberately outside the trackable set.

use crate::model::Issue;

/// Fields whose changes are recorded in the history trail.
pub const TRACKED_FIELDS: [&str; 6] = [
    "title",
    "description",
    "status",
    "priority",
    "assignee",
    "issue_type",
];

/// One detected field change, rendered for the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old_value: String,
    pub new_value: String,
}

/// Compare two issue snapshots and return one change per trackable field
/// whose value differs.
///
/// Assignees render by username; absent values render as the empty string.
/// Enum fields render by their storage string (e.g. `IN_PROGRESS`).
#[must_use]
pub fn diff_issues(before: &Issue, after: &Issue) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    if before.title != after.title {
        changes.push(FieldChange {
            field: "title",
            old_value: before.title.clone(),
            new_value: after.title.clone(),
        });
    }

    if before.description != after.description {
        changes.push(FieldChange {
            field: "description",
            old_value: render_opt(before.description.as_deref()),
            new_value: render_opt(after.description.as_deref()),
        });
    }

    if before.status != after.status {
        changes.push(FieldChange {
            field: "status",
            old_value: before.status.as_str().to_string(),
            new_value: after.status.as_str().to_string(),
        });
    }

    if before.priority != after.priority {
        changes.push(FieldChange {
            field: "priority",
            old_value: before.priority.as_str().to_string(),
            new_value: after.priority.as_str().to_string(),
        });
    }

    if before.assignee != after.assignee {
        changes.push(FieldChange {
            field: "assignee",
            old_value: render_opt(before.assignee.as_deref()),
            new_value: render_opt(after.assignee.as_deref()),
        });
    }

    if before.issue_type != after.issue_type {
        changes.push(FieldChange {
            field: "issue_type",
            old_value: before.issue_type.as_str().to_string(),
            new_value: after.issue_type.as_str().to_string(),
        });
    }

    changes
}

fn render_opt(value: Option<&str>) -> String {
    value.unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IssueType, Priority, Status};
    use chrono::Utc;

    fn issue() -> Issue {
        let now = Utc::now();
        Issue {
            id: 1,
            project_id: 1,
            project_key: "PROJ".to_string(),
            sequence_number: 1,
            position: 0,
            title: "Fix login".to_string(),
            description: None,
            issue_type: IssueType::Task,
            priority: Priority::Medium,
            status: Status::Todo,
            assignee: None,
            reporter: "alice".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn identical_snapshots_yield_no_changes() {
        let before = issue();
        assert!(diff_issues(&before, &before.clone()).is_empty());
    }

    #[test]
    fn status_change_renders_storage_strings() {
        let before = issue();
        let mut after = before.clone();
        after.status = Status::Done;

        let changes = diff_issues(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "status");
        assert_eq!(changes[0].old_value, "TODO");
        assert_eq!(changes[0].new_value, "DONE");
    }

    #[test]
    fn multiple_changes_emit_one_entry_each() {
        let before = issue();
        let mut after = before.clone();
        after.title = "Fix logout".to_string();
        after.priority = Priority::High;
        after.assignee = Some("bob".to_string());

        let changes = diff_issues(&before, &after);
        let fields: Vec<_> = changes.iter().map(|c| c.field).collect();
        assert_eq!(fields, vec!["title", "priority", "assignee"]);
    }

    #[test]
    fn absent_assignee_renders_empty() {
        let before = issue();
        let mut after = before.clone();
        after.assignee = Some("bob".to_string());

        let changes = diff_issues(&before, &after);
        assert_eq!(changes[0].old_value, "");
        assert_eq!(changes[0].new_value, "bob");
    }

    #[test]
    fn full_change_emits_every_tracked_field_in_order() {
        let before = issue();
        let mut after = before.clone();
        after.title = "Fix logout".to_string();
        after.description = Some("repro steps".to_string());
        after.status = Status::Done;
        after.priority = Priority::Critical;
        after.assignee = Some("bob".to_string());
        after.issue_type = IssueType::Bug;

        let fields: Vec<_> = diff_issues(&before, &after)
            .iter()
            .map(|c| c.field)
            .collect();
        assert_eq!(fields, TRACKED_FIELDS);
    }

    #[test]
    fn untracked_fields_are_ignored() {
        let before = issue();
        let mut after = before.clone();
        after.position = 99;
        after.updated_at = Utc::now() + chrono::Duration::hours(1);

        assert!(diff_issues(&before, &after).is_empty());
    }
}
