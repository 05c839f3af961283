//! Board ordering: position assignment and bulk reorder.
//!
//! `position` expresses the intra-project total order; ties break by issue
//! id so listings stay deterministic. Positions carry no uniqueness
//! requirement and are never audited.

use crate::error::Result;
use chrono::Utc;
use rusqlite::{Connection, Transaction, params};
use serde::{Deserialize, Serialize};

/// One requested position change in a bulk reorder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReorderItem {
    pub issue_id: i64,
    pub position: i64,
}

/// Per-item result of a bulk reorder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReorderOutcome {
    pub issue_id: i64,
    /// False when the id resolved to no issue (skipped, not an error).
    pub applied: bool,
}

/// Position for a newly created issue: append after everything already in
/// the project, or 0 when the project is empty.
///
/// Runs inside the creation transaction so competing creations serialize
/// against the same write lock as the insert itself.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn next_position(conn: &Connection, project_id: i64) -> Result<i64> {
    let position: i64 = conn.query_row(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM issues WHERE project_id = ?1",
        params![project_id],
        |row| row.get(0),
    )?;
    Ok(position)
}

/// Apply a client-supplied reorder batch.
///
/// Each pair is applied independently; an id that resolves to no issue is
/// silently skipped and reported as `applied = false`. This is the
/// best-effort policy appropriate for drag-and-drop reordering, where
/// partial application is acceptable. The whole batch shares one
/// transaction, so concurrent reorders of the same issue resolve to
/// whichever batch committed last.
///
/// Callers must have verified project membership for every referenced
/// issue before invoking this; no authorization happens here.
///
/// # Errors
///
/// Returns an error only on database failure, never for unknown ids.
pub fn apply_reorder(tx: &Transaction<'_>, items: &[ReorderItem]) -> Result<Vec<ReorderOutcome>> {
    let now = Utc::now().to_rfc3339();
    let mut outcomes = Vec::with_capacity(items.len());

    for item in items {
        let rows = tx.execute(
            "UPDATE issues SET position = ?1, updated_at = ?2 WHERE id = ?3",
            params![item.position, now, item.issue_id],
        )?;
        outcomes.push(ReorderOutcome {
            issue_id: item.issue_id,
            applied: rows > 0,
        });
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::apply_schema;
    use rusqlite::Connection;

    fn seeded_conn() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO principals (username, created_at) VALUES ('alice', ?1)",
            params![now],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO projects (name, key, owner, created_at) VALUES ('Board', 'PROJ', 'alice', ?1)",
            params![now],
        )
        .unwrap();
        let project_id = conn.last_insert_rowid();
        (conn, project_id)
    }

    fn insert_issue(conn: &Connection, project_id: i64, seq: i64, position: i64) -> i64 {
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO issues (project_id, sequence_number, position, title, issue_type,
                                 priority, status, reporter, created_at, updated_at)
             VALUES (?1, ?2, ?3, 'T', 'TASK', 'MEDIUM', 'TODO', 'alice', ?4, ?4)",
            params![project_id, seq, position, now],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    #[test]
    fn empty_project_starts_at_zero() {
        let (conn, project_id) = seeded_conn();
        assert_eq!(next_position(&conn, project_id).unwrap(), 0);
    }

    #[test]
    fn appends_after_existing_issues() {
        let (conn, project_id) = seeded_conn();
        insert_issue(&conn, project_id, 1, 0);
        assert_eq!(next_position(&conn, project_id).unwrap(), 1);
        insert_issue(&conn, project_id, 2, 5);
        assert_eq!(next_position(&conn, project_id).unwrap(), 6);
    }

    #[test]
    fn reorder_skips_unknown_ids() {
        let (mut conn, project_id) = seeded_conn();
        let id = insert_issue(&conn, project_id, 1, 0);

        let tx = conn.transaction().unwrap();
        let outcomes = apply_reorder(
            &tx,
            &[
                ReorderItem {
                    issue_id: id,
                    position: 9,
                },
                ReorderItem {
                    issue_id: 424_242,
                    position: 1,
                },
            ],
        )
        .unwrap();
        tx.commit().unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].applied);
        assert!(!outcomes[1].applied);

        let position: i64 = conn
            .query_row("SELECT position FROM issues WHERE id = ?1", params![id], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(position, 9);
    }
}
