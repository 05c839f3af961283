//! History storage operations.
//!
//! Implements persistence for the field-level audit trail:
//! - entry insertion, always inside the mutating transaction
//! - retrieval in commit order (timestamp ascending, id tie-break)
//!
//! History rows never outlive their issue; the schema cascades deletes.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};

use crate::error::Result;
use crate::model::HistoryEntry;

/// Insert a history entry within a transaction.
///
/// This must be called within the same transaction as the mutation it
/// describes, with the timestamp of that mutation, so a change and its
/// audit record commit or abort together. The caller owns the transaction.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub fn insert_entry(
    tx: &Connection,
    issue_id: i64,
    actor: &str,
    field: &str,
    old_value: &str,
    new_value: &str,
    created_at: DateTime<Utc>,
) -> Result<i64> {
    tx.execute(
        r"
        INSERT INTO history (issue_id, actor, field, old_value, new_value, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ",
        params![
            issue_id,
            actor,
            field,
            old_value,
            new_value,
            created_at.to_rfc3339(),
        ],
    )?;

    Ok(tx.last_insert_rowid())
}

/// Fetch the history for an issue, oldest first.
///
/// Entries committed together share a timestamp; the autoincrement id keeps
/// their retrieval order stable.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_history(conn: &Connection, issue_id: i64) -> Result<Vec<HistoryEntry>> {
    let mut stmt = conn.prepare(
        r"
        SELECT id, issue_id, actor, field, old_value, new_value, created_at
        FROM history
        WHERE issue_id = ?1
        ORDER BY created_at ASC, id ASC
        ",
    )?;

    let entries = stmt
        .query_map(params![issue_id], |row| {
            Ok(HistoryEntry {
                id: row.get(0)?,
                issue_id: row.get(1)?,
                actor: row.get(2)?,
                field: row.get(3)?,
                old_value: row.get(4)?,
                new_value: row.get(5)?,
                created_at: super::parse_timestamp(&row.get::<_, String>(6)?),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::apply_schema;
    use rusqlite::Connection;

    fn seeded_conn() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        let now = Utc::now().to_rfc3339();
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
        conn.execute(
            "INSERT INTO issues (project_id, sequence_number, position, title, issue_type,
                                 priority, status, reporter, created_at, updated_at)
             VALUES (?1, 1, 0, 'T', 'TASK', 'MEDIUM', 'TODO', 'alice', ?2, ?2)",
            params![project_id, now],
        )
        .unwrap();
        let issue_id = conn.last_insert_rowid();
        (conn, issue_id)
    }

    #[test]
    fn entries_come_back_in_insert_order() {
        let (conn, issue_id) = seeded_conn();
        let at = Utc::now();
        insert_entry(&conn, issue_id, "alice", "status", "TODO", "IN_PROGRESS", at).unwrap();
        insert_entry(&conn, issue_id, "alice", "priority", "MEDIUM", "HIGH", at).unwrap();

        let entries = get_history(&conn, issue_id).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].field, "status");
        assert_eq!(entries[1].field, "priority");
        assert_eq!(entries[0].created_at, entries[1].created_at);
    }

    #[test]
    fn history_is_scoped_per_issue() {
        let (conn, issue_id) = seeded_conn();
        insert_entry(&conn, issue_id, "alice", "title", "a", "b", Utc::now()).unwrap();
        assert!(get_history(&conn, issue_id + 1).unwrap().is_empty());
    }
}
