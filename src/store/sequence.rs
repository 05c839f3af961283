//! Per-project sequence number allocation.
//!
//! Sequence numbers feed the display key (`PROJ-101`). The contract:
//! strictly increasing per project, never duplicated under concurrent
//! creations, gaps allowed when a creation aborts after allocation.
//!
//! The classic backend computed `max(sequence) + 1` as a separate read and
//! write, which hands the same number to two racing creators. Here the claim
//! is a single conditional increment on the project row: `SQLite` serializes
//! the UPDATE, and `RETURNING` hands back the claimed value atomically.

use crate::error::{Result, SpindleError};
use rusqlite::{Connection, OptionalExtension, params};

/// Retry budget for allocation races surfaced as lock contention or a
/// (project, sequence) uniqueness violation at insert time.
pub const MAX_ALLOC_ATTEMPTS: u32 = 3;

/// Claim the next sequence number for a project.
///
/// The caller runs this on a connection in autocommit mode, *outside* the
/// creation transaction: the increment commits on its own, so the claimed
/// number stays burned even if the surrounding creation later aborts.
/// First allocation for a project returns 1.
///
/// # Errors
///
/// Returns `ProjectNotFound` if the project row does not exist, or a
/// database error on contention (callers retry within their budget).
pub fn allocate(conn: &Connection, project_id: i64) -> Result<i64> {
    let seq: Option<i64> = conn
        .query_row(
            "UPDATE projects SET next_sequence = next_sequence + 1
             WHERE id = ?1
             RETURNING next_sequence",
            params![project_id],
            |row| row.get(0),
        )
        .optional()?;

    seq.ok_or_else(|| SpindleError::ProjectNotFound {
        project: project_id.to_string(),
    })
}

/// Whether a rusqlite error is `SQLITE_BUSY`/`SQLITE_LOCKED` contention.
#[must_use]
pub fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::DatabaseBusy
                || e.code == rusqlite::ErrorCode::DatabaseLocked
    )
}

/// Whether a rusqlite error is the (project, sequence) uniqueness backstop
/// firing, i.e. a lost allocation race detected at insert time.
#[must_use]
pub fn is_sequence_conflict(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, Some(msg))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("issues.project_id")
                && msg.contains("issues.sequence_number")
    )
}

/// Whether an error warrants another allocation attempt.
#[must_use]
pub fn is_retryable(err: &SpindleError) -> bool {
    match err {
        SpindleError::Database(db_err) => is_busy(db_err) || is_sequence_conflict(db_err),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::apply_schema;
    use chrono::Utc;
    use rusqlite::Connection;

    fn seeded_conn() -> Connection {
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
        conn
    }

    #[test]
    fn first_allocation_is_one() {
        let conn = seeded_conn();
        let project_id = conn.last_insert_rowid();
        assert_eq!(allocate(&conn, project_id).unwrap(), 1);
        assert_eq!(allocate(&conn, project_id).unwrap(), 2);
        assert_eq!(allocate(&conn, project_id).unwrap(), 3);
    }

    #[test]
    fn missing_project_is_not_found() {
        let conn = seeded_conn();
        let err = allocate(&conn, 9999).unwrap_err();
        assert!(matches!(err, SpindleError::ProjectNotFound { .. }));
    }

    #[test]
    fn allocations_are_independent_per_project() {
        let conn = seeded_conn();
        let first = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO projects (name, key, owner, created_at) VALUES ('Other', 'OTH', 'alice', ?1)",
            params![Utc::now().to_rfc3339()],
        )
        .unwrap();
        let second = conn.last_insert_rowid();

        assert_eq!(allocate(&conn, first).unwrap(), 1);
        assert_eq!(allocate(&conn, second).unwrap(), 1);
        assert_eq!(allocate(&conn, first).unwrap(), 2);
    }

    #[test]
    fn busy_detection() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert!(is_busy(&busy));
        let other = rusqlite::Error::QueryReturnedNoRows;
        assert!(!is_busy(&other));
    }
}
