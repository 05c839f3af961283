//! Database schema definitions.

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the spindle database.
///
/// Ownership edges are enforced with foreign keys:
/// - project -> issues, members, and issue history/comments cascade on delete
/// - owner and reporter references RESTRICT (a principal cannot be removed
///   while owning projects or having reported issues)
/// - assignee references SET NULL
pub const SCHEMA_SQL: &str = r"
    -- Principals
    CREATE TABLE IF NOT EXISTS principals (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        display_name TEXT NOT NULL DEFAULT '',
        email TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL
    );

    -- Projects
    -- next_sequence is the persistent per-project allocation counter; it only
    -- ever grows, so committed sequence numbers are never reissued.
    CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        key TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT '',
        owner TEXT NOT NULL REFERENCES principals(username) ON DELETE RESTRICT,
        next_sequence INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        CHECK (length(key) >= 1 AND length(key) <= 10),
        CHECK (length(name) >= 1 AND length(name) <= 100)
    );
    CREATE INDEX IF NOT EXISTS idx_projects_owner ON projects(owner);

    -- Project membership (owner excluded; owner access is implicit)
    CREATE TABLE IF NOT EXISTS project_members (
        project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        username TEXT NOT NULL REFERENCES principals(username) ON DELETE CASCADE,
        added_by TEXT NOT NULL DEFAULT '',
        added_at TEXT NOT NULL,
        PRIMARY KEY (project_id, username)
    );
    CREATE INDEX IF NOT EXISTS idx_project_members_username ON project_members(username);

    -- Issues
    -- (project_id, sequence_number) uniqueness backstops the allocator.
    CREATE TABLE IF NOT EXISTS issues (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        sequence_number INTEGER NOT NULL,
        position INTEGER NOT NULL DEFAULT 0,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        issue_type TEXT NOT NULL,
        priority TEXT NOT NULL,
        status TEXT NOT NULL,
        assignee TEXT REFERENCES principals(username) ON DELETE SET NULL,
        reporter TEXT NOT NULL REFERENCES principals(username) ON DELETE RESTRICT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (project_id, sequence_number),
        CHECK (length(title) >= 1 AND length(title) <= 200),
        CHECK (sequence_number >= 1)
    );
    CREATE INDEX IF NOT EXISTS idx_issues_project_position ON issues(project_id, position, id);
    CREATE INDEX IF NOT EXISTS idx_issues_status ON issues(status);
    CREATE INDEX IF NOT EXISTS idx_issues_assignee ON issues(assignee);
    CREATE INDEX IF NOT EXISTS idx_issues_updated_at ON issues(updated_at);

    -- History (field-level audit)
    CREATE TABLE IF NOT EXISTS history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        issue_id INTEGER NOT NULL REFERENCES issues(id) ON DELETE CASCADE,
        actor TEXT NOT NULL,
        field TEXT NOT NULL,
        old_value TEXT NOT NULL DEFAULT '',
        new_value TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_history_issue_id ON history(issue_id, id);
    CREATE INDEX IF NOT EXISTS idx_history_created_at ON history(created_at);
    CREATE INDEX IF NOT EXISTS idx_history_actor ON history(actor);

    -- Comments
    CREATE TABLE IF NOT EXISTS comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        issue_id INTEGER NOT NULL REFERENCES issues(id) ON DELETE CASCADE,
        author TEXT NOT NULL,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_comments_issue_id ON comments(issue_id);
    CREATE INDEX IF NOT EXISTS idx_comments_created_at ON comments(created_at);

    -- Metadata
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// Apply the schema to the database.
///
/// This uses `execute_batch` to run the entire DDL script.
/// It is idempotent because all statements use `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set journal mode to WAL for concurrency
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Enable foreign keys (cascade deletes depend on this)
    conn.pragma_update(None, "foreign_keys", "ON")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_apply_schema() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).expect("Failed to apply schema");

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert!(tables.contains(&"principals".to_string()));
        assert!(tables.contains(&"projects".to_string()));
        assert!(tables.contains(&"project_members".to_string()));
        assert!(tables.contains(&"issues".to_string()));
        assert!(tables.contains(&"history".to_string()));
        assert!(tables.contains(&"comments".to_string()));

        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        // In-memory DBs use MEMORY journaling, regardless of what we set
        assert!(journal_mode.to_uppercase() == "WAL" || journal_mode.to_uppercase() == "MEMORY");

        let foreign_keys: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(foreign_keys, 1);
    }

    #[test]
    fn test_apply_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        apply_schema(&conn).unwrap();
    }
}
