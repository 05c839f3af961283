//! Project membership gate.
//!
//! Access to a project's issues is owner-or-member. Every issue read/write,
//! comment write, and reorder operation passes through this gate before any
//! allocation, ordering, or audit logic runs. The functions take a plain
//! connection so they work both inside transactions (which deref to
//! `Connection`) and outside them.

use crate::error::{Result, SpindleError};
use rusqlite::{Connection, OptionalExtension, params};

/// Whether a principal may view or mutate a project's issues.
///
/// True iff the principal owns the project or is a member.
///
/// # Errors
///
/// Returns `ProjectNotFound` if the project row does not exist.
pub fn can_access(conn: &Connection, username: &str, project_id: i64) -> Result<bool> {
    let owner: Option<String> = conn
        .query_row(
            "SELECT owner FROM projects WHERE id = ?1",
            params![project_id],
            |row| row.get(0),
        )
        .optional()?;

    let Some(owner) = owner else {
        return Err(SpindleError::ProjectNotFound {
            project: project_id.to_string(),
        });
    };

    if owner == username {
        return Ok(true);
    }

    let member: bool = conn
        .prepare("SELECT 1 FROM project_members WHERE project_id = ?1 AND username = ?2")?
        .exists(params![project_id, username])?;

    Ok(member)
}

/// Enforce the membership gate, failing with `Forbidden` on denial.
///
/// # Errors
///
/// Returns `Forbidden` if the principal has no access, `ProjectNotFound`
/// if the project does not exist.
pub fn require_access(conn: &Connection, username: &str, project_id: i64) -> Result<()> {
    if can_access(conn, username, project_id)? {
        Ok(())
    } else {
        Err(SpindleError::Forbidden {
            username: username.to_string(),
            project: project_id.to_string(),
        })
    }
}

/// Whether the principal owns the project.
///
/// # Errors
///
/// Returns `ProjectNotFound` if the project row does not exist.
pub fn is_owner(conn: &Connection, username: &str, project_id: i64) -> Result<bool> {
    let owner: Option<String> = conn
        .query_row(
            "SELECT owner FROM projects WHERE id = ?1",
            params![project_id],
            |row| row.get(0),
        )
        .optional()?;

    match owner {
        Some(owner) => Ok(owner == username),
        None => Err(SpindleError::ProjectNotFound {
            project: project_id.to_string(),
        }),
    }
}
