//! `SQLite` storage implementation.
//!
//! All mutations run through [`SqliteStore::mutate`], which opens an
//! immediate-behavior transaction (taking the write lock up front, so
//! competing creations serialize), runs the operation, then flushes every
//! staged history entry inside the same transaction with one shared
//! timestamp. A change and its audit record commit or abort together.

use crate::access;
use crate::audit::{self, FieldChange};
use crate::error::{Result, SpindleError};
use crate::model::{
    Comment, HistoryEntry, Issue, IssueRef, IssueType, Principal, Priority, Project, Status,
};
use crate::notify::AssignmentChange;
use crate::store::{history, ordering, parse_timestamp, sequence};
use crate::store::{ReorderItem, ReorderOutcome};
use crate::store::schema::apply_schema;
use crate::validation::{IssueValidator, PrincipalValidator, ProjectValidator};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

/// A staged field change, flushed to the history table at commit.
#[derive(Debug, Clone)]
struct StagedChange {
    issue_id: i64,
    field: String,
    old_value: String,
    new_value: String,
}

/// Context for a mutation operation, tracking staged audit entries.
pub struct MutationContext {
    pub op_name: String,
    pub actor: String,
    staged: Vec<StagedChange>,
}

impl MutationContext {
    #[must_use]
    fn new(op_name: &str, actor: &str) -> Self {
        Self {
            op_name: op_name.to_string(),
            actor: actor.to_string(),
            staged: Vec::new(),
        }
    }

    /// Stage a field change for the history trail.
    pub fn record_change(&mut self, issue_id: i64, change: &FieldChange) {
        self.staged.push(StagedChange {
            issue_id,
            field: change.field.to_string(),
            old_value: change.old_value.clone(),
            new_value: change.new_value.clone(),
        });
    }
}

/// Fields for a new issue. Sequence number, position, and timestamps are
/// assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    pub title: String,
    pub description: Option<String>,
    pub issue_type: IssueType,
    pub priority: Priority,
    pub status: Status,
    pub assignee: Option<String>,
}

/// Partial update for an issue. `None` leaves a field untouched; the inner
/// `Option` on nullable fields distinguishes "clear" from "skip".
#[derive(Debug, Clone, Default)]
pub struct IssueUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub issue_type: Option<IssueType>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub assignee: Option<Option<String>>,
}

impl IssueUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.issue_type.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.assignee.is_none()
    }
}

/// Result of a committed create or update: the fresh issue snapshot, the
/// history entries the mutation produced, and the assignment change (if
/// any) for the notification decision.
#[derive(Debug, Clone)]
pub struct IssueMutation {
    pub issue: Issue,
    pub history: Vec<HistoryEntry>,
    pub assignment: Option<AssignmentChange>,
}

impl SqliteStore {
    /// Open a new connection to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a new connection with an optional busy timeout (ms).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open_with_timeout(path: &Path, lock_timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;
        if let Some(timeout) = lock_timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        }
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Execute a mutation inside an immediate-behavior transaction.
    ///
    /// Staged history entries are flushed before commit, all carrying one
    /// timestamp, and returned with their assigned ids. The transaction is
    /// rolled back on error.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails.
    pub fn mutate<F, R>(&mut self, op: &str, actor: &str, f: F) -> Result<(R, Vec<HistoryEntry>)>
    where
        F: FnOnce(&Transaction, &mut MutationContext) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        let mut ctx = MutationContext::new(op, actor);

        let result = f(&tx, &mut ctx)?;

        // One timestamp for the whole commit; ties order by id.
        let now = Utc::now();
        let mut entries = Vec::with_capacity(ctx.staged.len());
        for change in &ctx.staged {
            let id = history::insert_entry(
                &tx,
                change.issue_id,
                &ctx.actor,
                &change.field,
                &change.old_value,
                &change.new_value,
                now,
            )?;
            entries.push(HistoryEntry {
                id,
                issue_id: change.issue_id,
                actor: ctx.actor.clone(),
                field: change.field.clone(),
                old_value: change.old_value.clone(),
                new_value: change.new_value.clone(),
                created_at: now,
            });
        }

        tx.commit()?;
        debug!(
            op = %ctx.op_name,
            actor = %ctx.actor,
            entries = entries.len(),
            "mutation committed"
        );

        Ok((result, entries))
    }

    // ========================================================================
    // PRINCIPALS
    // ========================================================================

    /// Register a principal.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed or duplicate usernames.
    pub fn create_principal(
        &mut self,
        username: &str,
        display_name: &str,
        email: &str,
    ) -> Result<Principal> {
        PrincipalValidator::validate(username).map_err(SpindleError::from_validation_errors)?;

        let now = Utc::now();
        let insert = self.mutate("create_principal", username, |tx, _ctx| {
            tx.execute(
                "INSERT INTO principals (username, display_name, email, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![username, display_name, email, now.to_rfc3339()],
            )?;
            Ok(tx.last_insert_rowid())
        });

        match insert {
            Ok((id, _)) => Ok(Principal {
                id,
                username: username.to_string(),
                display_name: display_name.to_string(),
                email: email.to_string(),
                created_at: now,
            }),
            Err(SpindleError::Database(err)) if is_unique_violation(&err, "principals.username") => {
                Err(SpindleError::validation("username", "already registered"))
            }
            Err(err) => Err(err),
        }
    }

    /// Look up a principal by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_principal(&self, username: &str) -> Result<Option<Principal>> {
        self.conn
            .query_row(
                "SELECT id, username, display_name, email, created_at
                 FROM principals WHERE username = ?1",
                params![username],
                |row| {
                    Ok(Principal {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        display_name: row.get(2)?,
                        email: row.get(3)?,
                        created_at: parse_timestamp(&row.get::<_, String>(4)?),
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    fn require_principal(&self, username: &str) -> Result<Principal> {
        self.get_principal(username)?
            .ok_or_else(|| SpindleError::PrincipalNotFound {
                username: username.to_string(),
            })
    }

    // ========================================================================
    // PROJECTS & MEMBERSHIP
    // ========================================================================

    /// Create a project owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateProjectKey` if the key is taken, a validation
    /// error for malformed fields, `PrincipalNotFound` for unknown owners.
    pub fn create_project(
        &mut self,
        name: &str,
        key: &str,
        description: &str,
        owner: &str,
    ) -> Result<Project> {
        ProjectValidator::validate(name, key).map_err(SpindleError::from_validation_errors)?;
        self.require_principal(owner)?;

        let now = Utc::now();
        let insert = self.mutate("create_project", owner, |tx, _ctx| {
            tx.execute(
                "INSERT INTO projects (name, key, description, owner, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![name, key, description, owner, now.to_rfc3339()],
            )?;
            Ok(tx.last_insert_rowid())
        });

        match insert {
            Ok((id, _)) => Ok(Project {
                id,
                name: name.to_string(),
                key: key.to_string(),
                description: description.to_string(),
                owner: owner.to_string(),
                created_at: now,
                members: Vec::new(),
            }),
            Err(SpindleError::Database(err)) if is_unique_violation(&err, "projects.key") => {
                Err(SpindleError::DuplicateProjectKey {
                    key: key.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Look up a project by id, members included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_project(&self, project_id: i64) -> Result<Option<Project>> {
        let project = self
            .conn
            .query_row(
                "SELECT id, name, key, description, owner, created_at
                 FROM projects WHERE id = ?1",
                params![project_id],
                project_from_row,
            )
            .optional()?;

        let Some(mut project) = project else {
            return Ok(None);
        };
        project.members = self.project_members(project.id)?;
        Ok(Some(project))
    }

    /// Look up a project by its short key, members included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_project_by_key(&self, key: &str) -> Result<Option<Project>> {
        let project = self
            .conn
            .query_row(
                "SELECT id, name, key, description, owner, created_at
                 FROM projects WHERE key = ?1",
                params![key],
                project_from_row,
            )
            .optional()?;

        let Some(mut project) = project else {
            return Ok(None);
        };
        project.members = self.project_members(project.id)?;
        Ok(Some(project))
    }

    fn project_members(&self, project_id: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT username FROM project_members WHERE project_id = ?1 ORDER BY username",
        )?;
        let members = stmt
            .query_map(params![project_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(members)
    }

    /// Add a member to a project.
    ///
    /// The requester must have access to the project; beyond that anyone
    /// with access may invite. Fails with a conflict when the principal is
    /// the owner (implicit access) or already a member.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `OwnerMembership`, `AlreadyMember`,
    /// `PrincipalNotFound`, or `ProjectNotFound`.
    pub fn add_member(&mut self, project_id: i64, username: &str, requester: &str) -> Result<()> {
        access::require_access(&self.conn, requester, project_id)?;
        self.require_principal(username)?;

        if access::is_owner(&self.conn, username, project_id)? {
            return Err(SpindleError::OwnerMembership {
                username: username.to_string(),
            });
        }

        let insert = self.mutate("add_member", requester, |tx, _ctx| {
            tx.execute(
                "INSERT INTO project_members (project_id, username, added_by, added_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![project_id, username, requester, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        });

        match insert {
            Ok(((), _)) => Ok(()),
            Err(SpindleError::Database(err))
                if is_unique_violation(&err, "project_members.project_id") =>
            {
                Err(SpindleError::AlreadyMember {
                    username: username.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Delete a project and, by cascade, its issues, history, comments,
    /// and membership rows.
    ///
    /// Owner only: deletion is the most destructive operation, so it gets
    /// the strictest gate.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-owners, `ProjectNotFound` if absent.
    pub fn delete_project(&mut self, project_id: i64, requester: &str) -> Result<()> {
        if !access::is_owner(&self.conn, requester, project_id)? {
            return Err(SpindleError::Forbidden {
                username: requester.to_string(),
                project: project_id.to_string(),
            });
        }

        self.mutate("delete_project", requester, |tx, _ctx| {
            tx.execute("DELETE FROM projects WHERE id = ?1", params![project_id])?;
            Ok(())
        })?;
        Ok(())
    }

    // ========================================================================
    // ISSUES
    // ========================================================================

    /// Create a new issue: allocate the sequence number, append at the end
    /// of the board, insert, and run the notification check. The diff on
    /// create is empty by contract.
    ///
    /// Allocation races (lock contention, or the uniqueness backstop
    /// firing) are retried transparently up to the allocator's budget; an
    /// exhausted budget surfaces as `TransientStore`. An abandoned attempt
    /// burns its claimed number, so retries never reuse one.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `ProjectNotFound`, `PrincipalNotFound`,
    /// validation errors, or `TransientStore`.
    pub fn create_issue(
        &mut self,
        project_id: i64,
        new_issue: &NewIssue,
        actor: &str,
    ) -> Result<IssueMutation> {
        IssueValidator::validate_new(new_issue).map_err(SpindleError::from_validation_errors)?;
        access::require_access(&self.conn, actor, project_id)?;
        self.require_principal(actor)?;
        if let Some(assignee) = new_issue.assignee.as_deref() {
            self.require_principal(assignee)?;
        }

        let mut attempts = 0;
        let issue_id = loop {
            attempts += 1;

            let attempt = sequence::allocate(&self.conn, project_id).and_then(|seq| {
                self.mutate("create_issue", actor, |tx, _ctx| {
                    let position = ordering::next_position(tx, project_id)?;
                    let now = Utc::now().to_rfc3339();
                    tx.execute(
                        "INSERT INTO issues (project_id, sequence_number, position, title,
                                             description, issue_type, priority, status,
                                             assignee, reporter, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
                        params![
                            project_id,
                            seq,
                            position,
                            new_issue.title,
                            new_issue.description.as_deref().unwrap_or(""),
                            new_issue.issue_type.as_str(),
                            new_issue.priority.as_str(),
                            new_issue.status.as_str(),
                            new_issue.assignee,
                            actor,
                            now,
                        ],
                    )?;
                    Ok(tx.last_insert_rowid())
                })
                .map(|(id, _)| id)
            });

            match attempt {
                Ok(id) => break id,
                Err(err) if sequence::is_retryable(&err) => {
                    if attempts >= sequence::MAX_ALLOC_ATTEMPTS {
                        return Err(SpindleError::TransientStore {
                            op: "create_issue".to_string(),
                            attempts,
                        });
                    }
                    warn!(project_id, attempts, error = %err, "allocation race; retrying");
                }
                Err(err) => return Err(err),
            }
        };

        let issue = self
            .get_issue(issue_id)?
            .ok_or_else(|| SpindleError::IssueNotFound {
                id: issue_id.to_string(),
            })?;

        let assignment = issue.assignee.as_ref().map(|assignee| AssignmentChange {
            issue_key: issue.key(),
            issue_title: issue.title.clone(),
            old_assignee: None,
            new_assignee: Some(assignee.clone()),
            actor: actor.to_string(),
        });

        Ok(IssueMutation {
            issue,
            history: Vec::new(),
            assignment,
        })
    }

    /// Apply a partial update, auditing every trackable field that changed.
    ///
    /// The issue row update and its history entries share one transaction
    /// and one timestamp.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound`, `Forbidden`, `PrincipalNotFound` for an
    /// unknown assignee, or validation errors.
    pub fn update_issue(
        &mut self,
        issue_id: i64,
        updates: &IssueUpdate,
        actor: &str,
    ) -> Result<IssueMutation> {
        let before = self
            .get_issue(issue_id)?
            .ok_or_else(|| SpindleError::IssueNotFound {
                id: issue_id.to_string(),
            })?;
        access::require_access(&self.conn, actor, before.project_id)?;

        if updates.is_empty() {
            return Ok(IssueMutation {
                issue: before,
                history: Vec::new(),
                assignment: None,
            });
        }

        if let Some(title) = updates.title.as_deref() {
            IssueValidator::validate_title(title).map_err(SpindleError::from_validation_errors)?;
        }
        if let Some(Some(description)) = updates.description.as_ref() {
            IssueValidator::validate_description(description)
                .map_err(SpindleError::from_validation_errors)?;
        }
        if let Some(Some(assignee)) = updates.assignee.as_ref() {
            self.require_principal(assignee)?;
        }

        let mut after = before.clone();
        if let Some(ref title) = updates.title {
            after.title.clone_from(title);
        }
        if let Some(ref description) = updates.description {
            after.description.clone_from(description);
        }
        if let Some(issue_type) = updates.issue_type {
            after.issue_type = issue_type;
        }
        if let Some(priority) = updates.priority {
            after.priority = priority;
        }
        if let Some(status) = updates.status {
            after.status = status;
        }
        if let Some(ref assignee) = updates.assignee {
            after.assignee.clone_from(assignee);
        }

        let changes = audit::diff_issues(&before, &after);
        let updated_at = Utc::now();

        let ((), history) = self.mutate("update_issue", actor, |tx, ctx| {
            tx.execute(
                "UPDATE issues SET title = ?1, description = ?2, issue_type = ?3,
                                   priority = ?4, status = ?5, assignee = ?6, updated_at = ?7
                 WHERE id = ?8",
                params![
                    after.title,
                    after.description.as_deref().unwrap_or(""),
                    after.issue_type.as_str(),
                    after.priority.as_str(),
                    after.status.as_str(),
                    after.assignee,
                    updated_at.to_rfc3339(),
                    issue_id,
                ],
            )?;

            for change in &changes {
                ctx.record_change(issue_id, change);
            }
            Ok(())
        })?;

        after.updated_at = updated_at;

        let assignment = if before.assignee == after.assignee {
            None
        } else {
            Some(AssignmentChange {
                issue_key: after.key(),
                issue_title: after.title.clone(),
                old_assignee: before.assignee.clone(),
                new_assignee: after.assignee.clone(),
                actor: actor.to_string(),
            })
        };

        Ok(IssueMutation {
            issue: after,
            history,
            assignment,
        })
    }

    /// Look up an issue by storage id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_issue(&self, issue_id: i64) -> Result<Option<Issue>> {
        self.conn
            .query_row(
                &format!("{ISSUE_SELECT} WHERE i.id = ?1"),
                params![issue_id],
                issue_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Look up an issue by display key parts (`PROJ`, 101).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_issue_by_key(
        &self,
        project_key: &str,
        sequence_number: i64,
    ) -> Result<Option<Issue>> {
        self.conn
            .query_row(
                &format!("{ISSUE_SELECT} WHERE p.key = ?1 AND i.sequence_number = ?2"),
                params![project_key, sequence_number],
                issue_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Resolve a CLI issue reference (raw id or `KEY-N`).
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if nothing matches.
    pub fn resolve_issue(&self, issue_ref: &IssueRef) -> Result<Issue> {
        let found = match issue_ref {
            IssueRef::Id(id) => self.get_issue(*id)?,
            IssueRef::Key {
                project_key,
                sequence_number,
            } => self.find_issue_by_key(project_key, *sequence_number)?,
        };
        found.ok_or_else(|| SpindleError::IssueNotFound {
            id: issue_ref.to_string(),
        })
    }

    /// List a project's issues in board order (position, then id).
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` if the principal has no access.
    pub fn list_issues(&self, project_id: i64, username: &str) -> Result<Vec<Issue>> {
        access::require_access(&self.conn, username, project_id)?;

        let mut stmt = self.conn.prepare(&format!(
            "{ISSUE_SELECT} WHERE i.project_id = ?1 ORDER BY i.position, i.id"
        ))?;
        let issues = stmt
            .query_map(params![project_id], issue_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(issues)
    }

    /// Apply a bulk reorder batch.
    ///
    /// No authorization happens here: the caller must have verified
    /// membership for every referenced issue first (see `access`). Unknown
    /// ids are skipped per the documented best-effort policy.
    ///
    /// # Errors
    ///
    /// Returns an error only on database failure.
    pub fn bulk_reorder(
        &mut self,
        items: &[ReorderItem],
        actor: &str,
    ) -> Result<Vec<ReorderOutcome>> {
        let (outcomes, _) = self.mutate("bulk_reorder", actor, |tx, _ctx| {
            ordering::apply_reorder(tx, items)
        })?;
        Ok(outcomes)
    }

    // ========================================================================
    // HISTORY & COMMENTS
    // ========================================================================

    /// Fetch an issue's history, oldest first, gated by membership.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` or `Forbidden`.
    pub fn list_history(&self, issue_id: i64, username: &str) -> Result<Vec<HistoryEntry>> {
        let issue = self
            .get_issue(issue_id)?
            .ok_or_else(|| SpindleError::IssueNotFound {
                id: issue_id.to_string(),
            })?;
        access::require_access(&self.conn, username, issue.project_id)?;
        history::get_history(&self.conn, issue_id)
    }

    /// Add a comment to an issue, gated by membership.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` or `Forbidden`.
    pub fn add_comment(&mut self, issue_id: i64, body: &str, actor: &str) -> Result<Comment> {
        let issue = self
            .get_issue(issue_id)?
            .ok_or_else(|| SpindleError::IssueNotFound {
                id: issue_id.to_string(),
            })?;
        access::require_access(&self.conn, actor, issue.project_id)?;
        if body.trim().is_empty() {
            return Err(SpindleError::validation("text", "cannot be empty"));
        }

        let created_at = Utc::now();
        let (id, _) = self.mutate("add_comment", actor, |tx, _ctx| {
            tx.execute(
                "INSERT INTO comments (issue_id, author, text, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![issue_id, actor, body, created_at.to_rfc3339()],
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        Ok(Comment {
            id,
            issue_id,
            author: actor.to_string(),
            body: body.to_string(),
            created_at,
        })
    }

    /// List an issue's comments, oldest first, gated by membership.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` or `Forbidden`.
    pub fn list_comments(&self, issue_id: i64, username: &str) -> Result<Vec<Comment>> {
        let issue = self
            .get_issue(issue_id)?
            .ok_or_else(|| SpindleError::IssueNotFound {
                id: issue_id.to_string(),
            })?;
        access::require_access(&self.conn, username, issue.project_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT id, issue_id, author, text, created_at
             FROM comments WHERE issue_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;
        let comments = stmt
            .query_map(params![issue_id], |row| {
                Ok(Comment {
                    id: row.get(0)?,
                    issue_id: row.get(1)?,
                    author: row.get(2)?,
                    body: row.get(3)?,
                    created_at: parse_timestamp(&row.get::<_, String>(4)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    // ========================================================================
    // COUNTS (tests and doctor-style checks)
    // ========================================================================

    /// Total issue count across all projects.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_issues(&self) -> Result<i64> {
        self.scalar_count("SELECT COUNT(*) FROM issues")
    }

    /// Total history entry count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_history(&self) -> Result<i64> {
        self.scalar_count("SELECT COUNT(*) FROM history")
    }

    /// Total comment count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_comments(&self) -> Result<i64> {
        self.scalar_count("SELECT COUNT(*) FROM comments")
    }

    /// Total membership row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_members(&self) -> Result<i64> {
        self.scalar_count("SELECT COUNT(*) FROM project_members")
    }

    fn scalar_count(&self, sql: &str) -> Result<i64> {
        self.conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// Claim a sequence number without creating an issue.
    ///
    /// Exists for callers that stage work before inserting; the claim is
    /// durable, so abandoning the work leaves a gap.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` or a database error.
    pub fn allocate_sequence(&self, project_id: i64) -> Result<i64> {
        sequence::allocate(&self.conn, project_id)
    }

    /// Membership gate check on this store's connection.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` or a database error.
    pub fn can_access(&self, username: &str, project_id: i64) -> Result<bool> {
        access::can_access(&self.conn, username, project_id)
    }

    /// Enforce the membership gate on this store's connection.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` or `ProjectNotFound`.
    pub fn require_access(&self, username: &str, project_id: i64) -> Result<()> {
        access::require_access(&self.conn, username, project_id)
    }
}

const ISSUE_SELECT: &str = "
    SELECT i.id, i.project_id, p.key, i.sequence_number, i.position, i.title,
           i.description, i.issue_type, i.priority, i.status, i.assignee,
           i.reporter, i.created_at, i.updated_at
    FROM issues i
    JOIN projects p ON p.id = i.project_id
";

fn issue_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Issue> {
    let description: String = row.get(6)?;
    let issue_type: String = row.get(7)?;
    let priority: String = row.get(8)?;
    let status: String = row.get(9)?;

    Ok(Issue {
        id: row.get(0)?,
        project_id: row.get(1)?,
        project_key: row.get(2)?,
        sequence_number: row.get(3)?,
        position: row.get(4)?,
        title: row.get(5)?,
        description: if description.is_empty() {
            None
        } else {
            Some(description)
        },
        issue_type: issue_type.parse().unwrap_or_default(),
        priority: priority.parse().unwrap_or_default(),
        status: status.parse().unwrap_or_default(),
        assignee: row.get(10)?,
        reporter: row.get(11)?,
        created_at: parse_timestamp(&row.get::<_, String>(12)?),
        updated_at: parse_timestamp(&row.get::<_, String>(13)?),
    })
}

fn project_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        key: row.get(2)?,
        description: row.get(3)?,
        owner: row.get(4)?,
        created_at: parse_timestamp(&row.get::<_, String>(5)?),
        members: Vec::new(),
    })
}

/// Whether a rusqlite error is a UNIQUE violation naming the given column.
fn is_unique_violation(err: &rusqlite::Error, column: &str) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, Some(msg))
            if e.code == rusqlite::ErrorCode::ConstraintViolation && msg.contains(column)
    )
}
