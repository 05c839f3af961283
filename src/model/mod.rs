//! Core data types for `spindle_rust`.
//!
//! This module defines the fundamental types used throughout the application:
//! - `Project` - A board with an owner, members, and a short unique key
//! - `Issue` - The core work item, keyed `PROJ-101` within its project
//! - `HistoryEntry` - Field-level audit log entry
//! - `Principal` - A registered user referenced by username
//! - `Comment` - Issue comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Issue lifecycle status.
///
/// A closed set; unknown values are rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

impl Status {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Review => "REVIEW",
            Self::Done => "DONE",
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = crate::error::SpindleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" | "INPROGRESS" => Ok(Self::InProgress),
            "REVIEW" => Ok(Self::Review),
            "DONE" => Ok(Self::Done),
            other => Err(crate::error::SpindleError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// Issue priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = crate::error::SpindleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" | "MED" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "CRITICAL" | "CRI" => Ok(Self::Critical),
            other => Err(crate::error::SpindleError::InvalidPriority {
                priority: other.to_string(),
            }),
        }
    }
}

/// Issue type category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Bug,
    #[default]
    Task,
    Story,
}

impl IssueType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bug => "BUG",
            Self::Task => "TASK",
            Self::Story => "STORY",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = crate::error::SpindleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BUG" => Ok(Self::Bug),
            "TASK" => Ok(Self::Task),
            "STORY" => Ok(Self::Story),
            other => Err(crate::error::SpindleError::InvalidType {
                issue_type: other.to_string(),
            }),
        }
    }
}

/// A registered user, referenced everywhere by username.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A project: owner, members, and a short unique key like "PROJ".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: i64,

    pub name: String,

    /// Short unique code (e.g. "PROJ"). Immutable after creation, never reused.
    pub key: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Owner username. Owners have implicit access and are never listed in `members`.
    pub owner: String,

    pub created_at: DateTime<Utc>,

    /// Member usernames, excluding the owner.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

/// The primary issue entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Storage-assigned opaque id.
    pub id: i64,

    /// Owning project. Immutable after creation.
    pub project_id: i64,

    /// Owning project's key, joined in for display. Not a stored column.
    pub project_key: String,

    /// Per-project sequence number, assigned once at creation.
    /// Unique within the project; strictly increasing, gaps allowed.
    pub sequence_number: i64,

    /// Board ordering value. Mutable; ties break by `id`.
    pub position: i64,

    /// Title (1-200 chars).
    pub title: String,

    /// Detailed description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Issue type (bug, task, story).
    #[serde(default)]
    pub issue_type: IssueType,

    /// Priority.
    #[serde(default)]
    pub priority: Priority,

    /// Workflow status.
    #[serde(default)]
    pub status: Status,

    /// Assigned username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Reporter username, set once at creation.
    pub reporter: String,

    /// Creation timestamp. Immutable.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp. Bumped on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// The human-readable display key, e.g. "PROJ-101".
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}-{}", self.project_key, self.sequence_number)
    }
}

/// A reference to an issue as accepted on the CLI: either a raw storage id
/// or a display key like "PROJ-101".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueRef {
    Id(i64),
    Key { project_key: String, sequence_number: i64 },
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Key {
                project_key,
                sequence_number,
            } => write!(f, "{project_key}-{sequence_number}"),
        }
    }
}

impl FromStr for IssueRef {
    type Err = crate::error::SpindleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Ok(Self::Id(id));
        }
        if let Some((key, seq)) = s.rsplit_once('-') {
            if !key.is_empty() {
                if let Ok(sequence_number) = seq.parse::<i64>() {
                    return Ok(Self::Key {
                        project_key: key.to_uppercase(),
                        sequence_number,
                    });
                }
            }
        }
        Err(crate::error::SpindleError::validation(
            "issue",
            format!("'{s}' is neither an id nor a KEY-N reference"),
        ))
    }
}

/// An entry in the issue's field-level change history.
///
/// Immutable once created; append-only; ordered by timestamp ascending
/// (then id, for entries committed together).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: i64,
    pub issue_id: i64,
    pub actor: String,
    pub field: String,
    pub old_value: String,
    pub new_value: String,
    pub created_at: DateTime<Utc>,
}

/// A comment on an issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub issue_id: i64,
    pub author: String,
    #[serde(rename = "text")]
    pub body: String,
    pub created_at: DateTime<Utc>,
}
