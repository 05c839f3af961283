//! Error types and handling for `spindle_rust`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Supports `anyhow` integration for wrapped errors
//! - Variants group into the backend's error kinds: not-found, conflict,
//!   forbidden, validation, transient-store
//! - Provides structured JSON output for machine consumers

mod structured;

pub use structured::{ErrorCode, StructuredError};

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `spindle_rust` operations.
#[derive(Error, Debug)]
pub enum SpindleError {
    // === Storage Errors ===
    /// Database file not found at the specified path.
    #[error("Database not found at '{path}'")]
    DatabaseNotFound { path: PathBuf },

    /// `SQLite` database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A retriable store conflict (lock contention or an allocation race)
    /// exhausted its retry budget.
    #[error("Store contention during {op}: gave up after {attempts} attempts")]
    TransientStore { op: String, attempts: u32 },

    // === Not-Found Errors ===
    /// Project with the specified id or key was not found.
    #[error("Project not found: {project}")]
    ProjectNotFound { project: String },

    /// Issue with the specified id or key was not found.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: String },

    /// Principal with the specified username was not found.
    #[error("Principal not found: {username}")]
    PrincipalNotFound { username: String },

    // === Conflict Errors ===
    /// Principal is already a member of the project.
    #[error("'{username}' is already a member of this project")]
    AlreadyMember { username: String },

    /// Attempted to add the project owner as a member.
    #[error("'{username}' owns this project and already has access")]
    OwnerMembership { username: String },

    /// Project key is already taken.
    #[error("Project key already in use: {key}")]
    DuplicateProjectKey { key: String },

    // === Authorization Errors ===
    /// Membership gate denied access to a project.
    #[error("'{username}' does not have access to project {project}")]
    Forbidden { username: String, project: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    /// Invalid status value.
    #[error("Invalid status: {status}")]
    InvalidStatus { status: String },

    /// Invalid issue type value.
    #[error("Invalid issue type: {issue_type}")]
    InvalidType { issue_type: String },

    /// Invalid priority value.
    #[error("Invalid priority: {priority}")]
    InvalidPriority { priority: String },

    // === Configuration Errors ===
    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Spindle workspace not initialized.
    #[error("Spindle not initialized: run 'spd init' first")]
    NotInitialized,

    /// Already initialized.
    #[error("Already initialized at '{path}'")]
    AlreadyInitialized { path: PathBuf },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // === Wrapped errors ===
    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A single field validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// The reason for the validation failure.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl SpindleError {
    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DatabaseNotFound { .. }
                | Self::NotInitialized
                | Self::ProjectNotFound { .. }
                | Self::IssueNotFound { .. }
                | Self::PrincipalNotFound { .. }
                | Self::AlreadyMember { .. }
                | Self::OwnerMembership { .. }
                | Self::DuplicateProjectKey { .. }
                | Self::Validation { .. }
                | Self::InvalidStatus { .. }
                | Self::InvalidType { .. }
                | Self::InvalidPriority { .. }
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run: spd init"),
            Self::DatabaseNotFound { .. } => Some("Check path or run: spd init"),
            Self::AlreadyInitialized { .. } => Some("Use --force to reinitialize"),
            Self::PrincipalNotFound { .. } => Some("Register the user first: spd user add"),
            Self::Forbidden { .. } => {
                Some("Ask the project owner or a member to add you: spd project add-member")
            }
            Self::TransientStore { .. } => Some("The store is busy; retry the operation"),
            Self::InvalidStatus { .. } => Some("Valid statuses: todo, in_progress, review, done"),
            Self::InvalidType { .. } => Some("Valid types: bug, task, story"),
            Self::InvalidPriority { .. } => {
                Some("Valid priorities: low, medium, high, critical")
            }
            _ => None,
        }
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create from multiple validation errors.
    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }
}

/// Result type using `SpindleError`.
pub type Result<T> = std::result::Result<T, SpindleError>;
