//! Structured error output for machine consumers.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging

use crate::error::SpindleError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
/// Format: `SCREAMING_SNAKE_CASE` for easy parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Database Errors (exit code 2) ===
    /// Database file not found
    DatabaseNotFound,
    /// Database operation failed
    DatabaseError,
    /// Retry budget exhausted on a transient store conflict
    TransientStore,
    /// Spindle workspace not initialized
    NotInitialized,
    /// Already initialized
    AlreadyInitialized,

    // === Not-Found Errors (exit code 3) ===
    /// Project not found
    ProjectNotFound,
    /// Issue not found
    IssueNotFound,
    /// Principal not found
    PrincipalNotFound,

    // === Validation Errors (exit code 4) ===
    /// Field validation failed
    ValidationFailed,
    /// Invalid status value
    InvalidStatus,
    /// Invalid issue type value
    InvalidType,
    /// Invalid priority value
    InvalidPriority,

    // === Conflict Errors (exit code 5) ===
    /// Principal already a member
    AlreadyMember,
    /// Owner cannot be added as a member
    OwnerMembership,
    /// Project key already in use
    DuplicateProjectKey,

    // === Authorization Errors (exit code 6) ===
    /// Membership gate denied access
    Forbidden,

    // === Config Errors (exit code 7) ===
    /// Configuration error
    ConfigError,

    // === I/O Errors (exit code 8) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,
    /// YAML parsing error
    YamlError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Database
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::TransientStore => "TRANSIENT_STORE",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            // Not found
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",
            Self::IssueNotFound => "ISSUE_NOT_FOUND",
            Self::PrincipalNotFound => "PRINCIPAL_NOT_FOUND",
            // Validation
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidType => "INVALID_TYPE",
            Self::InvalidPriority => "INVALID_PRIORITY",
            // Conflict
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::OwnerMembership => "OWNER_MEMBERSHIP",
            Self::DuplicateProjectKey => "DUPLICATE_PROJECT_KEY",
            // Authorization
            Self::Forbidden => "FORBIDDEN",
            // Config
            Self::ConfigError => "CONFIG_ERROR",
            // I/O
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
            // Internal
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether this error is potentially retryable.
    ///
    /// Retryable means the caller might succeed if it:
    /// - Waits and retries (e.g., transient store contention)
    /// - Fixes the input and retries (e.g., validation error)
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TransientStore
                | Self::ValidationFailed
                | Self::InvalidStatus
                | Self::InvalidType
                | Self::InvalidPriority
        )
    }

    /// Get the exit code for this error category.
    ///
    /// Exit codes are grouped by error category:
    /// - 1: Internal/unknown errors
    /// - 2: Database errors
    /// - 3: Not-found errors
    /// - 4: Validation errors
    /// - 5: Conflict errors
    /// - 6: Authorization errors
    /// - 7: Config errors
    /// - 8: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            // Database (2)
            Self::DatabaseNotFound
            | Self::DatabaseError
            | Self::TransientStore
            | Self::NotInitialized
            | Self::AlreadyInitialized => 2,
            // Not found (3)
            Self::ProjectNotFound | Self::IssueNotFound | Self::PrincipalNotFound => 3,
            // Validation (4)
            Self::ValidationFailed
            | Self::InvalidStatus
            | Self::InvalidType
            | Self::InvalidPriority => 4,
            // Conflict (5)
            Self::AlreadyMember | Self::OwnerMembership | Self::DuplicateProjectKey => 5,
            // Authorization (6)
            Self::Forbidden => 6,
            // Config (7)
            Self::ConfigError => 7,
            // I/O (8)
            Self::IoError | Self::JsonError | Self::YamlError => 8,
            // Internal (1)
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `SpindleError`.
    #[must_use]
    pub fn from_error(err: &SpindleError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);
        let hint = err.suggestion().map(String::from);

        Self {
            code,
            message: err.to_string(),
            hint,
            retryable: code.is_retryable(),
            context,
        }
    }

    fn extract_code_and_context(err: &SpindleError) -> (ErrorCode, Option<Value>) {
        match err {
            SpindleError::DatabaseNotFound { path } => (
                ErrorCode::DatabaseNotFound,
                Some(json!({ "path": path.display().to_string() })),
            ),
            SpindleError::Database(_) => (ErrorCode::DatabaseError, None),
            SpindleError::TransientStore { op, attempts } => (
                ErrorCode::TransientStore,
                Some(json!({ "op": op, "attempts": attempts })),
            ),
            SpindleError::ProjectNotFound { project } => (
                ErrorCode::ProjectNotFound,
                Some(json!({ "project": project })),
            ),
            SpindleError::IssueNotFound { id } => {
                (ErrorCode::IssueNotFound, Some(json!({ "id": id })))
            }
            SpindleError::PrincipalNotFound { username } => (
                ErrorCode::PrincipalNotFound,
                Some(json!({ "username": username })),
            ),
            SpindleError::AlreadyMember { username } => (
                ErrorCode::AlreadyMember,
                Some(json!({ "username": username })),
            ),
            SpindleError::OwnerMembership { username } => (
                ErrorCode::OwnerMembership,
                Some(json!({ "username": username })),
            ),
            SpindleError::DuplicateProjectKey { key } => (
                ErrorCode::DuplicateProjectKey,
                Some(json!({ "key": key })),
            ),
            SpindleError::Forbidden { username, project } => (
                ErrorCode::Forbidden,
                Some(json!({ "username": username, "project": project })),
            ),
            SpindleError::Validation { field, .. } => (
                ErrorCode::ValidationFailed,
                Some(json!({ "field": field })),
            ),
            SpindleError::ValidationErrors { errors } => (
                ErrorCode::ValidationFailed,
                Some(json!({
                    "fields": errors.iter().map(|e| e.field.clone()).collect::<Vec<_>>()
                })),
            ),
            SpindleError::InvalidStatus { status } => {
                (ErrorCode::InvalidStatus, Some(json!({ "status": status })))
            }
            SpindleError::InvalidType { issue_type } => (
                ErrorCode::InvalidType,
                Some(json!({ "issue_type": issue_type })),
            ),
            SpindleError::InvalidPriority { priority } => (
                ErrorCode::InvalidPriority,
                Some(json!({ "priority": priority })),
            ),
            SpindleError::Config(_) => (ErrorCode::ConfigError, None),
            SpindleError::NotInitialized => (ErrorCode::NotInitialized, None),
            SpindleError::AlreadyInitialized { path } => (
                ErrorCode::AlreadyInitialized,
                Some(json!({ "path": path.display().to_string() })),
            ),
            SpindleError::Io(_) => (ErrorCode::IoError, None),
            SpindleError::Json(_) => (ErrorCode::JsonError, None),
            SpindleError::Yaml(_) => (ErrorCode::YamlError, None),
            SpindleError::Other(_) => (ErrorCode::InternalError, None),
        }
    }

    /// Render as a JSON value for stderr output.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Render as human-readable text, optionally with ANSI color.
    #[must_use]
    pub fn to_human(&self, use_color: bool) -> String {
        let mut out = if use_color {
            format!("\x1b[31mError:\x1b[0m {}", self.message)
        } else {
            format!("Error: {}", self.message)
        };
        if let Some(hint) = &self.hint {
            out.push_str(&format!("\n  Hint: {hint}"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_string_is_screaming_snake() {
        assert_eq!(ErrorCode::ProjectNotFound.as_str(), "PROJECT_NOT_FOUND");
        assert_eq!(ErrorCode::TransientStore.as_str(), "TRANSIENT_STORE");
    }

    #[test]
    fn exit_codes_group_by_category() {
        assert_eq!(ErrorCode::DatabaseError.exit_code(), 2);
        assert_eq!(ErrorCode::IssueNotFound.exit_code(), 3);
        assert_eq!(ErrorCode::InvalidStatus.exit_code(), 4);
        assert_eq!(ErrorCode::AlreadyMember.exit_code(), 5);
        assert_eq!(ErrorCode::Forbidden.exit_code(), 6);
        assert_eq!(ErrorCode::InternalError.exit_code(), 1);
    }

    #[test]
    fn transient_store_is_retryable() {
        let err = SpindleError::TransientStore {
            op: "create_issue".to_string(),
            attempts: 3,
        };
        let structured = StructuredError::from_error(&err);
        assert_eq!(structured.code, ErrorCode::TransientStore);
        assert!(structured.retryable);
    }

    #[test]
    fn forbidden_carries_context() {
        let err = SpindleError::Forbidden {
            username: "mallory".to_string(),
            project: "PROJ".to_string(),
        };
        let structured = StructuredError::from_error(&err);
        let json = structured.to_json();
        assert_eq!(json["error"]["code"], "FORBIDDEN");
        assert_eq!(json["error"]["context"]["username"], "mallory");
        assert!(!structured.retryable);
    }

    #[test]
    fn to_human_includes_hint() {
        let err = SpindleError::NotInitialized;
        let structured = StructuredError::from_error(&err);
        let text = structured.to_human(false);
        assert!(text.contains("Error:"));
        assert!(text.contains("Hint: Run: spd init"));
    }
}
