//! Validation helpers for `spindle_rust`.
//!
//! These routines enforce field constraints and return structured
//! validation errors without mutating storage.

use crate::error::ValidationError;
use crate::store::NewIssue;

/// Maximum title length, matching the classic backend's column width.
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum project key length.
pub const MAX_KEY_LEN: usize = 10;
/// Maximum description size.
pub const MAX_DESCRIPTION_LEN: usize = 102_400;

/// Validates fields for a new or updated issue.
pub struct IssueValidator;

impl IssueValidator {
    /// Validate new-issue fields and return all validation errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate_new(issue: &NewIssue) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        validate_title(&issue.title, &mut errors);
        if let Some(description) = issue.description.as_ref() {
            validate_description(description, &mut errors);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Validate a replacement title.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if the title violates constraints.
    pub fn validate_title(title: &str) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        validate_title(title, &mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Validate a replacement description.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if the description violates
    /// constraints.
    pub fn validate_description(description: &str) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        validate_description(description, &mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn validate_title(title: &str, errors: &mut Vec<ValidationError>) {
    if title.trim().is_empty() {
        errors.push(ValidationError::new("title", "cannot be empty"));
    }
    if title.len() > MAX_TITLE_LEN {
        errors.push(ValidationError::new("title", "exceeds 200 characters"));
    }
}

fn validate_description(description: &str, errors: &mut Vec<ValidationError>) {
    if description.len() > MAX_DESCRIPTION_LEN {
        errors.push(ValidationError::new("description", "exceeds 100KB"));
    }
}

/// Validates project fields.
pub struct ProjectValidator;

impl ProjectValidator {
    /// Validate a project name and key.
    ///
    /// Keys are short uppercase codes like "PROJ": an ASCII letter followed
    /// by letters or digits, at most 10 characters.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate(name: &str, key: &str) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if name.trim().is_empty() {
            errors.push(ValidationError::new("name", "cannot be empty"));
        }
        if name.len() > 100 {
            errors.push(ValidationError::new("name", "exceeds 100 characters"));
        }

        if key.is_empty() {
            errors.push(ValidationError::new("key", "cannot be empty"));
        } else {
            if key.len() > MAX_KEY_LEN {
                errors.push(ValidationError::new("key", "exceeds 10 characters"));
            }
            if !is_valid_key_format(key) {
                errors.push(ValidationError::new(
                    "key",
                    "must be an uppercase letter followed by letters or digits",
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn is_valid_key_format(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Validates usernames.
pub struct PrincipalValidator;

impl PrincipalValidator {
    /// Validate a username: non-empty, max 50 chars, no whitespace.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate(username: &str) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if username.trim().is_empty() {
            errors.push(ValidationError::new("username", "cannot be empty"));
        }
        if username.len() > 50 {
            errors.push(ValidationError::new("username", "exceeds 50 characters"));
        }
        if username.chars().any(char::is_whitespace) {
            errors.push(ValidationError::new(
                "username",
                "cannot contain whitespace",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_rejected() {
        let errors = IssueValidator::validate_title("   ").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn long_title_rejected() {
        let errors = IssueValidator::validate_title(&"x".repeat(201)).unwrap_err();
        assert_eq!(errors[0].message, "exceeds 200 characters");
    }

    #[test]
    fn long_description_rejected() {
        assert!(IssueValidator::validate_description("fine").is_ok());
        let errors =
            IssueValidator::validate_description(&"x".repeat(MAX_DESCRIPTION_LEN + 1)).unwrap_err();
        assert_eq!(errors[0].field, "description");
    }

    #[test]
    fn key_format_checks() {
        assert!(ProjectValidator::validate("Board", "PROJ").is_ok());
        assert!(ProjectValidator::validate("Board", "P2X").is_ok());
        assert!(ProjectValidator::validate("Board", "proj").is_err());
        assert!(ProjectValidator::validate("Board", "2PROJ").is_err());
        assert!(ProjectValidator::validate("Board", "TOOLONGKEYX").is_err());
        assert!(ProjectValidator::validate("Board", "").is_err());
    }

    #[test]
    fn username_checks() {
        assert!(PrincipalValidator::validate("alice").is_ok());
        assert!(PrincipalValidator::validate("a lice").is_err());
        assert!(PrincipalValidator::validate("").is_err());
    }
}
