//! Property-based tests for validation and reference parsing.
//!
//! Uses proptest to verify that:
//! - Well-formed project keys always pass validation
//! - Oversized or malformed fields always fail
//! - Issue references round-trip through their display form

use proptest::prelude::*;
use std::str::FromStr;

use spindle_rust::model::IssueRef;
use spindle_rust::validation::{IssueValidator, PrincipalValidator, ProjectValidator};

proptest! {
    #[test]
    fn well_formed_keys_pass(key in "[A-Z][A-Z0-9]{0,9}") {
        prop_assert!(ProjectValidator::validate("Board", &key).is_ok());
    }

    #[test]
    fn lowercase_keys_fail(key in "[a-z][a-z0-9]{0,9}") {
        prop_assert!(ProjectValidator::validate("Board", &key).is_err());
    }

    #[test]
    fn oversized_keys_fail(extra in 1usize..20) {
        let key = format!("K{}", "X".repeat(10 + extra));
        prop_assert!(ProjectValidator::validate("Board", &key).is_err());
    }

    #[test]
    fn titles_within_limit_pass(title in "[a-zA-Z0-9 ]{1,200}") {
        prop_assume!(!title.trim().is_empty());
        prop_assert!(IssueValidator::validate_title(&title).is_ok());
    }

    #[test]
    fn oversized_titles_fail(extra in 1usize..100) {
        let title = "x".repeat(200 + extra);
        prop_assert!(IssueValidator::validate_title(&title).is_err());
    }

    #[test]
    fn usernames_with_whitespace_fail(
        prefix in "[a-z]{1,10}",
        suffix in "[a-z]{1,10}",
    ) {
        let username = format!("{prefix} {suffix}");
        prop_assert!(PrincipalValidator::validate(&username).is_err());
    }

    #[test]
    fn key_refs_round_trip(key in "[A-Z][A-Z0-9]{0,9}", seq in 1i64..100_000) {
        let parsed = IssueRef::from_str(&format!("{key}-{seq}")).unwrap();
        prop_assert_eq!(
            parsed,
            IssueRef::Key { project_key: key, sequence_number: seq }
        );
    }

    #[test]
    fn id_refs_round_trip(id in 1i64..1_000_000) {
        let parsed = IssueRef::from_str(&id.to_string()).unwrap();
        prop_assert_eq!(parsed, IssueRef::Id(id));
    }
}
