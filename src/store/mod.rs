//! `SQLite` persistence for `spindle_rust`.

pub mod history;
pub mod ordering;
pub mod schema;
pub mod sequence;
mod sqlite;

pub use ordering::{ReorderItem, ReorderOutcome};
pub use sqlite::{IssueMutation, IssueUpdate, MutationContext, NewIssue, SqliteStore};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Parse a stored timestamp, tolerating legacy naive formats.
pub(crate) fn parse_timestamp(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Utc.from_utc_datetime(&naive);
    }

    Utc::now()
}
