//! History command implementation.

use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::IssueRef;

/// Execute the history command.
///
/// Prints an issue's field-level change trail, oldest first.
///
/// # Errors
///
/// Returns `IssueNotFound` or `Forbidden`.
pub fn execute(issue: &str, json: bool, cli: &CliOverrides) -> Result<()> {
    let (store, actor) = super::open_workspace(cli)?;
    let issue_ref: IssueRef = issue.parse()?;
    let issue = store.resolve_issue(&issue_ref)?;
    let entries = store.list_history(issue.id, &actor)?;

    if json {
        return super::print_json(&entries);
    }

    if entries.is_empty() {
        println!("No history for {}", issue.key());
        return Ok(());
    }

    println!("History for {}", issue.key());
    for entry in &entries {
        println!(
            "  {} {} changed {}: '{}' -> '{}'",
            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
            entry.actor,
            entry.field,
            entry.old_value,
            entry.new_value,
        );
    }
    Ok(())
}
