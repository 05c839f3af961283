//! Update command implementation.

use crate::cli::UpdateArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::IssueRef;
use crate::notify::{self, LogNotifier};
use crate::store::IssueUpdate;

/// Execute the update command.
///
/// Each field flag maps onto a partial update; an empty string on a
/// nullable field (description, assignee) clears it.
///
/// # Errors
///
/// Returns an error if the issue cannot be resolved, validation fails, or
/// the update cannot be applied.
pub fn execute(args: &UpdateArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut store, actor) = super::open_workspace(cli)?;
    let issue_ref: IssueRef = args.issue.parse()?;
    let issue = store.resolve_issue(&issue_ref)?;

    let updates = IssueUpdate {
        title: args.title.clone(),
        description: args.description.clone().map(clear_on_empty),
        issue_type: args.type_.as_deref().map(str::parse).transpose()?,
        priority: args.priority.as_deref().map(str::parse).transpose()?,
        status: args.status.as_deref().map(str::parse).transpose()?,
        assignee: args.assignee.clone().map(clear_on_empty),
    };

    let mutation = store.update_issue(issue.id, &updates, &actor)?;

    if let Some(change) = &mutation.assignment {
        notify::dispatch_assignment(&LogNotifier, change);
    }

    if json {
        super::print_json(&mutation.issue)
    } else {
        println!(
            "Updated {} ({} change{})",
            mutation.issue.key(),
            mutation.history.len(),
            if mutation.history.len() == 1 { "" } else { "s" }
        );
        Ok(())
    }
}

fn clear_on_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
