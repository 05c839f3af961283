//! Create command implementation.

use crate::cli::CreateArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::notify::{self, LogNotifier};
use crate::store::NewIssue;

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if validation fails, the store cannot be opened, or the
/// issue cannot be created.
pub fn execute(args: &CreateArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut store, actor) = super::open_workspace(cli)?;
    let project = super::require_project(&store, &args.project)?;

    let new_issue = NewIssue {
        title: args.title.clone(),
        description: args.description.clone(),
        issue_type: args.type_.as_deref().map(str::parse).transpose()?.unwrap_or_default(),
        priority: args.priority.as_deref().map(str::parse).transpose()?.unwrap_or_default(),
        status: args.status.as_deref().map(str::parse).transpose()?.unwrap_or_default(),
        assignee: args.assignee.clone().filter(|a| !a.is_empty()),
    };

    let mutation = store.create_issue(project.id, &new_issue, &actor)?;

    if let Some(change) = &mutation.assignment {
        notify::dispatch_assignment(&LogNotifier, change);
    }

    if json {
        super::print_json(&mutation.issue)
    } else {
        println!("Created {}: {}", mutation.issue.key(), mutation.issue.title);
        Ok(())
    }
}
