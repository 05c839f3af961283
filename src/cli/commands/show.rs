//! Show command implementation.

use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::{Issue, IssueRef};

/// Execute the show command.
///
/// # Errors
///
/// Returns `IssueNotFound` for unresolved references, `Forbidden` when the
/// actor has no access to the issue's project.
pub fn execute(refs: &[String], json: bool, cli: &CliOverrides) -> Result<()> {
    let (store, actor) = super::open_workspace(cli)?;

    let mut issues = Vec::with_capacity(refs.len());
    for raw in refs {
        let issue_ref: IssueRef = raw.parse()?;
        let issue = store.resolve_issue(&issue_ref)?;
        store.require_access(&actor, issue.project_id)?;
        issues.push(issue);
    }

    if json {
        return super::print_json(&issues);
    }

    for (i, issue) in issues.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_issue(issue);
    }
    Ok(())
}

fn print_issue(issue: &Issue) {
    println!("{}: {}", issue.key(), issue.title);
    println!("  type:     {}", issue.issue_type);
    println!("  status:   {}", issue.status);
    println!("  priority: {}", issue.priority);
    println!("  assignee: {}", issue.assignee.as_deref().unwrap_or("-"));
    println!("  reporter: {}", issue.reporter);
    println!("  position: {}", issue.position);
    println!("  created:  {}", issue.created_at.format("%Y-%m-%d %H:%M"));
    println!("  updated:  {}", issue.updated_at.format("%Y-%m-%d %H:%M"));
    if let Some(description) = &issue.description {
        println!();
        for line in description.lines() {
            println!("  {line}");
        }
    }
}
