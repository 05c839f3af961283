//! Comment commands.

use crate::cli::CommentCommands;
use crate::config::CliOverrides;
use crate::error::{Result, SpindleError};
use crate::model::IssueRef;

/// Execute a comment subcommand.
///
/// # Errors
///
/// Returns `IssueNotFound`, `Forbidden`, or a validation error for an
/// empty comment.
pub fn execute(command: &CommentCommands, json: bool, cli: &CliOverrides) -> Result<()> {
    match command {
        CommentCommands::Add { issue, text } => add(issue, text, json, cli),
        CommentCommands::List { issue } => list(issue, json, cli),
    }
}

fn add(issue: &str, text: &[String], json: bool, cli: &CliOverrides) -> Result<()> {
    let body = text.join(" ");
    if body.trim().is_empty() {
        return Err(SpindleError::validation("text", "cannot be empty"));
    }

    let (mut store, actor) = super::open_workspace(cli)?;
    let issue_ref: IssueRef = issue.parse()?;
    let issue = store.resolve_issue(&issue_ref)?;
    let comment = store.add_comment(issue.id, &body, &actor)?;

    if json {
        super::print_json(&comment)
    } else {
        println!("Commented on {}", issue.key());
        Ok(())
    }
}

fn list(issue: &str, json: bool, cli: &CliOverrides) -> Result<()> {
    let (store, actor) = super::open_workspace(cli)?;
    let issue_ref: IssueRef = issue.parse()?;
    let issue = store.resolve_issue(&issue_ref)?;
    let comments = store.list_comments(issue.id, &actor)?;

    if json {
        return super::print_json(&comments);
    }

    if comments.is_empty() {
        println!("No comments on {}", issue.key());
        return Ok(());
    }

    for comment in &comments {
        println!(
            "[{}] {}:",
            comment.created_at.format("%Y-%m-%d %H:%M"),
            comment.author,
        );
        for line in comment.body.lines() {
            println!("  {line}");
        }
    }
    Ok(())
}
