//! List command implementation.

use crate::cli::ListArgs;
use crate::config::CliOverrides;
use crate::error::Result;

/// Execute the list command.
///
/// # Errors
///
/// Returns `Forbidden` when the actor has no access to the project.
pub fn execute(args: &ListArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (store, actor) = super::open_workspace(cli)?;
    let project = super::require_project(&store, &args.project)?;
    let issues = store.list_issues(project.id, &actor)?;

    if json {
        return super::print_json(&issues);
    }

    if issues.is_empty() {
        println!("No issues in {}", project.key);
        return Ok(());
    }

    for issue in &issues {
        println!(
            "{:<10} {:<12} {:<8} {:<30} {}",
            issue.key(),
            issue.status,
            issue.priority,
            truncate(&issue.title, 30),
            issue.assignee.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}\u{2026}")
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 30), "short");
        let long = "x".repeat(40);
        assert_eq!(truncate(&long, 30).chars().count(), 30);
    }
}
