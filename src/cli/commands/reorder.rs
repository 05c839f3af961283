//! Reorder command implementation.

use crate::cli::ReorderArgs;
use crate::config::CliOverrides;
use crate::error::{Result, SpindleError};
use crate::model::IssueRef;
use crate::store::ReorderItem;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize)]
struct ReorderReport {
    reference: String,
    position: i64,
    applied: bool,
}

/// Execute the reorder command.
///
/// Items are `REF=POSITION` pairs. References that resolve to nothing are
/// skipped and reported, not fatal; everything that does resolve is checked
/// against the membership gate and then applied in one batch.
///
/// # Errors
///
/// Returns a validation error for malformed pairs, `Forbidden` when the
/// actor has no access to a referenced issue's project.
pub fn execute(args: &ReorderArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    if args.items.is_empty() {
        return Err(SpindleError::validation("items", "nothing to reorder"));
    }

    let (mut store, actor) = super::open_workspace(cli)?;

    let mut batch = Vec::new();
    let mut reports = Vec::with_capacity(args.items.len());
    // Aligned with `reports`; None marks a reference that never resolved.
    let mut resolved_ids = Vec::with_capacity(args.items.len());
    for raw in &args.items {
        let (reference, position) = parse_pair(raw)?;
        let issue_ref: IssueRef = reference.parse()?;

        match store.resolve_issue(&issue_ref) {
            Ok(issue) => {
                store.require_access(&actor, issue.project_id)?;
                batch.push(ReorderItem {
                    issue_id: issue.id,
                    position,
                });
                resolved_ids.push(Some(issue.id));
                reports.push(ReorderReport {
                    reference: issue.key(),
                    position,
                    applied: false,
                });
            }
            Err(SpindleError::IssueNotFound { .. }) => {
                resolved_ids.push(None);
                reports.push(ReorderReport {
                    reference: reference.to_string(),
                    position,
                    applied: false,
                });
            }
            Err(err) => return Err(err),
        }
    }

    let outcomes = store.bulk_reorder(&batch, &actor)?;
    let applied: HashMap<i64, bool> = outcomes
        .iter()
        .map(|outcome| (outcome.issue_id, outcome.applied))
        .collect();
    for (report, resolved) in reports.iter_mut().zip(resolved_ids.iter()) {
        report.applied = resolved
            .is_some_and(|id| applied.get(&id).copied().unwrap_or(false));
    }

    if json {
        return super::print_json(&reports);
    }

    for report in &reports {
        if report.applied {
            println!("{} -> position {}", report.reference, report.position);
        } else {
            println!("{} skipped (not found)", report.reference);
        }
    }
    Ok(())
}

fn parse_pair(raw: &str) -> Result<(&str, i64)> {
    let Some((reference, position)) = raw.split_once('=') else {
        return Err(SpindleError::validation(
            "items",
            format!("'{raw}' is not a REF=POSITION pair"),
        ));
    };
    let position: i64 = position.parse().map_err(|_| {
        SpindleError::validation("items", format!("'{position}' is not a position"))
    })?;
    Ok((reference, position))
}
