//! Assignment notification: pure decision plus an injected delivery capability.
//!
//! The decision (`should_notify`) is a side-effect-free function so it can
//! be tested without a transport. Delivery goes through the `Notifier`
//! trait; `dispatch_assignment` catches and suppresses every transport
//! failure, so a dead notifier can never fail or roll back the mutation it
//! follows. Transports own their own timeouts.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Decide whether an assignment change warrants a notification.
///
/// True iff a new assignee is set, the assignee actually changed, and the
/// actor is not assigning the issue to themselves.
#[must_use]
pub fn should_notify(
    old_assignee: Option<&str>,
    new_assignee: Option<&str>,
    actor: &str,
) -> bool {
    match new_assignee {
        None => false,
        Some(new) => old_assignee != Some(new) && new != actor,
    }
}

/// Delivery capability for notifications.
///
/// Implementations may fail independently of the core; callers treat any
/// failure as non-fatal.
pub trait Notifier {
    /// Deliver a message to a recipient.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails; callers suppress it.
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<()>;
}

/// Notifier that logs deliveries instead of sending them.
///
/// Stands in for a mail transport in the CLI; useful wherever delivery is
/// out of scope but the decision path should still be exercised.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<()> {
        info!(recipient, subject, body, "notification");
        Ok(())
    }
}

/// An assignment change observed by a committed mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentChange {
    /// Display key of the issue, e.g. "PROJ-101".
    pub issue_key: String,
    pub issue_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_assignee: Option<String>,
    pub actor: String,
}

/// Fire-and-forget dispatch for an assignment change.
///
/// Invokes the notifier only when `should_notify` says so. Failures are
/// logged at `warn` and swallowed; the surrounding mutation has already
/// committed and must not be affected.
pub fn dispatch_assignment(notifier: &dyn Notifier, change: &AssignmentChange) {
    if !should_notify(
        change.old_assignee.as_deref(),
        change.new_assignee.as_deref(),
        &change.actor,
    ) {
        return;
    }

    // Checked by should_notify above.
    let Some(recipient) = change.new_assignee.as_deref() else {
        return;
    };

    let subject = format!("[{}] assigned to you", change.issue_key);
    let body = format!(
        "{} assigned {} ({}) to you.",
        change.actor, change.issue_key, change.issue_title
    );

    if let Err(err) = notifier.send(&subject, &body, recipient) {
        warn!(
            issue = %change.issue_key,
            recipient,
            error = %err,
            "notification delivery failed; continuing"
        );
    }
}
