//! Event normalization.
//!
//! Maps a decoded webhook payload to zero, one or two canonical records.
//! The mapping is pure: nothing here touches the store.

use crate::{
    error::Result,
    models::{Action, CanonicalEvent},
    payload::{EventKind, PullRequestPayload, PushPayload, WebhookPayload},
};

/// Outcome of normalizing one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Records to append, in order.
    Records(Vec<CanonicalEvent>),
    /// The kind is not one we map. Callers acknowledge and move on.
    Unrecognized(String),
}

/// Normalizes a raw delivery body.
///
/// # Errors
///
/// Returns `HookfeedError::MalformedPayload` when the body of a recognized
/// kind does not decode. No partial records are produced in that case.
pub fn normalize(kind: &EventKind, body: &[u8]) -> Result<Normalized> {
    Ok(match WebhookPayload::decode(kind, body)? {
        Some(payload) => Normalized::Records(payload.into_events()),
        None => Normalized::Unrecognized(kind.as_str().to_string()),
    })
}

impl WebhookPayload {
    /// Maps the payload to canonical records.
    pub fn into_events(self) -> Vec<CanonicalEvent> {
        match self {
            Self::Push(push) => vec![push_event(push)],
            Self::PullRequest(pr) => pull_request_events(pr),
        }
    }
}

fn push_event(push: PushPayload) -> CanonicalEvent {
    let branch = branch_name(&push.git_ref).to_string();

    CanonicalEvent {
        request_id: push.after,
        author: push.pusher.name,
        action: Action::Push,
        from_branch: branch.clone(),
        to_branch: branch,
        timestamp: push.head_commit.timestamp.render(),
    }
}

fn pull_request_events(payload: PullRequestPayload) -> Vec<CanonicalEvent> {
    let pr = payload.pull_request;
    let request_id = pr.id.to_string();

    let mut events = Vec::with_capacity(2);
    events.push(CanonicalEvent {
        request_id: request_id.clone(),
        author: pr.user.login.clone(),
        action: Action::PullRequest,
        from_branch: pr.head.name.clone(),
        to_branch: pr.base.name.clone(),
        timestamp: pr.created_at.render(),
    });

    if let Some(merged_at) = pr.merged_at() {
        events.push(CanonicalEvent {
            request_id,
            author: pr.merger_login().to_string(),
            action: Action::Merge,
            from_branch: pr.head.name.clone(),
            to_branch: pr.base.name.clone(),
            timestamp: merged_at.render(),
        });
    }

    events
}

/// Last `/`-separated segment of a ref: `refs/heads/feature/x` gives `x`.
pub fn branch_name(git_ref: &str) -> &str {
    git_ref.rsplit('/').next().unwrap_or(git_ref)
}
