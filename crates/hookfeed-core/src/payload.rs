//! Inbound webhook schemas.
//!
//! Each recognized event kind has an explicit schema that only names the
//! fields the normalizer needs. Decoding happens once, at the boundary, so a
//! missing `pusher.name` or a null `head_commit` surfaces as a structured
//! [`HookfeedError::MalformedPayload`] instead of a failure deep inside the
//! mapping code.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::{HookfeedError, Result};

/// Event kind announced by the `X-GitHub-Event` delivery header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `push`
    Push,
    /// `pull_request`
    PullRequest,
    /// Any other value, including a missing header (empty string).
    Unrecognized(String),
}

impl EventKind {
    /// Parses a header value. Matching is exact.
    pub fn parse(value: &str) -> Self {
        match value {
            "push" => Self::Push,
            "pull_request" => Self::PullRequest,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Parses an optional header value; absence is an unrecognized kind.
    pub fn from_header(value: Option<&str>) -> Self {
        value.map_or_else(|| Self::Unrecognized(String::new()), Self::parse)
    }

    /// Returns the header spelling of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Push => "push",
            Self::PullRequest => "pull_request",
            Self::Unrecognized(other) => other,
        }
    }

    /// Returns whether the normalizer knows how to map this kind.
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timestamp as supplied by the hosting platform.
///
/// Text is kept verbatim. Integer epoch seconds decode into a structured
/// value that is rendered as ISO-8601 with a literal `Z` appended; the
/// platform is trusted to supply UTC.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTimestamp")]
pub enum SourceTimestamp {
    /// Textual timestamp, passed through unchanged.
    Text(String),
    /// Structured UTC date and time.
    At(NaiveDateTime),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Epoch(i64),
}

impl TryFrom<RawTimestamp> for SourceTimestamp {
    type Error = String;

    fn try_from(raw: RawTimestamp) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawTimestamp::Text(text) => Ok(Self::Text(text)),
            RawTimestamp::Epoch(secs) => DateTime::from_timestamp(secs, 0)
                .map(|dt| Self::At(dt.naive_utc()))
                .ok_or_else(|| format!("epoch timestamp {secs} is out of range")),
        }
    }
}

impl SourceTimestamp {
    /// Renders the canonical timestamp string.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::At(at) => format!("{}Z", at.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }

    /// Empty text and epoch `0` count as no timestamp at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::At(at) => *at == DateTime::<Utc>::UNIX_EPOCH.naive_utc(),
        }
    }
}

/// Fields of a `push` delivery.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushPayload {
    /// Full ref that was pushed, e.g. `refs/heads/main`.
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Commit hash the ref points at after the push.
    pub after: String,
    /// Who pushed.
    pub pusher: Pusher,
    /// Most recent commit of the push. Null on branch deletion, which is
    /// rejected as malformed.
    pub head_commit: HeadCommit,
}

/// Pusher identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Pusher {
    /// Display name.
    pub name: String,
}

/// Head commit of a push.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeadCommit {
    /// Authored timestamp.
    pub timestamp: SourceTimestamp,
}

/// Fields of a `pull_request` delivery.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestPayload {
    /// The pull request object.
    pub pull_request: PullRequest,
}

/// Pull request object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    /// Platform identifier, stable across open and merge.
    pub id: u64,
    /// Opener.
    pub user: Account,
    /// Source branch.
    pub head: BranchRef,
    /// Target branch.
    pub base: BranchRef,
    /// Creation time.
    pub created_at: SourceTimestamp,
    /// Merge time, if merged.
    #[serde(default)]
    pub merged_at: Option<SourceTimestamp>,
    /// Who merged, if recorded.
    #[serde(default)]
    pub merged_by: Option<Merger>,
}

impl PullRequest {
    /// Returns the merge timestamp when the pull request has been merged.
    pub fn merged_at(&self) -> Option<&SourceTimestamp> {
        self.merged_at.as_ref().filter(|ts| !ts.is_empty())
    }

    /// Login credited with the merge: the merger, else the opener.
    ///
    /// A merger without a login, or with an empty one, counts as absent.
    pub fn merger_login(&self) -> &str {
        self.merged_by
            .as_ref()
            .and_then(|merger| merger.login.as_deref())
            .filter(|login| !login.is_empty())
            .unwrap_or(&self.user.login)
    }
}

/// Platform account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    /// Login name.
    pub login: String,
}

/// Account recorded as the merger. The platform may send it without a
/// login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Merger {
    /// Login name, when present.
    #[serde(default)]
    pub login: Option<String>,
}

/// Branch reference inside a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchRef {
    /// Short branch name, e.g. `main`.
    #[serde(rename = "ref")]
    pub name: String,
}

/// Decoded body of a recognized delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookPayload {
    /// A `push` delivery.
    Push(PushPayload),
    /// A `pull_request` delivery.
    PullRequest(PullRequestPayload),
}

impl WebhookPayload {
    /// Decodes `body` according to `kind`.
    ///
    /// Unrecognized kinds return `Ok(None)` without looking at the body.
    ///
    /// # Errors
    ///
    /// Returns `HookfeedError::MalformedPayload` if the body is not JSON or
    /// lacks a field the schema requires.
    pub fn decode(kind: &EventKind, body: &[u8]) -> Result<Option<Self>> {
        let payload = match kind {
            EventKind::Push => serde_json::from_slice(body).map(Self::Push),
            EventKind::PullRequest => serde_json::from_slice(body).map(Self::PullRequest),
            EventKind::Unrecognized(_) => return Ok(None),
        };

        payload.map(Some).map_err(|e| HookfeedError::malformed(kind.as_str(), &e))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    #[test]
    fn event_kind_parsing_is_exact() {
        assert_eq!(EventKind::parse("push"), EventKind::Push);
        assert_eq!(EventKind::parse("pull_request"), EventKind::PullRequest);
        assert_eq!(EventKind::parse("Push"), EventKind::Unrecognized("Push".into()));
        assert_eq!(EventKind::from_header(None), EventKind::Unrecognized(String::new()));
        assert!(!EventKind::parse("issues").is_recognized());
    }

    #[test]
    fn text_timestamps_pass_through_verbatim() {
        let ts: SourceTimestamp = serde_json::from_value(json!("2024-01-01T10:00:00+02:00")).unwrap();
        assert_eq!(ts.render(), "2024-01-01T10:00:00+02:00");

        let odd: SourceTimestamp = serde_json::from_value(json!("not a date")).unwrap();
        assert_eq!(odd.render(), "not a date");
    }

    #[test]
    fn epoch_timestamps_render_with_z_suffix() {
        let ts: SourceTimestamp = serde_json::from_value(json!(1_704_067_200)).unwrap();
        assert_eq!(ts.render(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn structured_timestamps_keep_fractional_seconds() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(8, 5, 3, 250)
            .unwrap();
        assert_eq!(SourceTimestamp::At(at).render(), "2024-01-01T08:05:03.250Z");
    }

    #[test]
    fn out_of_range_epoch_is_rejected() {
        let result = serde_json::from_value::<SourceTimestamp>(json!(i64::MAX));
        assert!(result.is_err());
    }

    #[test]
    fn null_head_commit_is_malformed() {
        let body = json!({
            "ref": "refs/heads/main",
            "after": "0000000",
            "pusher": {"name": "alice"},
            "head_commit": null
        });

        let err =
            WebhookPayload::decode(&EventKind::Push, body.to_string().as_bytes()).unwrap_err();

        assert_eq!(err.code(), "E1001");
    }

    #[test]
    fn unrecognized_kind_ignores_body() {
        let decoded = WebhookPayload::decode(&EventKind::parse("issues"), b"not json").unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn empty_merged_at_counts_as_unmerged() {
        let body = json!({
            "pull_request": {
                "id": 7,
                "user": {"login": "bob"},
                "head": {"ref": "topic"},
                "base": {"ref": "main"},
                "created_at": "2024-01-02T00:00:00Z",
                "merged_at": ""
            }
        });

        let payload: PullRequestPayload = serde_json::from_value(body).unwrap();

        assert!(payload.pull_request.merged_at().is_none());
    }

    #[test]
    fn epoch_zero_merged_at_counts_as_unmerged() {
        let body = json!({
            "pull_request": {
                "id": 7,
                "user": {"login": "bob"},
                "head": {"ref": "topic"},
                "base": {"ref": "main"},
                "created_at": "2024-01-02T00:00:00Z",
                "merged_at": 0
            }
        });

        let payload: PullRequestPayload = serde_json::from_value(body).unwrap();

        assert!(payload.pull_request.merged_at().is_none());
    }

    #[test]
    fn merger_without_login_credits_opener() {
        for merged_by in [json!({}), json!({"login": null}), json!({"login": ""})] {
            let body = json!({
                "pull_request": {
                    "id": 7,
                    "user": {"login": "bob"},
                    "head": {"ref": "topic"},
                    "base": {"ref": "main"},
                    "created_at": "2024-01-02T00:00:00Z",
                    "merged_at": "2024-01-03T00:00:00Z",
                    "merged_by": merged_by
                }
            });

            let payload: PullRequestPayload = serde_json::from_value(body).unwrap();

            assert_eq!(payload.pull_request.merger_login(), "bob");
        }
    }

    #[test]
    fn merger_falls_back_to_opener() {
        let body = json!({
            "pull_request": {
                "id": 7,
                "user": {"login": "bob"},
                "head": {"ref": "topic"},
                "base": {"ref": "main"},
                "created_at": "2024-01-02T00:00:00Z",
                "merged_at": "2024-01-03T00:00:00Z",
                "merged_by": null
            }
        });

        let payload: PullRequestPayload = serde_json::from_value(body).unwrap();

        assert_eq!(payload.pull_request.merger_login(), "bob");
    }
}
