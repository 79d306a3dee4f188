//! Webhook payload builders with sensible defaults.
//!
//! Payloads carry the fields the normalizer reads plus a few realistic
//! extras the platform always sends, so tests also prove unknown fields are
//! ignored.

use serde_json::{json, Value};

/// Builder for `push` delivery bodies.
#[derive(Debug, Clone)]
pub struct PushBuilder {
    git_ref: String,
    after: String,
    pusher: Option<String>,
    timestamp: Value,
}

impl PushBuilder {
    /// Push of `abc123` to `main` by `alice` at `2024-01-01T00:00:00Z`.
    pub fn new() -> Self {
        Self {
            git_ref: "refs/heads/main".to_string(),
            after: "abc123".to_string(),
            pusher: Some("alice".to_string()),
            timestamp: json!("2024-01-01T00:00:00Z"),
        }
    }

    /// Sets the pushed ref, e.g. `refs/heads/feature`.
    #[must_use]
    pub fn git_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = git_ref.into();
        self
    }

    /// Sets the post-push commit hash.
    #[must_use]
    pub fn after(mut self, after: impl Into<String>) -> Self {
        self.after = after.into();
        self
    }

    /// Sets the pusher's display name.
    #[must_use]
    pub fn pusher(mut self, name: impl Into<String>) -> Self {
        self.pusher = Some(name.into());
        self
    }

    /// Drops `pusher.name`, producing a malformed payload.
    #[must_use]
    pub fn without_pusher_name(mut self) -> Self {
        self.pusher = None;
        self
    }

    /// Sets the head commit timestamp (a string or epoch seconds).
    #[must_use]
    pub fn timestamp(mut self, timestamp: impl Into<Value>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Builds the JSON body.
    pub fn build(self) -> Value {
        let pusher = match self.pusher {
            Some(name) => json!({"name": name, "email": "dev@example.com"}),
            None => json!({"email": "dev@example.com"}),
        };

        json!({
            "ref": self.git_ref,
            "before": "0000000000000000000000000000000000000000",
            "after": self.after,
            "repository": {"id": 1, "full_name": "octo/widgets"},
            "pusher": pusher,
            "head_commit": {
                "id": self.after,
                "message": "Update widgets",
                "timestamp": self.timestamp
            }
        })
    }
}

impl Default for PushBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `pull_request` delivery bodies.
#[derive(Debug, Clone)]
pub struct PullRequestBuilder {
    id: u64,
    opener: String,
    head: String,
    base: String,
    created_at: Value,
    merged_at: Value,
    merged_by: Option<String>,
}

impl PullRequestBuilder {
    /// Open pull request 42 by `bob` from `feature-x` into `main`.
    pub fn new() -> Self {
        Self {
            id: 42,
            opener: "bob".to_string(),
            head: "feature-x".to_string(),
            base: "main".to_string(),
            created_at: json!("2024-01-02T00:00:00Z"),
            merged_at: Value::Null,
            merged_by: None,
        }
    }

    /// Sets the platform pull request id.
    #[must_use]
    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Sets the opener's login.
    #[must_use]
    pub fn opener(mut self, login: impl Into<String>) -> Self {
        self.opener = login.into();
        self
    }

    /// Sets source and target branches.
    #[must_use]
    pub fn branches(mut self, head: impl Into<String>, base: impl Into<String>) -> Self {
        self.head = head.into();
        self.base = base.into();
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub fn created_at(mut self, timestamp: impl Into<Value>) -> Self {
        self.created_at = timestamp.into();
        self
    }

    /// Marks the pull request merged at `timestamp`.
    #[must_use]
    pub fn merged_at(mut self, timestamp: impl Into<Value>) -> Self {
        self.merged_at = timestamp.into();
        self
    }

    /// Records who merged the pull request.
    #[must_use]
    pub fn merged_by(mut self, login: impl Into<String>) -> Self {
        self.merged_by = Some(login.into());
        self
    }

    /// Builds the JSON body.
    pub fn build(self) -> Value {
        let merged = !self.merged_at.is_null();
        json!({
            "action": if merged { "closed" } else { "opened" },
            "number": 7,
            "pull_request": {
                "id": self.id,
                "number": 7,
                "state": if merged { "closed" } else { "open" },
                "user": {"login": self.opener, "id": 1001},
                "head": {"ref": self.head, "sha": "f00dcafe"},
                "base": {"ref": self.base, "sha": "ba5eba11"},
                "created_at": self.created_at,
                "merged_at": self.merged_at,
                "merged_by": self.merged_by.map(|login| json!({"login": login, "id": 1002})),
            }
        })
    }
}

impl Default for PullRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
