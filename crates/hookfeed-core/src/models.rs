//! Canonical event records and store-assigned identifiers.
//!
//! Every inbound webhook, whatever its shape, ends up as one or more
//! [`CanonicalEvent`]s. Once persisted, the store pairs each record with an
//! [`EventId`] of its own choosing.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

type PgDb = sqlx::Postgres;
type PgValueRef<'r> = sqlx::postgres::PgValueRef<'r>;
type PgTypeInfo = sqlx::postgres::PgTypeInfo;
type PgArgumentBuffer = sqlx::postgres::PgArgumentBuffer;
type EncodeResult =
    Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync + 'static>>;
type BoxDynError = sqlx::error::BoxDynError;

/// Store-assigned identifier of a persisted event.
///
/// Opaque to the rest of the system and unrelated to the domain-level
/// `request_id`: two deliveries of the same push share a `request_id` but
/// receive different `EventId`s.
///
/// # Example
///
/// ```
/// use hookfeed_core::models::EventId;
/// let event_id = EventId::new();
/// println!("Stored event: {}", event_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EventId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl sqlx::Type<PgDb> for EventId {
    fn type_info() -> PgTypeInfo {
        <Uuid as sqlx::Type<PgDb>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, PgDb> for EventId {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let uuid = <Uuid as sqlx::Decode<PgDb>>::decode(value)?;
        Ok(Self(uuid))
    }
}

impl sqlx::Encode<'_, PgDb> for EventId {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> EncodeResult {
        <Uuid as sqlx::Encode<PgDb>>::encode_by_ref(&self.0, buf)
    }
}

/// Action taken on the hosted repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Commits pushed to a branch.
    Push,
    /// Pull request submitted.
    PullRequest,
    /// Pull request merged into its base branch.
    Merge,
}

impl Action {
    /// Returns the wire spelling of the action.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "PUSH",
            Self::PullRequest => "PULL_REQUEST",
            Self::Merge => "MERGE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUSH" => Ok(Self::Push),
            "PULL_REQUEST" => Ok(Self::PullRequest),
            "MERGE" => Ok(Self::Merge),
            _ => Err(format!("Invalid action: {s}")),
        }
    }
}

/// Normalized record of one action on the repository.
///
/// All six fields are always populated; the normalizer refuses to build a
/// record from an incomplete payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    /// Post-push commit hash, or the pull request identifier.
    pub request_id: String,
    /// Actor the action is attributed to.
    pub author: String,
    /// What happened.
    pub action: Action,
    /// Source branch name.
    pub from_branch: String,
    /// Destination branch name; equals `from_branch` for pushes.
    pub to_branch: String,
    /// ISO-8601 UTC timestamp, `Z`-suffixed when rendered by us.
    pub timestamp: String,
}

impl CanonicalEvent {
    /// Renders the record as a one-line activity message.
    ///
    /// The date is shown as `1 January 2024, 12:00 AM UTC` when the
    /// timestamp parses as ISO-8601; otherwise the raw text is used.
    pub fn describe(&self) -> String {
        let when = display_date(&self.timestamp).unwrap_or_else(|| self.timestamp.clone());
        match self.action {
            Action::Push => format!("\"{}\" pushed to \"{}\" on {when}", self.author, self.to_branch),
            Action::PullRequest => format!(
                "\"{}\" submitted a pull request from \"{}\" to \"{}\" on {when}",
                self.author, self.from_branch, self.to_branch
            ),
            Action::Merge => format!(
                "\"{}\" merged branch \"{}\" to \"{}\" on {when}",
                self.author, self.from_branch, self.to_branch
            ),
        }
    }
}

fn display_date(timestamp: &str) -> Option<String> {
    let utc = DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()?;
    Some(utc.format("%-d %B %Y, %-I:%M %p UTC").to_string())
}

/// A persisted record together with its store-assigned identifier.
///
/// Serializes flat: the six canonical fields plus `_id` as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Identifier assigned by the store on insert.
    #[serde(rename = "_id")]
    pub id: EventId,
    /// The record as it was appended.
    #[serde(flatten)]
    pub event: CanonicalEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(action: Action) -> CanonicalEvent {
        CanonicalEvent {
            request_id: "42".into(),
            author: "bob".into(),
            action,
            from_branch: "feature-x".into(),
            to_branch: "main".into(),
            timestamp: "2024-01-02T15:30:00Z".into(),
        }
    }

    #[test]
    fn action_serializes_in_screaming_case() {
        assert_eq!(serde_json::to_value(Action::PullRequest).unwrap(), "PULL_REQUEST");
        assert_eq!(serde_json::to_value(Action::Merge).unwrap(), "MERGE");
        assert_eq!("PUSH".parse::<Action>().unwrap(), Action::Push);
        assert!("push".parse::<Action>().is_err());
    }

    #[test]
    fn stored_event_renders_id_as_string() {
        let id = EventId::new();
        let stored = StoredEvent { id, event: sample(Action::PullRequest) };

        let json = serde_json::to_value(&stored).unwrap();

        assert_eq!(json["_id"], id.to_string());
        assert_eq!(json["request_id"], "42");
        assert_eq!(json["action"], "PULL_REQUEST");
        assert_eq!(json.as_object().unwrap().len(), 7);
    }

    #[test]
    fn describe_matches_each_action() {
        assert_eq!(
            sample(Action::Push).describe(),
            "\"bob\" pushed to \"main\" on 2 January 2024, 3:30 PM UTC"
        );
        assert_eq!(
            sample(Action::PullRequest).describe(),
            "\"bob\" submitted a pull request from \"feature-x\" to \"main\" on 2 January 2024, \
             3:30 PM UTC"
        );
        assert_eq!(
            sample(Action::Merge).describe(),
            "\"bob\" merged branch \"feature-x\" to \"main\" on 2 January 2024, 3:30 PM UTC"
        );
    }

    #[test]
    fn describe_accepts_naive_and_offset_timestamps() {
        let mut event = sample(Action::Push);
        event.timestamp = "2024-01-01T00:00:00".into();
        assert!(event.describe().ends_with("1 January 2024, 12:00 AM UTC"));

        event.timestamp = "2024-01-01T05:30:00+05:30".into();
        assert!(event.describe().ends_with("1 January 2024, 12:00 AM UTC"));
    }

    #[test]
    fn describe_falls_back_to_raw_timestamp() {
        let mut event = sample(Action::Push);
        event.timestamp = "yesterday".into();
        assert!(event.describe().ends_with("on yesterday"));
    }
}
