//! Rule events.
//!
//! Events are produced by the content platform and delivered by an external
//! event bus. Triggers never see the bus; they only inspect the event value
//! handed to them by the rule engine. All types use `camelCase` serde
//! renaming to match the bus payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{AssetId, SchemaId};

/// What happened to a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentEventKind {
    /// Content item was created.
    Created,
    /// Content item was updated.
    Updated,
    /// Content item was deleted.
    Deleted,
    /// Content item was published.
    Published,
    /// Content item was unpublished.
    Unpublished,
}

impl ContentEventKind {
    /// Returns all content event kinds.
    #[must_use]
    pub fn all() -> &'static [ContentEventKind] {
        &[
            Self::Created,
            Self::Updated,
            Self::Deleted,
            Self::Published,
            Self::Unpublished,
        ]
    }
}

impl std::fmt::Display for ContentEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
            Self::Deleted => write!(f, "deleted"),
            Self::Published => write!(f, "published"),
            Self::Unpublished => write!(f, "unpublished"),
        }
    }
}

/// A change to a content item of some schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEvent {
    /// Schema of the content item that changed.
    pub schema_id: SchemaId,
    /// Kind of change.
    pub kind: ContentEventKind,
    /// Content payload. Opaque to the bus, inspected by conditions.
    #[serde(default)]
    pub data: Value,
    /// When the change happened.
    pub timestamp: DateTime<Utc>,
}

impl ContentEvent {
    /// Create a content event stamped with the current time.
    #[must_use]
    pub fn new(schema_id: impl Into<SchemaId>, kind: ContentEventKind, data: Value) -> Self {
        Self {
            schema_id: schema_id.into(),
            kind,
            data,
            timestamp: Utc::now(),
        }
    }
}

/// What happened to an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetEventKind {
    /// Asset was uploaded.
    Created,
    /// Asset file was replaced.
    Updated,
    /// Asset metadata (name, tags) changed.
    Annotated,
    /// Asset was deleted.
    Deleted,
}

/// A change to an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEvent {
    /// Asset that changed.
    pub asset_id: AssetId,
    /// Kind of change.
    pub kind: AssetEventKind,
    /// Asset metadata (file name, mime type, tags, size, ...).
    #[serde(default)]
    pub data: Value,
    /// When the change happened.
    pub timestamp: DateTime<Utc>,
}

impl AssetEvent {
    /// Create an asset event stamped with the current time.
    #[must_use]
    pub fn new(asset_id: impl Into<AssetId>, kind: AssetEventKind, data: Value) -> Self {
        Self {
            asset_id: asset_id.into(),
            kind,
            data,
            timestamp: Utc::now(),
        }
    }
}

/// API usage observed over a trailing window of days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEvent {
    /// Total API calls counted in the window.
    pub call_count: u64,
    /// Length of the window in days.
    pub num_days: u32,
    /// When the usage was sampled.
    pub timestamp: DateTime<Utc>,
}

impl UsageEvent {
    /// Create a usage sample stamped with the current time.
    #[must_use]
    pub fn new(call_count: u64, num_days: u32) -> Self {
        Self {
            call_count,
            num_days,
            timestamp: Utc::now(),
        }
    }
}

/// An explicit, user-initiated rule invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualEvent {
    /// Who triggered the rule.
    pub actor: String,
    /// When the rule was triggered.
    pub timestamp: DateTime<Utc>,
}

impl ManualEvent {
    /// Create a manual event stamped with the current time.
    #[must_use]
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Event envelope with one variant per event family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", rename_all = "camelCase")]
pub enum RuleEvent {
    /// A content item changed.
    Content(ContentEvent),
    /// An asset changed.
    Asset(AssetEvent),
    /// A usage sample was taken.
    Usage(UsageEvent),
    /// A rule was invoked by hand.
    Manual(ManualEvent),
}

impl RuleEvent {
    /// Timestamp of the wrapped event.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Content(e) => e.timestamp,
            Self::Asset(e) => e.timestamp,
            Self::Usage(e) => e.timestamp,
            Self::Manual(e) => e.timestamp,
        }
    }

    /// Short family name, used in log fields.
    #[must_use]
    pub fn family(&self) -> &'static str {
        match self {
            Self::Content(_) => "content",
            Self::Asset(_) => "asset",
            Self::Usage(_) => "usage",
            Self::Manual(_) => "manual",
        }
    }
}

impl From<ContentEvent> for RuleEvent {
    fn from(e: ContentEvent) -> Self {
        Self::Content(e)
    }
}

impl From<AssetEvent> for RuleEvent {
    fn from(e: AssetEvent) -> Self {
        Self::Asset(e)
    }
}

impl From<UsageEvent> for RuleEvent {
    fn from(e: UsageEvent) -> Self {
        Self::Usage(e)
    }
}

impl From<ManualEvent> for RuleEvent {
    fn from(e: ManualEvent) -> Self {
        Self::Manual(e)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_event_kind_serde_values() {
        assert_eq!(
            serde_json::to_string(&ContentEventKind::Published).unwrap(),
            "\"published\""
        );
        assert_eq!(
            serde_json::to_string(&ContentEventKind::Unpublished).unwrap(),
            "\"unpublished\""
        );
    }

    #[test]
    fn content_event_kind_all_returns_five_variants() {
        assert_eq!(ContentEventKind::all().len(), 5);
    }

    #[test]
    fn content_event_kind_display() {
        assert_eq!(ContentEventKind::Created.to_string(), "created");
        assert_eq!(ContentEventKind::Deleted.to_string(), "deleted");
    }

    #[test]
    fn content_event_uses_camel_case() {
        let event = ContentEvent::new("blog", ContentEventKind::Created, json!({"title": "Hi"}));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["schemaId"], "blog");
        assert_eq!(value["kind"], "created");
        assert_eq!(value["data"]["title"], "Hi");
    }

    #[test]
    fn content_event_data_defaults_to_null() {
        let event: ContentEvent = serde_json::from_value(json!({
            "schemaId": "blog",
            "kind": "updated",
            "timestamp": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(event.data.is_null());
    }

    #[test]
    fn rule_event_tag() {
        let event = RuleEvent::from(ManualEvent::new("editor@example.com"));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["eventType"], "manual");
        assert_eq!(value["actor"], "editor@example.com");
    }

    #[test]
    fn rule_event_family() {
        assert_eq!(RuleEvent::from(UsageEvent::new(10, 1)).family(), "usage");
        assert_eq!(
            RuleEvent::from(AssetEvent::new("a1", AssetEventKind::Annotated, Value::Null)).family(),
            "asset"
        );
    }

    #[test]
    fn rule_event_timestamp_passthrough() {
        let inner = ContentEvent::new("blog", ContentEventKind::Updated, Value::Null);
        let ts = inner.timestamp;
        assert_eq!(RuleEvent::from(inner).timestamp(), ts);
    }
}
