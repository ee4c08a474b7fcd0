//! Asset-changed trigger: fires on asset events, optionally narrowed by a condition.

use sift_core::AssetEvent;
use sift_settings::TriggerSettings;
use tracing::debug;

use crate::condition::Condition;
use crate::errors::{Result, TriggerError};
use crate::freeze::{Freeze, sealed};
use crate::visitor::{Accept, RuleTriggerVisitor};

/// Sealed asset-changed trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetChangedTriggerV2 {
    condition: Option<Condition>,
}

impl AssetChangedTriggerV2 {
    /// Trigger kind name shown to rule authors.
    pub const NAME: &'static str = "AssetChanged";

    /// Optional condition over the asset payload.
    #[must_use]
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Whether an asset event fires this trigger.
    #[must_use]
    pub fn matches(&self, event: &AssetEvent) -> bool {
        self.condition.as_ref().is_none_or(|c| c.evaluate(&event.data))
    }

    /// Start a new draft seeded with this trigger's values.
    ///
    /// The condition is checked against `limits`, which may be stricter than
    /// the ones this trigger was built under.
    pub fn to_draft(&self, limits: &TriggerSettings) -> Result<AssetChangedTriggerV2Draft> {
        let mut draft = AssetChangedTriggerV2Draft::with_limits(limits);
        if let Some(condition) = &self.condition {
            if condition.source().len() > limits.max_condition_length {
                return Err(TriggerError::validation(format!(
                    "asset condition exceeds {} bytes",
                    limits.max_condition_length
                )));
            }
            draft.condition = Some(condition.clone());
        }
        Ok(draft)
    }
}

sealed!(AssetChangedTriggerV2);

impl Accept for AssetChangedTriggerV2 {
    fn accept<V: RuleTriggerVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_asset_changed(self)
    }
}

/// Mutable asset-changed trigger under construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetChangedTriggerV2Draft {
    condition: Option<Condition>,
    limits: TriggerSettings,
}

impl AssetChangedTriggerV2Draft {
    /// Draft with no condition and default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft with no condition enforcing the given limits.
    #[must_use]
    pub fn with_limits(limits: &TriggerSettings) -> Self {
        Self {
            condition: None,
            limits: limits.clone(),
        }
    }

    /// Current condition.
    #[must_use]
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Set or clear the condition. A blank string clears it.
    pub fn set_condition(&mut self, source: Option<&str>) -> Result<&mut Self> {
        let source = source.map(str::trim).filter(|s| !s.is_empty());
        self.condition = match source {
            Some(source) => {
                if source.len() > self.limits.max_condition_length {
                    return Err(TriggerError::validation(format!(
                        "asset condition exceeds {} bytes",
                        self.limits.max_condition_length
                    )));
                }
                Some(Condition::parse(source)?)
            }
            None => None,
        };
        Ok(self)
    }
}

impl Freeze for AssetChangedTriggerV2Draft {
    type Frozen = AssetChangedTriggerV2;

    fn freeze(self) -> AssetChangedTriggerV2 {
        debug!(
            conditional = self.condition.is_some(),
            "freezing asset-changed trigger"
        );
        AssetChangedTriggerV2 {
            condition: self.condition,
        }
    }

    fn is_frozen(&self) -> bool {
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use sift_core::AssetEventKind;

    fn upload(data: serde_json::Value) -> AssetEvent {
        AssetEvent::new("asset-1", AssetEventKind::Created, data)
    }

    #[test]
    fn unconditional_matches_every_asset_event() {
        let t = AssetChangedTriggerV2Draft::new().freeze();
        assert!(t.matches(&upload(json!({}))));
        assert!(t.matches(&upload(serde_json::Value::Null)));
    }

    #[test]
    fn condition_narrows_matches() {
        let mut draft = AssetChangedTriggerV2Draft::new();
        let _ = draft.set_condition(Some("fileSize > 1000")).unwrap();
        let t = draft.freeze();
        assert!(t.matches(&upload(json!({"fileSize": 2048}))));
        assert!(!t.matches(&upload(json!({"fileSize": 10}))));
        assert!(!t.matches(&upload(json!({}))));
    }

    #[test]
    fn blank_condition_clears() {
        let mut draft = AssetChangedTriggerV2Draft::new();
        let _ = draft.set_condition(Some("isImage")).unwrap();
        let _ = draft.set_condition(Some("  ")).unwrap();
        assert!(draft.condition().is_none());
    }

    #[test]
    fn invalid_condition_is_rejected() {
        let mut draft = AssetChangedTriggerV2Draft::new();
        assert_matches!(
            draft.set_condition(Some("fileSize >")),
            Err(TriggerError::Validation { .. })
        );
        assert!(draft.condition().is_none());
    }

    #[test]
    fn condition_length_limit() {
        let limits = TriggerSettings {
            max_condition_length: 4,
            ..TriggerSettings::default()
        };
        let mut draft = AssetChangedTriggerV2Draft::with_limits(&limits);
        assert_matches!(
            draft.set_condition(Some("isImage")),
            Err(TriggerError::Validation { .. })
        );
    }

    #[test]
    fn freeze_is_idempotent() {
        let mut draft = AssetChangedTriggerV2Draft::new();
        let _ = draft.set_condition(Some("isImage == true")).unwrap();
        let once = draft.freeze();
        assert!(once.is_frozen());
        assert_eq!(once.clone().freeze(), once);
    }

    #[test]
    fn to_draft_copies_condition() {
        let mut draft = AssetChangedTriggerV2Draft::new();
        let _ = draft.set_condition(Some("isImage")).unwrap();
        let sealed = draft.freeze();
        let thawed = sealed.to_draft(&TriggerSettings::default()).unwrap();
        assert_eq!(thawed.condition(), sealed.condition());
    }

    #[test]
    fn to_draft_rechecks_condition_length() {
        let mut draft = AssetChangedTriggerV2Draft::new();
        let _ = draft.set_condition(Some("fileSize > 1000")).unwrap();
        let sealed = draft.freeze();
        let strict = TriggerSettings {
            max_condition_length: 8,
            ..TriggerSettings::default()
        };
        assert_matches!(
            sealed.to_draft(&strict),
            Err(TriggerError::Validation { ref message }) if message.contains("exceeds 8 bytes")
        );
    }
}
