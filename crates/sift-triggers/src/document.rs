//! Serialized trigger shapes handed to the persistence layer.
//!
//! Documents are plain data: conditions are kept as source text and nothing
//! is validated until [`TriggerDocument::into_draft`]. Writing always uses the
//! newest shape of each kind; reading also accepts the legacy V1 content
//! trigger and routes it through [`migrate_with`].

use serde::{Deserialize, Serialize};
use sift_core::SchemaId;
use sift_settings::TriggerSettings;

use crate::errors::Result;
use crate::freeze::Freeze;
use crate::migration::{ContentChangedTriggerV1, migrate_with};
use crate::schema_filter::SchemaFilter;
use crate::triggers::{
    AssetChangedTriggerV2Draft, ContentChangedTriggerV2Draft, RuleTrigger, RuleTriggerDraft,
    UsageTriggerDraft,
};

/// One schema entry of a content trigger document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFilterDocument {
    /// Schema the entry applies to.
    pub schema_id: SchemaId,
    /// Condition source text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl From<&SchemaFilter> for SchemaFilterDocument {
    fn from(filter: &SchemaFilter) -> Self {
        Self {
            schema_id: filter.schema_id().clone(),
            condition: filter.condition().map(|c| c.source().to_string()),
        }
    }
}

/// Trigger as stored, discriminated by `triggerType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "triggerType")]
pub enum TriggerDocument {
    /// Legacy single-schema content trigger. Read only.
    #[serde(rename = "ContentChangedTrigger")]
    ContentChangedV1(ContentChangedTriggerV1),

    /// Content trigger with per-schema filters.
    #[serde(rename = "ContentChangedTriggerV2", rename_all = "camelCase")]
    ContentChangedV2 {
        /// Schema entries in authoring order.
        #[serde(default)]
        schemas: Vec<SchemaFilterDocument>,
        /// Fire for every schema.
        #[serde(default)]
        handle_all: bool,
    },

    /// Asset trigger.
    #[serde(rename = "AssetChangedTriggerV2")]
    AssetChanged {
        /// Condition source text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
    },

    /// Usage threshold trigger.
    #[serde(rename = "UsageTrigger", rename_all = "camelCase")]
    Usage {
        /// Call count threshold.
        num_calls: u64,
        /// Widest reporting window in days.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        num_days: Option<u32>,
    },

    /// Manual trigger.
    #[serde(rename = "ManualTrigger")]
    Manual,
}

impl TriggerDocument {
    /// Validate the document into a draft, migrating legacy shapes.
    pub fn into_draft(self, limits: &TriggerSettings) -> Result<RuleTriggerDraft> {
        let draft: RuleTriggerDraft = match self {
            Self::ContentChangedV1(legacy) => migrate_with(&legacy, limits)?.into(),
            Self::ContentChangedV2 {
                schemas,
                handle_all,
            } => {
                let filters = schemas
                    .into_iter()
                    .map(|s| {
                        SchemaFilter::bounded(
                            s.schema_id,
                            s.condition.as_deref(),
                            limits.max_condition_length,
                        )
                    })
                    .collect::<Result<Vec<_>>>()?;
                ContentChangedTriggerV2Draft::from_parts(filters, handle_all, limits)?.into()
            }
            Self::AssetChanged { condition } => {
                let mut draft = AssetChangedTriggerV2Draft::with_limits(limits);
                let _ = draft.set_condition(condition.as_deref())?;
                draft.into()
            }
            Self::Usage {
                num_calls,
                num_days,
            } => {
                let mut draft = UsageTriggerDraft::new(num_calls)?;
                let _ = draft.set_num_days(num_days)?;
                draft.into()
            }
            Self::Manual => RuleTriggerDraft::Manual,
        };
        Ok(draft)
    }

    /// Validate and freeze the document.
    pub fn into_trigger(self, limits: &TriggerSettings) -> Result<RuleTrigger> {
        Ok(self.into_draft(limits)?.freeze())
    }

    /// Whether this document uses a superseded shape.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::ContentChangedV1(_))
    }
}

impl From<&RuleTrigger> for TriggerDocument {
    fn from(trigger: &RuleTrigger) -> Self {
        match trigger {
            RuleTrigger::ContentChanged(t) => Self::ContentChangedV2 {
                schemas: t.schemas().iter().map(SchemaFilterDocument::from).collect(),
                handle_all: t.handle_all(),
            },
            RuleTrigger::AssetChanged(t) => Self::AssetChanged {
                condition: t.condition().map(|c| c.source().to_string()),
            },
            RuleTrigger::Usage(t) => Self::Usage {
                num_calls: t.num_calls(),
                num_days: t.num_days(),
            },
            RuleTrigger::Manual(_) => Self::Manual,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TriggerError;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> TriggerDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn reads_content_v2() {
        let doc = parse(json!({
            "triggerType": "ContentChangedTriggerV2",
            "schemas": [
                {"schemaId": "blog", "condition": "status == 'published'"},
                {"schemaId": "news"}
            ],
            "handleAll": false
        }));
        let trigger = doc.into_trigger(&TriggerSettings::default()).unwrap();
        let RuleTrigger::ContentChanged(t) = trigger else {
            panic!("expected content trigger");
        };
        assert_eq!(t.schemas().len(), 2);
        assert_eq!(
            t.schemas()[0].condition().map(|c| c.source()),
            Some("status == 'published'")
        );
        assert!(t.schemas()[1].condition().is_none());
    }

    #[test]
    fn legacy_document_is_migrated() {
        let doc = parse(json!({"triggerType": "ContentChangedTrigger", "schemaId": "blog"}));
        assert!(doc.is_legacy());
        let trigger = doc.into_trigger(&TriggerSettings::default()).unwrap();
        assert_eq!(
            serde_json::to_value(TriggerDocument::from(&trigger)).unwrap(),
            json!({
                "triggerType": "ContentChangedTriggerV2",
                "schemas": [{"schemaId": "blog"}],
                "handleAll": false
            })
        );
    }

    #[test]
    fn legacy_document_without_schema_fails_migration() {
        let doc = parse(json!({"triggerType": "ContentChangedTrigger"}));
        assert_matches!(
            doc.into_draft(&TriggerSettings::default()),
            Err(TriggerError::Migration { .. })
        );
    }

    #[test]
    fn invalid_content_surfaces_validation_errors() {
        let doc = parse(json!({
            "triggerType": "ContentChangedTriggerV2",
            "schemas": [{"schemaId": "blog", "condition": "status =="}]
        }));
        assert_matches!(
            doc.into_draft(&TriggerSettings::default()),
            Err(TriggerError::Validation { .. })
        );

        let doc = parse(json!({
            "triggerType": "ContentChangedTriggerV2",
            "schemas": [{"schemaId": ""}]
        }));
        assert_matches!(
            doc.into_draft(&TriggerSettings::default()),
            Err(TriggerError::Validation { .. })
        );
    }

    #[test]
    fn oversized_condition_is_rejected_before_parsing() {
        let limits = TriggerSettings {
            max_condition_length: 64,
            ..TriggerSettings::default()
        };
        let deep = format!("{}a{}", "(".repeat(100_000), ")".repeat(100_000));
        let doc = parse(json!({
            "triggerType": "ContentChangedTriggerV2",
            "schemas": [{"schemaId": "blog", "condition": deep}]
        }));
        let err = doc.into_draft(&limits).unwrap_err();
        assert_matches!(err, TriggerError::Validation { ref message } if message.contains("exceeds 64 bytes"));

        let doc = parse(json!({"triggerType": "AssetChangedTriggerV2", "condition": deep}));
        assert_matches!(doc.into_draft(&limits), Err(TriggerError::Validation { .. }));
    }

    #[test]
    fn nested_condition_within_length_limit_is_a_validation_error() {
        let deep = format!("{}a{}", "(".repeat(2000), ")".repeat(2000));
        let doc = parse(json!({
            "triggerType": "ContentChangedTriggerV2",
            "schemas": [{"schemaId": "blog", "condition": deep}]
        }));
        assert_matches!(
            doc.into_draft(&TriggerSettings::default()),
            Err(TriggerError::Validation { .. })
        );
    }

    #[test]
    fn strict_limits_apply_to_documents() {
        let limits = TriggerSettings {
            reject_duplicate_schemas: true,
            ..TriggerSettings::default()
        };
        let doc = parse(json!({
            "triggerType": "ContentChangedTriggerV2",
            "schemas": [{"schemaId": "blog"}, {"schemaId": "blog"}]
        }));
        assert_matches!(doc.into_draft(&limits), Err(TriggerError::Validation { .. }));
    }

    #[test]
    fn other_kinds() {
        let usage = parse(json!({"triggerType": "UsageTrigger", "numCalls": 100, "numDays": 7}))
            .into_trigger(&TriggerSettings::default())
            .unwrap();
        assert_matches!(usage, RuleTrigger::Usage(u) if u.num_calls() == 100 && u.num_days() == Some(7));

        let manual = parse(json!({"triggerType": "ManualTrigger"}))
            .into_trigger(&TriggerSettings::default())
            .unwrap();
        assert_eq!(manual.name(), "Manual");

        let asset = parse(json!({"triggerType": "AssetChangedTriggerV2", "condition": "isImage"}))
            .into_trigger(&TriggerSettings::default())
            .unwrap();
        assert_eq!(
            serde_json::to_value(TriggerDocument::from(&asset)).unwrap(),
            json!({"triggerType": "AssetChangedTriggerV2", "condition": "isImage"})
        );

        assert_matches!(
            parse(json!({"triggerType": "UsageTrigger", "numCalls": 0}))
                .into_draft(&TriggerSettings::default()),
            Err(TriggerError::Validation { .. })
        );
    }

    #[test]
    fn unknown_trigger_type_is_rejected() {
        let result: std::result::Result<TriggerDocument, _> =
            serde_json::from_value(json!({"triggerType": "Webhook"}));
        assert!(result.is_err());
    }
}
