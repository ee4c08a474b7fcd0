//! Upgrade of legacy single-schema content triggers.

use serde::{Deserialize, Serialize};
use sift_core::SchemaId;
use sift_settings::TriggerSettings;
use tracing::{debug, warn};

use crate::errors::{Result, TriggerError};
use crate::schema_filter::SchemaFilter;
use crate::triggers::ContentChangedTriggerV2Draft;

/// Legacy content-changed trigger: at most one schema, no conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChangedTriggerV1 {
    /// The one schema watched when `handle_all` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<SchemaId>,
    /// Fire for every schema.
    #[serde(default)]
    pub handle_all: bool,
}

/// Map a V1 trigger onto an equivalent V2 draft with default limits.
pub fn migrate(legacy: &ContentChangedTriggerV1) -> Result<ContentChangedTriggerV2Draft> {
    migrate_with(legacy, &TriggerSettings::default())
}

/// Map a V1 trigger onto an equivalent V2 draft enforcing `limits`.
///
/// With `handle_all` the schema id is dropped, since it has no effect on
/// matching. Otherwise the schema id becomes a single unconditional filter
/// and must be present.
pub fn migrate_with(
    legacy: &ContentChangedTriggerV1,
    limits: &TriggerSettings,
) -> Result<ContentChangedTriggerV2Draft> {
    if legacy.handle_all {
        if let Some(schema_id) = &legacy.schema_id {
            debug!(%schema_id, "dropping schema id from handle-all legacy trigger");
        }
        debug!("migrated legacy content trigger to handle-all");
        return ContentChangedTriggerV2Draft::from_parts([], true, limits).map_err(rejected);
    }

    let schema_id = match &legacy.schema_id {
        Some(id) if !id.is_blank() => id.clone(),
        _ => {
            warn!("legacy content trigger has neither a schema id nor handle_all");
            return Err(TriggerError::migration(
                "legacy trigger has no schema id and does not handle all schemas",
            ));
        }
    };
    debug!(%schema_id, "migrated legacy content trigger");
    let filter = SchemaFilter::unconditional(schema_id).map_err(rejected)?;
    ContentChangedTriggerV2Draft::from_parts([filter], false, limits).map_err(rejected)
}

fn rejected(err: TriggerError) -> TriggerError {
    warn!(error = %err, "migrated content trigger violates authoring limits");
    TriggerError::migration(format!("migrated trigger is invalid: {err}"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
