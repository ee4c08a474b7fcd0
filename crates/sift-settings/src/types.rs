//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a settings
//! file may be partial; missing fields keep their compiled default.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// Loaded from `~/.sift/settings.json` with defaults applied for missing
/// fields. Environment variables can override specific values. Example:
///
/// ```json
/// {
///   "logging": { "level": "debug" },
///   "triggers": { "rejectDuplicateSchemas": true }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiftSettings {
    /// Settings schema version.
    pub version: String,
    /// Logging configuration.
    pub logging: LoggingSettings,
    /// Trigger authoring limits.
    pub triggers: TriggerSettings,
}

impl Default for SiftSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            logging: LoggingSettings::default(),
            triggers: TriggerSettings::default(),
        }
    }
}

impl SiftSettings {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.triggers.validate()
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level (or `EnvFilter` directive) for the stderr subscriber.
    pub level: String,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

/// Limits enforced when a trigger is authored and frozen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TriggerSettings {
    /// Maximum number of schema filters on one content trigger.
    pub max_schemas_per_trigger: usize,
    /// Maximum length of a condition expression in bytes.
    pub max_condition_length: usize,
    /// Reject triggers listing the same schema twice.
    ///
    /// Off by default: duplicates are redundant and evaluated with OR.
    pub reject_duplicate_schemas: bool,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            max_schemas_per_trigger: 256,
            max_condition_length: 4096,
            reject_duplicate_schemas: false,
        }
    }
}

impl TriggerSettings {
    /// Check that the limits are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_schemas_per_trigger == 0 {
            return Err(SettingsError::invalid(
                "triggers.maxSchemasPerTrigger",
                "must be at least 1",
            ));
        }
        if self.max_condition_length == 0 {
            return Err(SettingsError::invalid(
                "triggers.maxConditionLength",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
