//! # sift-settings
//!
//! Configuration management with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`SiftSettings::default()`]
//! 2. **User file**: `~/.sift/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `SIFT_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use sift_settings::get_settings;
//!
//! let settings = get_settings();
//! println!("max schemas: {}", settings.triggers.max_schemas_per_trigger);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, load_settings, load_settings_from_path, settings_path,
};
pub use types::*;

use std::sync::OnceLock;

/// Global settings singleton.
static SETTINGS: OnceLock<SiftSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.sift/settings.json` with env var
/// overrides. If loading fails, returns compiled defaults.
pub fn get_settings() -> &'static SiftSettings {
    SETTINGS.get_or_init(|| {
        load_settings().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to load settings, using defaults");
            SiftSettings::default()
        })
    })
}

/// Initialize the global settings with a specific value.
///
/// Returns `Err(settings)` if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: SiftSettings) -> std::result::Result<(), SiftSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = SiftSettings::default();
        let _triggers = TriggerSettings::default();
        let _path = settings_path();
    }

    #[test]
    fn deep_merge_re_exported() {
        let mut merged = serde_json::json!({"x": 1});
        deep_merge(&mut merged, serde_json::json!({"y": 2}));
        assert_eq!(merged, serde_json::json!({"x": 1, "y": 2}));
    }

    #[test]
    fn global_settings_are_stable() {
        let first: *const SiftSettings = get_settings();
        assert!(std::ptr::eq(first, get_settings()));
        assert!(init_settings(SiftSettings::default()).is_err());
    }
}
