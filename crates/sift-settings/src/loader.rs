//! Layered settings loading.
//!
//! Compiled defaults, then the user file deep-merged on top, then `SIFT_*`
//! environment overrides, then validation. In the merge, objects combine
//! key by key, any other value replaces the target, and a `null` leaves the
//! target untouched.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::types::SiftSettings;

/// `~/.sift/settings.json`, or `.sift/settings.json` relative to the working
/// directory when `HOME` is unset.
pub fn settings_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".sift")
        .join("settings.json")
}

/// Load settings from [`settings_path`].
pub fn load_settings() -> Result<SiftSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from `path`, layering the process environment on top.
///
/// A missing file is not an error.
pub fn load_settings_from_path(path: &Path) -> Result<SiftSettings> {
    load_layered(path, |key| std::env::var(key).ok())
}

fn load_layered(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<SiftSettings> {
    let mut merged = serde_json::to_value(SiftSettings::default())?;
    if let Some(user) = read_user_file(path)? {
        deep_merge(&mut merged, user);
    }
    let mut settings: SiftSettings =
        serde_json::from_value(merged).map_err(|source| SettingsError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    apply_overrides(&mut settings, env);
    settings.validate()?;
    Ok(settings)
}

fn read_user_file(path: &Path) -> Result<Option<Value>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(None);
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    debug!(path = %path.display(), "loading settings file");
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| SettingsError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

/// Merge `overlay` into `base` in place.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None if !value.is_null() => {
                        let _ = base.insert(key, value);
                    }
                    None => {}
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Apply `SIFT_*` overrides from the process environment.
///
/// Unparseable values are logged and skipped.
pub fn apply_env_overrides(settings: &mut SiftSettings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

fn apply_overrides(settings: &mut SiftSettings, env: impl Fn(&str) -> Option<String>) {
    if let Some(level) = env("SIFT_LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
        settings.logging.level = level;
    }
    if let Some(json) = typed(&env, "SIFT_LOG_JSON", parse_bool) {
        settings.logging.json = json;
    }
    if let Some(max) = typed(&env, "SIFT_MAX_SCHEMAS", |v| parse_usize_range(v, 1, 100_000)) {
        settings.triggers.max_schemas_per_trigger = max;
    }
    if let Some(max) = typed(&env, "SIFT_MAX_CONDITION_LENGTH", |v| {
        parse_usize_range(v, 1, 1_048_576)
    }) {
        settings.triggers.max_condition_length = max;
    }
    if let Some(strict) = typed(&env, "SIFT_REJECT_DUPLICATE_SCHEMAS", parse_bool) {
        settings.triggers.reject_duplicate_schemas = strict;
    }
}

fn typed<T>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = env(key)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        warn!(key, value = %raw, "ignoring unparseable environment override");
    }
    parsed
}

/// Parse `true`/`false`, `1`/`0`, `yes`/`no` or `on`/`off`, ignoring case.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a `usize` in `min..=max`.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    val.parse().ok().filter(|n| (min..=max).contains(n))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
