//! Error types for the trigger model.

use thiserror::Error;

use crate::condition::ConditionError;

/// Errors raised while authoring, editing, or migrating triggers.
///
/// All variants are local and deterministic. Matching never produces an
/// error; it degrades to "no match" instead.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// A trigger or schema filter is structurally invalid.
    #[error("invalid trigger: {message}")]
    Validation {
        /// Description of the problem.
        message: String,
    },

    /// Mutation was attempted on a frozen trigger.
    #[error("trigger {trigger_id} is frozen and cannot be modified")]
    ImmutableState {
        /// ID of the frozen trigger definition.
        trigger_id: String,
    },

    /// A legacy trigger value cannot be mapped to the current shape.
    #[error("cannot migrate trigger: {message}")]
    Migration {
        /// Description of the problem.
        message: String,
    },
}

impl TriggerError {
    /// Shorthand for a [`TriggerError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`TriggerError::Migration`].
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration {
            message: message.into(),
        }
    }
}

impl From<ConditionError> for TriggerError {
    fn from(err: ConditionError) -> Self {
        Self::validation(format!("condition {err}"))
    }
}

/// Result type for trigger operations.
pub type Result<T> = std::result::Result<T, TriggerError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = TriggerError::validation("schema id must not be empty");
        assert_eq!(err.to_string(), "invalid trigger: schema id must not be empty");
    }

    #[test]
    fn immutable_state_display() {
        let err = TriggerError::ImmutableState {
            trigger_id: "t-1".to_string(),
        };
        assert_eq!(err.to_string(), "trigger t-1 is frozen and cannot be modified");
    }

    #[test]
    fn migration_display() {
        let err = TriggerError::migration("missing schema id");
        assert_eq!(err.to_string(), "cannot migrate trigger: missing schema id");
    }

    #[test]
    fn condition_error_becomes_validation() {
        let err: TriggerError = ConditionError::Parse {
            message: "empty expression".to_string(),
        }
        .into();
        assert!(matches!(err, TriggerError::Validation { .. }));
        assert!(err.to_string().contains("empty expression"));
    }
}
