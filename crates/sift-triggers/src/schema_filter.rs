//! Per-schema inclusion rule owned by a content trigger.

use serde_json::Value;
use sift_core::SchemaId;

use crate::condition::Condition;
use crate::errors::{Result, TriggerError};

/// Scopes a content trigger to one schema, optionally narrowed by a condition.
///
/// A filter is an immutable value from construction on: there are no setters,
/// so a filter owned by a frozen trigger is frozen as well. Drafts replace
/// filters wholesale instead of editing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFilter {
    schema_id: SchemaId,
    condition: Option<Condition>,
}

impl SchemaFilter {
    /// Create a filter, parsing the condition if one is given.
    ///
    /// A blank condition string is treated as no condition.
    pub fn new(schema_id: impl Into<SchemaId>, condition: Option<&str>) -> Result<Self> {
        Self::bounded(schema_id, condition, usize::MAX)
    }

    /// Like [`SchemaFilter::new`], but rejects a condition longer than
    /// `max_condition_length` bytes before parsing it.
    pub fn bounded(
        schema_id: impl Into<SchemaId>,
        condition: Option<&str>,
        max_condition_length: usize,
    ) -> Result<Self> {
        let schema_id = schema_id.into();
        if schema_id.is_blank() {
            return Err(TriggerError::validation("schema id must not be empty"));
        }
        let condition = match condition.map(str::trim) {
            Some(source) if source.len() > max_condition_length => {
                return Err(TriggerError::validation(format!(
                    "condition for schema {schema_id} exceeds {max_condition_length} bytes"
                )));
            }
            Some(source) if !source.is_empty() => Some(Condition::parse(source)?),
            _ => None,
        };
        Ok(Self {
            schema_id,
            condition,
        })
    }

    /// Create a filter matching every event of the schema.
    pub fn unconditional(schema_id: impl Into<SchemaId>) -> Result<Self> {
        Self::new(schema_id, None)
    }

    /// Create a filter from an already parsed condition.
    pub fn with_condition(schema_id: impl Into<SchemaId>, condition: Condition) -> Result<Self> {
        let mut filter = Self::unconditional(schema_id)?;
        filter.condition = Some(condition);
        Ok(filter)
    }

    /// Schema this filter applies to.
    #[must_use]
    pub fn schema_id(&self) -> &SchemaId {
        &self.schema_id
    }

    /// Optional refining condition.
    #[must_use]
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Whether the filter admits a payload of its schema.
    ///
    /// The caller has already checked the schema id.
    #[must_use]
    pub fn admits(&self, data: &Value) -> bool {
        self.condition.as_ref().is_none_or(|c| c.evaluate(data))
    }
}

crate::freeze::sealed!(SchemaFilter);

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
