//! Content-changed trigger (V2): fires on content events of selected schemas.

use std::sync::Arc;

use sift_core::{ContentEvent, SchemaId};
use sift_settings::TriggerSettings;
use tracing::debug;

use crate::errors::{Result, TriggerError};
use crate::freeze::{Freeze, sealed};
use crate::schema_filter::SchemaFilter;
use crate::visitor::{Accept, RuleTriggerVisitor};

/// Sealed content-changed trigger.
///
/// `schemas` keeps authoring order for display; order has no effect on
/// matching. The filter list is shared behind an `Arc`, so clones are cheap
/// and a published trigger can be read from any number of threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChangedTriggerV2 {
    schemas: Arc<[SchemaFilter]>,
    handle_all: bool,
}

impl ContentChangedTriggerV2 {
    /// Trigger kind name shown to rule authors.
    pub const NAME: &'static str = "ContentChanged";

    /// Read-only view of the schema filters.
    #[must_use]
    pub fn schemas(&self) -> &[SchemaFilter] {
        &self.schemas
    }

    /// Whether the trigger fires for every schema.
    #[must_use]
    pub fn handle_all(&self) -> bool {
        self.handle_all
    }

    /// Decide whether a content event fires this trigger.
    ///
    /// With `handle_all` every event matches. Otherwise each filter for the
    /// event's schema is tried in order and the first one admitting the
    /// payload wins; duplicate filters for one schema are OR-ed.
    #[must_use]
    pub fn matches(&self, event: &ContentEvent) -> bool {
        if self.handle_all {
            return true;
        }
        self.schemas
            .iter()
            .filter(|filter| filter.schema_id() == &event.schema_id)
            .any(|filter| filter.admits(&event.data))
    }

    /// Start a new draft seeded with this trigger's values.
    ///
    /// The sealed trigger itself is left untouched. Every filter is checked
    /// against `limits` again, so a trigger built under looser limits is
    /// rejected rather than carried into the draft.
    pub fn to_draft(&self, limits: &TriggerSettings) -> Result<ContentChangedTriggerV2Draft> {
        ContentChangedTriggerV2Draft::from_parts(
            self.schemas.iter().cloned(),
            self.handle_all,
            limits,
        )
    }
}

sealed!(ContentChangedTriggerV2);

impl Accept for ContentChangedTriggerV2 {
    fn accept<V: RuleTriggerVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_content_changed(self)
    }
}

/// Mutable content-changed trigger under construction.
///
/// Every mutator validates against the authoring limits, so a draft is
/// always in a valid state and freezing cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentChangedTriggerV2Draft {
    schemas: Vec<SchemaFilter>,
    handle_all: bool,
    limits: TriggerSettings,
}

impl ContentChangedTriggerV2Draft {
    /// Create an empty draft with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty draft enforcing the given limits.
    #[must_use]
    pub fn with_limits(limits: &TriggerSettings) -> Self {
        Self {
            limits: limits.clone(),
            ..Self::default()
        }
    }

    /// Build a draft from complete values, validating every filter.
    pub fn from_parts(
        schemas: impl IntoIterator<Item = SchemaFilter>,
        handle_all: bool,
        limits: &TriggerSettings,
    ) -> Result<Self> {
        let mut draft = Self::with_limits(limits);
        let _ = draft.set_handle_all(handle_all);
        for filter in schemas {
            let _ = draft.add_schema(filter)?;
        }
        Ok(draft)
    }

    /// Current schema filters.
    #[must_use]
    pub fn schemas(&self) -> &[SchemaFilter] {
        &self.schemas
    }

    /// Current `handle_all` flag.
    #[must_use]
    pub fn handle_all(&self) -> bool {
        self.handle_all
    }

    /// Set the `handle_all` flag. The filter list is kept either way.
    pub fn set_handle_all(&mut self, handle_all: bool) -> &mut Self {
        self.handle_all = handle_all;
        self
    }

    /// Append a schema filter.
    pub fn add_schema(&mut self, filter: SchemaFilter) -> Result<&mut Self> {
        if self.schemas.len() >= self.limits.max_schemas_per_trigger {
            return Err(TriggerError::validation(format!(
                "trigger cannot have more than {} schemas",
                self.limits.max_schemas_per_trigger
            )));
        }
        self.check_filter(&filter, None)?;
        self.schemas.push(filter);
        Ok(self)
    }

    /// Replace the filter at `index`, returning the old one.
    pub fn replace_schema(&mut self, index: usize, filter: SchemaFilter) -> Result<SchemaFilter> {
        if index >= self.schemas.len() {
            return Err(TriggerError::validation(format!(
                "schema index {index} out of range (len {})",
                self.schemas.len()
            )));
        }
        self.check_filter(&filter, Some(index))?;
        Ok(std::mem::replace(&mut self.schemas[index], filter))
    }

    /// Remove every filter for `schema_id`, returning how many were removed.
    pub fn remove_schema(&mut self, schema_id: &SchemaId) -> usize {
        let before = self.schemas.len();
        self.schemas.retain(|f| f.schema_id() != schema_id);
        before - self.schemas.len()
    }

    /// Remove all filters.
    pub fn clear_schemas(&mut self) -> &mut Self {
        self.schemas.clear();
        self
    }

    fn check_filter(&self, filter: &SchemaFilter, replacing: Option<usize>) -> Result<()> {
        let max_len = self.limits.max_condition_length;
        if filter.condition().is_some_and(|c| c.source().len() > max_len) {
            return Err(TriggerError::validation(format!(
                "condition for schema {} exceeds {max_len} bytes",
                filter.schema_id()
            )));
        }
        if self.limits.reject_duplicate_schemas {
            let duplicate = self
                .schemas
                .iter()
                .enumerate()
                .any(|(i, f)| Some(i) != replacing && f.schema_id() == filter.schema_id());
            if duplicate {
                debug!(schema_id = %filter.schema_id(), "rejecting duplicate schema filter");
                return Err(TriggerError::validation(format!(
                    "schema {} is listed more than once",
                    filter.schema_id()
                )));
            }
        }
        Ok(())
    }
}

impl Freeze for ContentChangedTriggerV2Draft {
    type Frozen = ContentChangedTriggerV2;

    fn freeze(self) -> ContentChangedTriggerV2 {
        debug!(
            schema_count = self.schemas.len(),
            handle_all = self.handle_all,
            "freezing content-changed trigger"
        );
        ContentChangedTriggerV2 {
            schemas: self.schemas.into(),
            handle_all: self.handle_all,
        }
    }

    fn is_frozen(&self) -> bool {
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
