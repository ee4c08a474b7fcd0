//! Runtime lifecycle for triggers whose state is only known at run time.
//!
//! A rule editor holds a [`TriggerDefinition`] that starts as a draft and is
//! frozen when the rule is published. After that, edits are refused with
//! [`TriggerError::ImmutableState`].

use sift_core::TriggerId;
use tracing::debug;

use crate::errors::{Result, TriggerError};
use crate::freeze::Freeze;
use crate::triggers::{RuleTrigger, RuleTriggerDraft};

#[derive(Debug, Clone, PartialEq, Eq)]
enum TriggerState {
    Draft(RuleTriggerDraft),
    Frozen(RuleTrigger),
}

/// An identified trigger that is either editable or frozen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerDefinition {
    id: TriggerId,
    state: TriggerState,
}

impl TriggerDefinition {
    /// New definition with a fresh ID.
    #[must_use]
    pub fn new(draft: impl Into<RuleTriggerDraft>) -> Self {
        Self::with_id(TriggerId::new(), draft)
    }

    /// New definition with a known ID.
    #[must_use]
    pub fn with_id(id: impl Into<TriggerId>, draft: impl Into<RuleTriggerDraft>) -> Self {
        Self {
            id: id.into(),
            state: TriggerState::Draft(draft.into()),
        }
    }

    /// Definition wrapping an already sealed trigger.
    #[must_use]
    pub fn sealed(id: impl Into<TriggerId>, trigger: RuleTrigger) -> Self {
        Self {
            id: id.into(),
            state: TriggerState::Frozen(trigger),
        }
    }

    /// Definition ID.
    #[must_use]
    pub fn id(&self) -> &TriggerId {
        &self.id
    }

    /// Kind name of the wrapped trigger.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match &self.state {
            TriggerState::Draft(d) => d.name(),
            TriggerState::Frozen(t) => t.name(),
        }
    }

    /// Whether the definition has been frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        matches!(self.state, TriggerState::Frozen(_))
    }

    /// Freeze the definition. Calling this again is a no-op.
    ///
    /// Returns `true` if this call performed the transition.
    pub fn freeze(&mut self) -> bool {
        let placeholder = TriggerState::Draft(RuleTriggerDraft::Manual);
        match std::mem::replace(&mut self.state, placeholder) {
            TriggerState::Draft(draft) => {
                debug!(trigger_id = %self.id, kind = draft.name(), "freezing trigger definition");
                self.state = TriggerState::Frozen(draft.freeze());
                true
            }
            frozen @ TriggerState::Frozen(_) => {
                self.state = frozen;
                false
            }
        }
    }

    /// The sealed trigger, once frozen.
    #[must_use]
    pub fn trigger(&self) -> Option<&RuleTrigger> {
        match &self.state {
            TriggerState::Frozen(trigger) => Some(trigger),
            TriggerState::Draft(_) => None,
        }
    }

    /// The draft, while still editable.
    #[must_use]
    pub fn draft(&self) -> Option<&RuleTriggerDraft> {
        match &self.state {
            TriggerState::Draft(draft) => Some(draft),
            TriggerState::Frozen(_) => None,
        }
    }

    /// Apply an edit to the draft.
    ///
    /// Fails with [`TriggerError::ImmutableState`] once frozen. An error
    /// returned by `f` is passed through unchanged.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut RuleTriggerDraft) -> Result<R>) -> Result<R> {
        match &mut self.state {
            TriggerState::Draft(draft) => f(draft),
            TriggerState::Frozen(_) => {
                debug!(trigger_id = %self.id, "rejecting edit of frozen trigger");
                Err(TriggerError::ImmutableState {
                    trigger_id: self.id.to_string(),
                })
            }
        }
    }

    /// Freeze if needed and hand out the sealed trigger.
    #[must_use]
    pub fn publish(self) -> RuleTrigger {
        match self.state {
            TriggerState::Frozen(trigger) => trigger,
            TriggerState::Draft(draft) => {
                debug!(trigger_id = %self.id, kind = draft.name(), "publishing trigger definition");
                draft.freeze()
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema_filter::SchemaFilter;
    use crate::triggers::{ContentChangedTriggerV2Draft, UsageTriggerDraft};
    use assert_matches::assert_matches;

    fn content_definition() -> TriggerDefinition {
        TriggerDefinition::with_id("trg-1", ContentChangedTriggerV2Draft::new())
    }

    #[test]
    fn edits_apply_while_draft() {
        let mut def = content_definition();
        assert!(!def.is_frozen());
        assert!(def.trigger().is_none());
        def.edit(|draft| {
            let content = draft
                .as_content_changed_mut()
                .ok_or_else(|| TriggerError::validation("not a content trigger"))?;
            let _ = content.add_schema(SchemaFilter::unconditional("blog")?)?;
            Ok(())
        })
        .unwrap();
        assert_matches!(
            def.draft(),
            Some(RuleTriggerDraft::ContentChanged(d)) if d.schemas().len() == 1
        );
    }

    #[test]
    fn edit_error_passes_through() {
        let mut def = content_definition();
        let result = def.edit(|draft| {
            let content = draft
                .as_content_changed_mut()
                .ok_or_else(|| TriggerError::validation("not a content trigger"))?;
            let _ = content.add_schema(SchemaFilter::unconditional("")?)?;
            Ok(())
        });
        assert_matches!(result, Err(TriggerError::Validation { .. }));
        assert!(!def.is_frozen());
    }

    #[test]
    fn edit_after_freeze_is_rejected() {
        let mut def = content_definition();
        let _ = def.freeze();
        let err = def.edit(|_| Ok(())).unwrap_err();
        assert_matches!(err, TriggerError::ImmutableState { ref trigger_id } if trigger_id == "trg-1");
        assert_eq!(
            err.to_string(),
            "trigger trg-1 is frozen and cannot be modified"
        );
    }

    #[test]
    fn freeze_moves_draft_contents_into_sealed_trigger() {
        let mut def = content_definition();
        def.edit(|draft| {
            let content = draft
                .as_content_changed_mut()
                .ok_or_else(|| TriggerError::validation("not a content trigger"))?;
            let _ = content.add_schema(SchemaFilter::new("blog", Some("views > 10"))?)?;
            let _ = content.add_schema(SchemaFilter::unconditional("news")?)?;
            Ok(())
        })
        .unwrap();
        assert!(def.freeze());
        assert_eq!(def.name(), "ContentChanged");
        assert_matches!(
            def.trigger(),
            Some(RuleTrigger::ContentChanged(t)) if t.schemas().len() == 2 && !t.handle_all()
        );
    }

    #[test]
    fn freeze_is_idempotent() {
        let mut def = content_definition();
        assert!(def.freeze());
        let first = def.trigger().cloned();
        assert!(!def.freeze());
        assert_eq!(def.trigger().cloned(), first);
        assert!(first.is_some());
        assert!(def.is_frozen());
        assert!(def.draft().is_none());
    }

    #[test]
    fn sealed_definition_rejects_edits() {
        let trigger = UsageTriggerDraft::new(10).unwrap().freeze();
        let mut def = TriggerDefinition::sealed("trg-2", trigger.into());
        assert!(def.is_frozen());
        assert_eq!(def.name(), "Usage");
        assert_matches!(
            def.edit(|_| Ok(())),
            Err(TriggerError::ImmutableState { .. })
        );
    }

    #[test]
    fn publish_freezes() {
        let def = TriggerDefinition::new(UsageTriggerDraft::new(10).unwrap());
        assert!(!def.id().is_blank());
        assert_matches!(def.publish(), RuleTrigger::Usage(u) if u.num_calls() == 10);
    }
}
