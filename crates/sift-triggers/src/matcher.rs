//! Event matching as a trigger visitor.

use sift_core::RuleEvent;
use tracing::trace;

use crate::triggers::{
    AssetChangedTriggerV2, ContentChangedTriggerV2, ManualTrigger, RuleTrigger, UsageTrigger,
};
use crate::visitor::{Accept, RuleTriggerVisitor};

/// Visitor answering "does this trigger fire for this event?".
///
/// A trigger only ever matches events of its own family.
#[derive(Debug, Clone, Copy)]
pub struct EventMatcher<'a> {
    event: &'a RuleEvent,
}

impl<'a> EventMatcher<'a> {
    /// Matcher for one event.
    #[must_use]
    pub fn new(event: &'a RuleEvent) -> Self {
        Self { event }
    }
}

impl RuleTriggerVisitor for EventMatcher<'_> {
    type Output = bool;

    fn visit_content_changed(&mut self, trigger: &ContentChangedTriggerV2) -> bool {
        match self.event {
            RuleEvent::Content(event) => trigger.matches(event),
            _ => false,
        }
    }

    fn visit_asset_changed(&mut self, trigger: &AssetChangedTriggerV2) -> bool {
        match self.event {
            RuleEvent::Asset(event) => trigger.matches(event),
            _ => false,
        }
    }

    fn visit_usage(&mut self, trigger: &UsageTrigger) -> bool {
        match self.event {
            RuleEvent::Usage(event) => trigger.matches(event),
            _ => false,
        }
    }

    fn visit_manual(&mut self, _trigger: &ManualTrigger) -> bool {
        matches!(self.event, RuleEvent::Manual(_))
    }
}

/// Whether `trigger` fires for `event`.
#[must_use]
pub fn matches(trigger: &RuleTrigger, event: &RuleEvent) -> bool {
    let matched = trigger.accept(&mut EventMatcher::new(event));
    trace!(
        trigger = trigger.name(),
        event = event.family(),
        matched,
        "evaluated trigger"
    );
    matched
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
