//! Usage trigger: fires when API usage crosses a threshold.

use sift_core::UsageEvent;
use tracing::debug;

use crate::errors::{Result, TriggerError};
use crate::freeze::{Freeze, sealed};
use crate::visitor::{Accept, RuleTriggerVisitor};

/// Sealed usage trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageTrigger {
    num_calls: u64,
    num_days: Option<u32>,
}

impl UsageTrigger {
    /// Trigger kind name shown to rule authors.
    pub const NAME: &'static str = "Usage";

    /// Call count threshold.
    #[must_use]
    pub fn num_calls(&self) -> u64 {
        self.num_calls
    }

    /// Widest reporting window in days, if limited.
    #[must_use]
    pub fn num_days(&self) -> Option<u32> {
        self.num_days
    }

    /// Whether a usage report fires this trigger.
    ///
    /// The report must reach the call threshold and, when the trigger is
    /// limited to a window, cover no more days than that window.
    #[must_use]
    pub fn matches(&self, event: &UsageEvent) -> bool {
        let in_window = self.num_days.is_none_or(|days| event.num_days <= days);
        in_window && event.call_count >= self.num_calls
    }

    /// Start a new draft seeded with this trigger's values.
    #[must_use]
    pub fn to_draft(&self) -> UsageTriggerDraft {
        UsageTriggerDraft {
            num_calls: self.num_calls,
            num_days: self.num_days,
        }
    }
}

sealed!(UsageTrigger);

impl Accept for UsageTrigger {
    fn accept<V: RuleTriggerVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_usage(self)
    }
}

/// Mutable usage trigger under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageTriggerDraft {
    num_calls: u64,
    num_days: Option<u32>,
}

impl UsageTriggerDraft {
    /// Draft with the given call threshold and no day window.
    pub fn new(num_calls: u64) -> Result<Self> {
        let mut draft = Self {
            num_calls: 1,
            num_days: None,
        };
        let _ = draft.set_num_calls(num_calls)?;
        Ok(draft)
    }

    /// Current call threshold.
    #[must_use]
    pub fn num_calls(&self) -> u64 {
        self.num_calls
    }

    /// Current day window.
    #[must_use]
    pub fn num_days(&self) -> Option<u32> {
        self.num_days
    }

    /// Set the call threshold. Must be positive.
    pub fn set_num_calls(&mut self, num_calls: u64) -> Result<&mut Self> {
        if num_calls == 0 {
            return Err(TriggerError::validation("num_calls must be positive"));
        }
        self.num_calls = num_calls;
        Ok(self)
    }

    /// Set or clear the day window. A window must be positive.
    pub fn set_num_days(&mut self, num_days: Option<u32>) -> Result<&mut Self> {
        if num_days == Some(0) {
            return Err(TriggerError::validation("num_days must be positive"));
        }
        self.num_days = num_days;
        Ok(self)
    }
}

impl Freeze for UsageTriggerDraft {
    type Frozen = UsageTrigger;

    fn freeze(self) -> UsageTrigger {
        debug!(
            num_calls = self.num_calls,
            num_days = ?self.num_days,
            "freezing usage trigger"
        );
        UsageTrigger {
            num_calls: self.num_calls,
            num_days: self.num_days,
        }
    }

    fn is_frozen(&self) -> bool {
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
