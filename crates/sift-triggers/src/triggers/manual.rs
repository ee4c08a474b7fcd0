//! Manual trigger: fired explicitly by a user, never by events from the platform.

use crate::freeze::sealed;
use crate::visitor::{Accept, RuleTriggerVisitor};

/// Trigger fired on demand. It carries no state, so it is always sealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManualTrigger;

impl ManualTrigger {
    /// Trigger kind name shown to rule authors.
    pub const NAME: &'static str = "Manual";
}

sealed!(ManualTrigger);

impl Accept for ManualTrigger {
    fn accept<V: RuleTriggerVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_manual(self)
    }
}
