//! Double dispatch over the trigger taxonomy.
//!
//! The rule engine implements [`RuleTriggerVisitor`] once per concern
//! (matching, describing, exporting). Every method is required, so adding a
//! trigger variant breaks the build of every visitor until it handles the new
//! kind.

use crate::triggers::{AssetChangedTriggerV2, ContentChangedTriggerV2, ManualTrigger, UsageTrigger};

/// Handles each concrete trigger variant.
pub trait RuleTriggerVisitor {
    /// Result produced for every variant.
    type Output;

    /// Handle a [`ContentChangedTriggerV2`].
    fn visit_content_changed(&mut self, trigger: &ContentChangedTriggerV2) -> Self::Output;

    /// Handle an [`AssetChangedTriggerV2`].
    fn visit_asset_changed(&mut self, trigger: &AssetChangedTriggerV2) -> Self::Output;

    /// Handle a [`UsageTrigger`].
    fn visit_usage(&mut self, trigger: &UsageTrigger) -> Self::Output;

    /// Handle a [`ManualTrigger`].
    fn visit_manual(&mut self, trigger: &ManualTrigger) -> Self::Output;
}

/// Dispatches to the visitor method matching the concrete trigger type.
pub trait Accept {
    /// Invoke exactly one visitor method, exactly once.
    fn accept<V: RuleTriggerVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
