//! One-line human-readable trigger descriptions for logs and rule listings.

use crate::triggers::{AssetChangedTriggerV2, ContentChangedTriggerV2, ManualTrigger, UsageTrigger};
use crate::visitor::RuleTriggerVisitor;

/// Visitor describing a trigger in plain words.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerSummary;

impl RuleTriggerVisitor for TriggerSummary {
    type Output = String;

    fn visit_content_changed(&mut self, trigger: &ContentChangedTriggerV2) -> String {
        if trigger.handle_all() {
            return "content changed in all schemas".to_string();
        }
        if trigger.schemas().is_empty() {
            return "content changed in no schemas".to_string();
        }
        let mut names: Vec<&str> = Vec::with_capacity(trigger.schemas().len());
        for filter in trigger.schemas() {
            let name = filter.schema_id().as_str();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        let conditional = trigger
            .schemas()
            .iter()
            .filter(|f| f.condition().is_some())
            .count();
        let mut summary = format!("content changed in {}", names.join(", "));
        if conditional > 0 {
            summary.push_str(&format!(" ({conditional} conditional)"));
        }
        summary
    }

    fn visit_asset_changed(&mut self, trigger: &AssetChangedTriggerV2) -> String {
        match trigger.condition() {
            Some(condition) => format!("asset changed when {condition}"),
            None => "asset changed".to_string(),
        }
    }

    fn visit_usage(&mut self, trigger: &UsageTrigger) -> String {
        match trigger.num_days() {
            Some(1) => format!("at least {} calls in 1 day", trigger.num_calls()),
            Some(days) => format!("at least {} calls in {days} days", trigger.num_calls()),
            None => format!("at least {} calls", trigger.num_calls()),
        }
    }

    fn visit_manual(&mut self, _trigger: &ManualTrigger) -> String {
        "triggered manually".to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
