//! Trigger variants and the closed taxonomy over them.
//!
//! Each variant has a draft type with validating mutators and a sealed type
//! with read-only accessors. [`RuleTriggerDraft`] and [`RuleTrigger`] are the
//! type-erased forms stored on a rule.

mod asset_changed;
mod content_changed;
mod manual;
mod usage;

pub use asset_changed::{AssetChangedTriggerV2, AssetChangedTriggerV2Draft};
pub use content_changed::{ContentChangedTriggerV2, ContentChangedTriggerV2Draft};
pub use manual::ManualTrigger;
pub use usage::{UsageTrigger, UsageTriggerDraft};

use crate::freeze::{Freeze, sealed};
use crate::visitor::{Accept, RuleTriggerVisitor};

/// A sealed trigger of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTrigger {
    /// Fires on content changes.
    ContentChanged(ContentChangedTriggerV2),
    /// Fires on asset changes.
    AssetChanged(AssetChangedTriggerV2),
    /// Fires on usage thresholds.
    Usage(UsageTrigger),
    /// Fires on demand.
    Manual(ManualTrigger),
}

impl RuleTrigger {
    /// Kind name of the wrapped variant.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContentChanged(_) => ContentChangedTriggerV2::NAME,
            Self::AssetChanged(_) => AssetChangedTriggerV2::NAME,
            Self::Usage(_) => UsageTrigger::NAME,
            Self::Manual(_) => ManualTrigger::NAME,
        }
    }
}

impl Accept for RuleTrigger {
    fn accept<V: RuleTriggerVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::ContentChanged(t) => t.accept(visitor),
            Self::AssetChanged(t) => t.accept(visitor),
            Self::Usage(t) => t.accept(visitor),
            Self::Manual(t) => t.accept(visitor),
        }
    }
}

sealed!(RuleTrigger);

impl From<ContentChangedTriggerV2> for RuleTrigger {
    fn from(t: ContentChangedTriggerV2) -> Self {
        Self::ContentChanged(t)
    }
}

impl From<AssetChangedTriggerV2> for RuleTrigger {
    fn from(t: AssetChangedTriggerV2) -> Self {
        Self::AssetChanged(t)
    }
}

impl From<UsageTrigger> for RuleTrigger {
    fn from(t: UsageTrigger) -> Self {
        Self::Usage(t)
    }
}

impl From<ManualTrigger> for RuleTrigger {
    fn from(t: ManualTrigger) -> Self {
        Self::Manual(t)
    }
}

/// A trigger of any kind still under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTriggerDraft {
    /// Content-changed draft.
    ContentChanged(ContentChangedTriggerV2Draft),
    /// Asset-changed draft.
    AssetChanged(AssetChangedTriggerV2Draft),
    /// Usage draft.
    Usage(UsageTriggerDraft),
    /// Manual triggers have nothing to edit.
    Manual,
}

impl RuleTriggerDraft {
    /// Kind name of the wrapped variant.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContentChanged(_) => ContentChangedTriggerV2::NAME,
            Self::AssetChanged(_) => AssetChangedTriggerV2::NAME,
            Self::Usage(_) => UsageTrigger::NAME,
            Self::Manual => ManualTrigger::NAME,
        }
    }

    /// Mutable access to a content-changed draft.
    pub fn as_content_changed_mut(&mut self) -> Option<&mut ContentChangedTriggerV2Draft> {
        match self {
            Self::ContentChanged(d) => Some(d),
            _ => None,
        }
    }

    /// Mutable access to an asset-changed draft.
    pub fn as_asset_changed_mut(&mut self) -> Option<&mut AssetChangedTriggerV2Draft> {
        match self {
            Self::AssetChanged(d) => Some(d),
            _ => None,
        }
    }

    /// Mutable access to a usage draft.
    pub fn as_usage_mut(&mut self) -> Option<&mut UsageTriggerDraft> {
        match self {
            Self::Usage(d) => Some(d),
            _ => None,
        }
    }
}

impl Freeze for RuleTriggerDraft {
    type Frozen = RuleTrigger;

    fn freeze(self) -> RuleTrigger {
        match self {
            Self::ContentChanged(d) => RuleTrigger::ContentChanged(d.freeze()),
            Self::AssetChanged(d) => RuleTrigger::AssetChanged(d.freeze()),
            Self::Usage(d) => RuleTrigger::Usage(d.freeze()),
            Self::Manual => RuleTrigger::Manual(ManualTrigger),
        }
    }

    fn is_frozen(&self) -> bool {
        false
    }
}

impl From<ContentChangedTriggerV2Draft> for RuleTriggerDraft {
    fn from(d: ContentChangedTriggerV2Draft) -> Self {
        Self::ContentChanged(d)
    }
}

impl From<AssetChangedTriggerV2Draft> for RuleTriggerDraft {
    fn from(d: AssetChangedTriggerV2Draft) -> Self {
        Self::AssetChanged(d)
    }
}

impl From<UsageTriggerDraft> for RuleTriggerDraft {
    fn from(d: UsageTriggerDraft) -> Self {
        Self::Usage(d)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
