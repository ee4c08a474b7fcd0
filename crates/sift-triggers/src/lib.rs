//! # sift-triggers
//!
//! Rule triggers: the part of a rule that decides whether an event should
//! fire it.
//!
//! - **Variants**: [`ContentChangedTriggerV2`], [`AssetChangedTriggerV2`],
//!   [`UsageTrigger`], [`ManualTrigger`], unified as [`RuleTrigger`]
//! - **Schema filters**: per-schema scoping with an optional [`Condition`]
//! - **Freezing**: drafts seal into immutable, `Send + Sync` triggers via
//!   [`Freeze`]; [`TriggerDefinition`] tracks the lifecycle at run time
//! - **Dispatch**: [`RuleTriggerVisitor`] with [`EventMatcher`] and
//!   [`TriggerSummary`] as built-in visitors
//! - **Migration**: legacy [`ContentChangedTriggerV1`] values upgrade to V2
//!   drafts; [`TriggerDocument`] is the serialized form

#![deny(unsafe_code)]

pub mod condition;
pub mod document;
pub mod errors;
pub mod freeze;
pub mod lifecycle;
pub mod matcher;
pub mod migration;
pub mod schema_filter;
pub mod summary;
pub mod triggers;
pub mod visitor;

pub use condition::{Condition, ConditionError};
pub use document::{SchemaFilterDocument, TriggerDocument};
pub use errors::{Result, TriggerError};
pub use freeze::Freeze;
pub use lifecycle::TriggerDefinition;
pub use matcher::{EventMatcher, matches};
pub use migration::{ContentChangedTriggerV1, migrate, migrate_with};
pub use schema_filter::SchemaFilter;
pub use summary::TriggerSummary;
pub use triggers::{
    AssetChangedTriggerV2, AssetChangedTriggerV2Draft, ContentChangedTriggerV2,
    ContentChangedTriggerV2Draft, ManualTrigger, RuleTrigger, RuleTriggerDraft, UsageTrigger,
    UsageTriggerDraft,
};
pub use visitor::{Accept, RuleTriggerVisitor};
