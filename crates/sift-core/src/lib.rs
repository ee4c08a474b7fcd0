//! # sift-core
//!
//! Foundation types shared by every sift crate.
//!
//! - **Branded IDs**: `SchemaId`, `AssetId`, `TriggerId`, `RuleId` as newtypes
//! - **Rule events**: `ContentEvent`, `AssetEvent`, `UsageEvent`, `ManualEvent`
//!   and the `RuleEvent` envelope that triggers are evaluated against
//! - **Logging**: `tracing` subscriber initialization

#![deny(unsafe_code)]

pub mod events;
pub mod ids;
pub mod logging;

pub use events::{
    AssetEvent, AssetEventKind, ContentEvent, ContentEventKind, ManualEvent, RuleEvent, UsageEvent,
};
pub use ids::{AssetId, RuleId, SchemaId, TriggerId};
