//! Bulk prompt synchronization.
//!
//! [`PromptSyncEngine`] makes the persisted catalogue match a submitted list
//! of [`PrebuiltPrompt`](crate::db::PrebuiltPrompt) rows exactly: rows are
//! validated and grouped into a [`SyncPlan`](crate::db::SyncPlan) up front,
//! then applied in one transaction that creates, revives or updates every
//! named theme and use-case and soft-deletes everything else.

mod config;
mod engine;
mod error;
mod plan;

#[cfg(test)]
mod plan_test;

pub use config::{DuplicatePolicy, SyncConfig};
pub use engine::PromptSyncEngine;
pub use error::{SyncError, SyncResult};
pub use plan::build_plan;
