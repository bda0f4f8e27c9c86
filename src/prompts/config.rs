//! Sync engine configuration.

use std::time::Duration;

use clap::ValueEnum;

/// How to treat two rows in one submission that share an identity key but
/// disagree on position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DuplicatePolicy {
    /// The last occurrence's attributes win; the first occurrence keeps its slot.
    #[default]
    LastWins,
    /// Reject the whole submission before anything is written.
    Reject,
}

/// Settings passed to [`PromptSyncEngine::new`](super::PromptSyncEngine::new).
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Upper bound on one reconcile, including the wait for a concurrent one.
    pub reconcile_timeout: Duration,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reconcile_timeout: Duration::from_secs(30),
            duplicate_policy: DuplicatePolicy::LastWins,
        }
    }
}
