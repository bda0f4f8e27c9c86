//! Application state for the API server.

use std::sync::Arc;

use crate::db::Database;
use crate::prompts::{PromptSyncEngine, SyncConfig};

/// Shared application state.
///
/// Generic over `D: Database` so handlers never name the storage backend.
/// The sync engine shares the same database handle.
pub struct AppState<D: Database> {
    db: Arc<D>,
    engine: Arc<PromptSyncEngine<D>>,
}

// Manual Clone impl - only the Arcs need to be cloneable, not D
impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<D: Database> AppState<D> {
    pub fn new(db: D, sync: SyncConfig) -> Self {
        let db = Arc::new(db);
        let engine = Arc::new(PromptSyncEngine::new(Arc::clone(&db), sync));
        Self { db, engine }
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &D {
        &self.db
    }

    /// Get a reference to the prompt sync engine.
    pub fn engine(&self) -> &PromptSyncEngine<D> {
        &self.engine
    }
}
