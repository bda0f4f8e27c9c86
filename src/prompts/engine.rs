//! The bulk prompt sync engine.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::config::SyncConfig;
use super::error::{SyncError, SyncResult};
use super::plan::build_plan;
use crate::db::{
    Database, PrebuiltPrompt, PromptSyncRepository, SyncSummary, Theme, ThemeKey,
    ThemeRepository, UseCase, UseCaseKey, UseCaseRepository,
};

/// Reconciles bulk submissions against the catalogue and serves ordered reads.
///
/// Reconciles are serialized through an async mutex so each one sees a
/// consistent "before" state for its deletion sweep. Reads do not take the
/// lock; the database transaction keeps them from seeing partial state.
pub struct PromptSyncEngine<D: Database> {
    db: Arc<D>,
    config: SyncConfig,
    writer: Mutex<()>,
}

impl<D: Database> PromptSyncEngine<D> {
    pub fn new(db: Arc<D>, config: SyncConfig) -> Self {
        Self {
            db,
            config,
            writer: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Make the alive catalogue equal exactly the submitted rows.
    ///
    /// Validation and grouping happen before anything is written. The write
    /// runs in a single transaction bounded by the configured timeout, which
    /// also covers waiting for a reconcile already in progress. On timeout
    /// the transaction future is dropped and rolled back.
    #[instrument(skip(self, submitted), fields(rows = submitted.len()))]
    pub async fn reconcile(&self, submitted: &[PrebuiltPrompt]) -> SyncResult<SyncSummary> {
        let plan = build_plan(submitted, self.config.duplicate_policy)?;
        let timeout = self.config.reconcile_timeout;

        let apply = async {
            let _writer = self.writer.lock().await;
            self.db.prompts().reconcile(&plan).await
        };

        let summary = match tokio::time::timeout(timeout, apply).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(?timeout, "Reconcile timed out, rolled back");
                return Err(SyncError::Timeout { timeout });
            }
        };

        info!(
            themes = plan.themes.len(),
            use_cases = plan.use_case_count(),
            created = summary.themes.created + summary.use_cases.created,
            revived = summary.themes.revived + summary.use_cases.revived,
            deleted = summary.themes.deleted + summary.use_cases.deleted,
            "Reconciled prompt catalogue"
        );
        Ok(summary)
    }

    /// Alive themes in display order.
    pub async fn list_themes(&self) -> SyncResult<Vec<Theme>> {
        Ok(self.db.themes().list().await?)
    }

    /// Alive use-cases of an alive theme in display order.
    pub async fn list_use_cases(&self, theme_uuid: &str) -> SyncResult<Vec<UseCase>> {
        Ok(self.db.use_cases().list_by_theme(theme_uuid).await?)
    }

    /// An alive theme and its use-cases as they stood at one instant.
    pub async fn theme_with_use_cases(
        &self,
        theme_uuid: &str,
    ) -> SyncResult<(Theme, Vec<UseCase>)> {
        Ok(self.db.use_cases().list_with_theme(theme_uuid).await?)
    }

    pub async fn get_theme(&self, uuid: &str) -> SyncResult<Theme> {
        Ok(self.db.themes().get(uuid).await?)
    }

    pub async fn find_theme(&self, title: &str, subtitle: &str) -> SyncResult<Option<Theme>> {
        let key = ThemeKey {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
        };
        Ok(self.db.themes().find_by_identity(&key).await?)
    }

    pub async fn get_use_case(&self, uuid: &str) -> SyncResult<UseCase> {
        Ok(self.db.use_cases().get(uuid).await?)
    }

    pub async fn find_use_case(
        &self,
        theme_uuid: &str,
        key: &UseCaseKey,
    ) -> SyncResult<Option<UseCase>> {
        Ok(self.db.use_cases().find_by_identity(theme_uuid, key).await?)
    }

    /// The alive catalogue as ordered prompt rows, suitable for resubmission.
    #[instrument(skip(self))]
    pub async fn export(&self) -> SyncResult<Vec<PrebuiltPrompt>> {
        Ok(self.db.prompts().export().await?)
    }
}
