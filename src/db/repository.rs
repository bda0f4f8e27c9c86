//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.
//! Futures are declared `Send` so generic axum handlers can await them.

use std::future::Future;

use crate::db::{
    DbResult,
    models::{
        PrebuiltPrompt, Stored, SyncPlan, SyncSummary, Theme, ThemeInput, ThemeKey, UseCase,
        UseCaseInput, UseCaseKey,
    },
};

/// Repository for Theme operations.
pub trait ThemeRepository {
    /// Get an alive theme by uuid.
    fn get(&self, uuid: &str) -> impl Future<Output = DbResult<Theme>> + Send;

    /// Get an alive theme by its (title, subtitle) identity.
    fn find_by_identity(
        &self,
        key: &ThemeKey,
    ) -> impl Future<Output = DbResult<Option<Theme>>> + Send;

    /// Look up by identity including soft-deleted rows.
    fn lookup(&self, key: &ThemeKey) -> impl Future<Output = DbResult<Option<Stored<Theme>>>> + Send;

    /// All alive themes in display order.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Theme>>> + Send;

    /// Create a theme, or revive and update the soft-deleted one with the same identity.
    fn create_or_revive(&self, input: &ThemeInput) -> impl Future<Output = DbResult<Theme>> + Send;

    /// Replace the attributes of an alive theme.
    fn update(
        &self,
        uuid: &str,
        input: &ThemeInput,
    ) -> impl Future<Output = DbResult<Theme>> + Send;

    /// Soft-delete an alive theme.
    fn soft_delete(&self, uuid: &str) -> impl Future<Output = DbResult<()>> + Send;
}

/// Repository for UseCase operations.
pub trait UseCaseRepository {
    /// Get an alive use-case by uuid.
    fn get(&self, uuid: &str) -> impl Future<Output = DbResult<UseCase>> + Send;

    /// Get an alive use-case by its identity within an alive theme.
    fn find_by_identity(
        &self,
        theme_uuid: &str,
        key: &UseCaseKey,
    ) -> impl Future<Output = DbResult<Option<UseCase>>> + Send;

    /// Alive use-cases of an alive theme, in display order.
    fn list_by_theme(&self, theme_uuid: &str) -> impl Future<Output = DbResult<Vec<UseCase>>> + Send;

    /// An alive theme together with its alive use-cases, read from one snapshot.
    fn list_with_theme(
        &self,
        theme_uuid: &str,
    ) -> impl Future<Output = DbResult<(Theme, Vec<UseCase>)>> + Send;

    /// Create a use-case under a theme, or revive the soft-deleted one with the same identity.
    fn create_or_revive(
        &self,
        theme_uuid: &str,
        input: &UseCaseInput,
    ) -> impl Future<Output = DbResult<UseCase>> + Send;

    /// Replace the attributes of an alive use-case, optionally moving it to another theme.
    fn update(
        &self,
        uuid: &str,
        theme_uuid: &str,
        input: &UseCaseInput,
    ) -> impl Future<Output = DbResult<UseCase>> + Send;

    /// Soft-delete an alive use-case.
    fn soft_delete(&self, uuid: &str) -> impl Future<Output = DbResult<()>> + Send;
}

/// Whole-catalogue operations backing bulk upload and download.
pub trait PromptSyncRepository {
    /// Apply a plan atomically: upsert every planned theme and use-case, then
    /// soft-delete everything alive that the plan does not name.
    fn reconcile(&self, plan: &SyncPlan) -> impl Future<Output = DbResult<SyncSummary>> + Send;

    /// The alive catalogue flattened into ordered prompt rows, read from one snapshot.
    fn export(&self) -> impl Future<Output = DbResult<Vec<PrebuiltPrompt>>> + Send;
}

/// Combined database interface.
pub trait Database: Send + Sync + 'static {
    type Themes<'a>: ThemeRepository + Send + Sync
    where
        Self: 'a;
    type UseCases<'a>: UseCaseRepository + Send + Sync
    where
        Self: 'a;
    type Prompts<'a>: PromptSyncRepository + Send + Sync
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the theme repository.
    fn themes(&self) -> Self::Themes<'_>;

    /// Get the use-case repository.
    fn use_cases(&self) -> Self::UseCases<'_>;

    /// Get the bulk sync repository.
    fn prompts(&self) -> Self::Prompts<'_>;
}
