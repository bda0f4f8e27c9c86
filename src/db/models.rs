//! Domain models for the prompt catalogue.
//!
//! These models are storage-agnostic and represent the core entities
//! used throughout the application.

use serde::{Deserialize, Serialize};

/// UUID string identifying a theme or use-case. Stable for the life of the row.
pub type Id = String;

// =============================================================================
// Entities
// =============================================================================

/// Top-level grouping of prompts, shown to users as a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub uuid: Id,
    pub title: String,
    pub subtitle: String,
    pub position: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl Theme {
    pub fn key(&self) -> ThemeKey {
        ThemeKey {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
        }
    }
}

/// A single prompt template nested under a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    pub uuid: Id,
    pub theme_uuid: Id,
    pub title: String,
    pub instruction: String,
    pub user_input_form: String,
    pub position: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl UseCase {
    pub fn key(&self) -> UseCaseKey {
        UseCaseKey {
            title: self.title.clone(),
            instruction: self.instruction.clone(),
            user_input_form: self.user_input_form.clone(),
        }
    }
}

// =============================================================================
// Identity keys
// =============================================================================

/// Natural identity of a theme. Exact match, case and whitespace sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThemeKey {
    pub title: String,
    pub subtitle: String,
}

impl std::fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.title, self.subtitle)
    }
}

/// Natural identity of a use-case within its parent theme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UseCaseKey {
    pub title: String,
    pub instruction: String,
    pub user_input_form: String,
}

impl std::fmt::Display for UseCaseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?}, {:?})", self.title, self.instruction, self.user_input_form)
    }
}

// =============================================================================
// Soft-delete lifecycle
// =============================================================================

/// A persisted record together with its soft-delete state.
///
/// Normal reads only ever surface `Alive`; the revival paths (single-entity
/// create and bulk reconcile) also see `Deleted` rows so they can bring them
/// back with their original uuid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stored<T> {
    Alive(T),
    Deleted { record: T, deleted_at: String },
}

impl<T> Stored<T> {
    /// Build from a row's nullable `deleted_at` column.
    pub fn from_row(record: T, deleted_at: Option<String>) -> Self {
        match deleted_at {
            None => Stored::Alive(record),
            Some(deleted_at) => Stored::Deleted { record, deleted_at },
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self, Stored::Alive(_))
    }

    pub fn record(&self) -> &T {
        match self {
            Stored::Alive(record) | Stored::Deleted { record, .. } => record,
        }
    }

    /// The record if it is visible to normal reads.
    pub fn into_alive(self) -> Option<T> {
        match self {
            Stored::Alive(record) => Some(record),
            Stored::Deleted { .. } => None,
        }
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Attributes for creating, reviving or updating a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeInput {
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub position: Option<i64>,
}

/// Attributes for creating, reviving or updating a use-case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseInput {
    pub title: String,
    pub instruction: String,
    pub user_input_form: String,
    #[serde(default)]
    pub position: Option<i64>,
}

/// Flattened (theme, use-case) pair used for bulk upload and download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrebuiltPrompt {
    pub theme_title: String,
    pub theme_subtitle: String,
    #[serde(default)]
    pub theme_position: Option<i64>,
    pub use_case_title: String,
    pub use_case_instruction: String,
    pub use_case_user_input_form: String,
    #[serde(default)]
    pub use_case_position: Option<i64>,
}

impl PrebuiltPrompt {
    pub fn theme_key(&self) -> ThemeKey {
        ThemeKey {
            title: self.theme_title.clone(),
            subtitle: self.theme_subtitle.clone(),
        }
    }

    pub fn use_case_key(&self) -> UseCaseKey {
        UseCaseKey {
            title: self.use_case_title.clone(),
            instruction: self.use_case_instruction.clone(),
            user_input_form: self.use_case_user_input_form.clone(),
        }
    }
}

// =============================================================================
// Reconcile plan and outcome
// =============================================================================

/// A validated, grouped bulk submission ready to be applied in one transaction.
///
/// Themes are in first-occurrence order and use-cases keep their row order
/// within each theme. Each identity key appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub themes: Vec<PlannedTheme>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTheme {
    pub key: ThemeKey,
    pub position: Option<i64>,
    /// Arrival order among the submitted themes.
    pub sequence: i64,
    pub use_cases: Vec<PlannedUseCase>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUseCase {
    pub key: UseCaseKey,
    pub position: Option<i64>,
    /// Arrival order among the use-cases of the same theme.
    pub sequence: i64,
}

impl SyncPlan {
    pub fn use_case_count(&self) -> usize {
        self.themes.iter().map(|t| t.use_cases.len()).sum()
    }
}

/// Per-entity counts for one reconcile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub created: usize,
    pub revived: usize,
    pub updated: usize,
    pub deleted: usize,
}

/// What a reconcile did to the catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub themes: EntityCounts,
    pub use_cases: EntityCounts,
}
