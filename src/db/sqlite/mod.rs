//! SQLite implementation of the database traits.
//!
//! This module provides a SQLite-backed implementation of the repository
//! traits defined in the parent module.

mod connection;
mod helpers;
mod prompt_sync;
mod theme;
mod use_case;

#[cfg(test)]
mod prompt_sync_test;

pub use connection::SqliteDatabase;
pub use prompt_sync::SqlitePromptSyncRepository;
pub use theme::SqliteThemeRepository;
pub use use_case::SqliteUseCaseRepository;
