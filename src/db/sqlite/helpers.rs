//! Shared helper functions for SQLite repositories.
//!
//! The upsert helpers take a bare connection so the same create/revive/update
//! logic runs inside a single-entity transaction and inside the bulk
//! reconcile transaction.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::db::utils::generate_entity_id;
use crate::db::{DbError, DbResult, Stored, Theme, ThemeInput, ThemeKey, UseCase, UseCaseInput, UseCaseKey};

/// Display order shared by themes and use-cases: positioned rows ascending,
/// then unpositioned rows, both tie-broken by arrival order.
///
/// `alias` qualifies the columns when the table is joined (`"u."`), or is empty.
pub fn display_order(alias: &str) -> String {
    format!("{alias}position IS NULL, {alias}position, {alias}sequence, {alias}id")
}

/// Open a transaction that holds the write lock from its first statement.
///
/// Writers here read before they write. A deferred transaction that has
/// already read cannot wait for the lock once another connection commits;
/// SQLite fails it with SQLITE_BUSY_SNAPSHOT instead. `BEGIN IMMEDIATE`
/// waits on the busy timeout like any other writer.
pub async fn begin_write(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

pub const THEME_COLUMNS: &str =
    "id, uuid, title, subtitle, position, sequence, created_at, updated_at, deleted_at";

/// Use-case columns, joined with the owning theme as `t`.
pub const USE_CASE_COLUMNS: &str = "u.id, u.uuid, t.uuid AS theme_uuid, u.title, u.instruction, \
     u.user_input_form, u.position, u.sequence, u.created_at, u.updated_at, u.deleted_at";

fn require_text(field: &str, value: &str) -> DbResult<()> {
    if value.trim().is_empty() {
        return Err(DbError::Validation {
            message: format!("{field} must not be blank"),
        });
    }
    Ok(())
}

pub fn validate_theme_input(input: &ThemeInput) -> DbResult<()> {
    require_text("title", &input.title)?;
    require_text("subtitle", &input.subtitle)
}

pub fn validate_use_case_input(input: &UseCaseInput) -> DbResult<()> {
    require_text("title", &input.title)?;
    require_text("instruction", &input.instruction)
}

/// A row found by identity, with the bookkeeping columns the upsert needs.
pub struct Existing<T> {
    pub id: i64,
    pub sequence: i64,
    pub stored: Stored<T>,
}

/// What an upsert did to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Revived,
    Updated,
    Unchanged,
}

pub fn theme_from_row(row: &SqliteRow) -> Existing<Theme> {
    let theme = Theme {
        uuid: row.get("uuid"),
        title: row.get("title"),
        subtitle: row.get("subtitle"),
        position: row.get("position"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    };
    Existing {
        id: row.get("id"),
        sequence: row.get("sequence"),
        stored: Stored::from_row(theme, row.get("deleted_at")),
    }
}

pub fn use_case_from_row(row: &SqliteRow) -> Existing<UseCase> {
    let use_case = UseCase {
        uuid: row.get("uuid"),
        theme_uuid: row.get("theme_uuid"),
        title: row.get("title"),
        instruction: row.get("instruction"),
        user_input_form: row.get("user_input_form"),
        position: row.get("position"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    };
    Existing {
        id: row.get("id"),
        sequence: row.get("sequence"),
        stored: Stored::from_row(use_case, row.get("deleted_at")),
    }
}

/// Find a theme by identity, soft-deleted rows included.
pub async fn lookup_theme(
    conn: &mut SqliteConnection,
    key: &ThemeKey,
) -> DbResult<Option<Existing<Theme>>> {
    let sql = format!("SELECT {THEME_COLUMNS} FROM theme WHERE title = ? AND subtitle = ?");
    let row = sqlx::query(&sql)
        .bind(&key.title)
        .bind(&key.subtitle)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.as_ref().map(theme_from_row))
}

/// Find a use-case by identity within a theme, soft-deleted rows included.
pub async fn lookup_use_case(
    conn: &mut SqliteConnection,
    theme_id: i64,
    key: &UseCaseKey,
) -> DbResult<Option<Existing<UseCase>>> {
    let sql = format!(
        "SELECT {USE_CASE_COLUMNS} FROM use_case u JOIN theme t ON t.id = u.theme_id \
         WHERE u.theme_id = ? AND u.title = ? AND u.instruction = ? AND u.user_input_form = ?"
    );
    let row = sqlx::query(&sql)
        .bind(theme_id)
        .bind(&key.title)
        .bind(&key.instruction)
        .bind(&key.user_input_form)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.as_ref().map(use_case_from_row))
}

async fn next_theme_sequence(conn: &mut SqliteConnection) -> DbResult<i64> {
    let next: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(sequence), -1) + 1 FROM theme")
        .fetch_one(&mut *conn)
        .await?;
    Ok(next)
}

pub async fn next_use_case_sequence(conn: &mut SqliteConnection, theme_id: i64) -> DbResult<i64> {
    let next: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(sequence), -1) + 1 FROM use_case WHERE theme_id = ?")
            .bind(theme_id)
            .fetch_one(&mut *conn)
            .await?;
    Ok(next)
}

/// Create, revive or update the theme with this identity.
///
/// `sequence` is the arrival order to record. `None` appends after every
/// existing theme for new or revived rows and keeps the stored value for
/// alive rows. Returns the row id and what happened.
pub async fn upsert_theme(
    conn: &mut SqliteConnection,
    key: &ThemeKey,
    position: Option<i64>,
    sequence: Option<i64>,
    now: &str,
) -> DbResult<(i64, Upsert)> {
    match lookup_theme(conn, key).await? {
        None => {
            let sequence = match sequence {
                Some(s) => s,
                None => next_theme_sequence(conn).await?,
            };
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO theme (uuid, title, subtitle, position, sequence, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
            )
            .bind(generate_entity_id())
            .bind(&key.title)
            .bind(&key.subtitle)
            .bind(position)
            .bind(sequence)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *conn)
            .await?;
            Ok((id, Upsert::Created))
        }
        Some(Existing {
            id,
            stored: Stored::Deleted { .. },
            ..
        }) => {
            let sequence = match sequence {
                Some(s) => s,
                None => next_theme_sequence(conn).await?,
            };
            sqlx::query(
                "UPDATE theme SET position = ?, sequence = ?, updated_at = ?, deleted_at = NULL WHERE id = ?",
            )
            .bind(position)
            .bind(sequence)
            .bind(now)
            .bind(id)
            .execute(&mut *conn)
            .await?;
            Ok((id, Upsert::Revived))
        }
        Some(Existing {
            id,
            sequence: current_sequence,
            stored: Stored::Alive(theme),
        }) => {
            let sequence = sequence.unwrap_or(current_sequence);
            if theme.position == position {
                // A pure reorder is not an attribute change.
                if sequence != current_sequence {
                    sqlx::query("UPDATE theme SET sequence = ? WHERE id = ?")
                        .bind(sequence)
                        .bind(id)
                        .execute(&mut *conn)
                        .await?;
                }
                return Ok((id, Upsert::Unchanged));
            }
            sqlx::query("UPDATE theme SET position = ?, sequence = ?, updated_at = ? WHERE id = ?")
                .bind(position)
                .bind(sequence)
                .bind(now)
                .bind(id)
                .execute(&mut *conn)
                .await?;
            Ok((id, Upsert::Updated))
        }
    }
}

/// Create, revive or update the use-case with this identity under `theme_id`.
///
/// Same `sequence` semantics as [`upsert_theme`], scoped to the theme.
pub async fn upsert_use_case(
    conn: &mut SqliteConnection,
    theme_id: i64,
    key: &UseCaseKey,
    position: Option<i64>,
    sequence: Option<i64>,
    now: &str,
) -> DbResult<(i64, Upsert)> {
    match lookup_use_case(conn, theme_id, key).await? {
        None => {
            let sequence = match sequence {
                Some(s) => s,
                None => next_use_case_sequence(conn, theme_id).await?,
            };
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO use_case (uuid, theme_id, title, instruction, user_input_form, position, sequence, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
            )
            .bind(generate_entity_id())
            .bind(theme_id)
            .bind(&key.title)
            .bind(&key.instruction)
            .bind(&key.user_input_form)
            .bind(position)
            .bind(sequence)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *conn)
            .await?;
            Ok((id, Upsert::Created))
        }
        Some(Existing {
            id,
            stored: Stored::Deleted { .. },
            ..
        }) => {
            let sequence = match sequence {
                Some(s) => s,
                None => next_use_case_sequence(conn, theme_id).await?,
            };
            sqlx::query(
                "UPDATE use_case SET position = ?, sequence = ?, updated_at = ?, deleted_at = NULL WHERE id = ?",
            )
            .bind(position)
            .bind(sequence)
            .bind(now)
            .bind(id)
            .execute(&mut *conn)
            .await?;
            Ok((id, Upsert::Revived))
        }
        Some(Existing {
            id,
            sequence: current_sequence,
            stored: Stored::Alive(use_case),
        }) => {
            let sequence = sequence.unwrap_or(current_sequence);
            if use_case.position == position {
                // A pure reorder is not an attribute change.
                if sequence != current_sequence {
                    sqlx::query("UPDATE use_case SET sequence = ? WHERE id = ?")
                        .bind(sequence)
                        .bind(id)
                        .execute(&mut *conn)
                        .await?;
                }
                return Ok((id, Upsert::Unchanged));
            }
            sqlx::query("UPDATE use_case SET position = ?, sequence = ?, updated_at = ? WHERE id = ?")
                .bind(position)
                .bind(sequence)
                .bind(now)
                .bind(id)
                .execute(&mut *conn)
                .await?;
            Ok((id, Upsert::Updated))
        }
    }
}
