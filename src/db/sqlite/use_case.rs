//! SQLite UseCaseRepository implementation.
//!
//! A use-case is only visible while both it and its parent theme are alive.
//! Reads that check the theme and then fetch use-cases run inside one read
//! transaction, so a concurrent reconcile is seen entirely or not at all.

use sqlx::{SqliteConnection, SqlitePool};

use super::helpers::{
    THEME_COLUMNS, USE_CASE_COLUMNS, begin_write, display_order, lookup_use_case,
    next_use_case_sequence, theme_from_row, upsert_use_case, use_case_from_row,
    validate_use_case_input,
};
use crate::db::utils::current_timestamp;
use crate::db::{
    DbError, DbResult, Stored, Theme, UseCase, UseCaseInput, UseCaseKey, UseCaseRepository,
};

/// SQLx-backed use-case repository.
pub struct SqliteUseCaseRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

/// Row id of an alive theme.
async fn alive_theme_id(conn: &mut SqliteConnection, theme_uuid: &str) -> DbResult<i64> {
    sqlx::query_scalar("SELECT id FROM theme WHERE uuid = ? AND deleted_at IS NULL")
        .bind(theme_uuid)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("Theme", theme_uuid))
}

async fn get_alive(conn: &mut SqliteConnection, uuid: &str) -> DbResult<UseCase> {
    let sql = format!(
        "SELECT {USE_CASE_COLUMNS} FROM use_case u JOIN theme t ON t.id = u.theme_id \
         WHERE u.uuid = ? AND t.deleted_at IS NULL"
    );
    let row = sqlx::query(&sql)
        .bind(uuid)
        .fetch_optional(&mut *conn)
        .await?;

    row.and_then(|r| use_case_from_row(&r).stored.into_alive())
        .ok_or_else(|| DbError::not_found("UseCase", uuid))
}

/// An alive theme and its alive use-cases in display order.
///
/// Both statements must run on the same read transaction.
async fn theme_with_use_cases(
    conn: &mut SqliteConnection,
    theme_uuid: &str,
) -> DbResult<(Theme, Vec<UseCase>)> {
    let sql = format!("SELECT {THEME_COLUMNS} FROM theme WHERE uuid = ? AND deleted_at IS NULL");
    let theme = sqlx::query(&sql)
        .bind(theme_uuid)
        .fetch_optional(&mut *conn)
        .await?
        .map(|row| theme_from_row(&row))
        .ok_or_else(|| DbError::not_found("Theme", theme_uuid))?;
    let theme_id = theme.id;
    let theme = theme
        .stored
        .into_alive()
        .ok_or_else(|| DbError::not_found("Theme", theme_uuid))?;

    let sql = format!(
        "SELECT {USE_CASE_COLUMNS} FROM use_case u JOIN theme t ON t.id = u.theme_id \
         WHERE u.theme_id = ? AND u.deleted_at IS NULL ORDER BY {}",
        display_order("u.")
    );
    let rows = sqlx::query(&sql)
        .bind(theme_id)
        .fetch_all(&mut *conn)
        .await?;

    let use_cases = rows
        .iter()
        .filter_map(|row| use_case_from_row(row).stored.into_alive())
        .collect();
    Ok((theme, use_cases))
}

impl<'a> UseCaseRepository for SqliteUseCaseRepository<'a> {
    async fn get(&self, uuid: &str) -> DbResult<UseCase> {
        let mut conn = self.pool.acquire().await?;
        get_alive(&mut conn, uuid).await
    }

    async fn find_by_identity(
        &self,
        theme_uuid: &str,
        key: &UseCaseKey,
    ) -> DbResult<Option<UseCase>> {
        let mut tx = self.pool.begin().await?;
        let theme_id = match alive_theme_id(&mut tx, theme_uuid).await {
            Ok(id) => id,
            Err(DbError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        let found = lookup_use_case(&mut tx, theme_id, key)
            .await?
            .and_then(|e| e.stored.into_alive());
        tx.commit().await?;

        Ok(found)
    }

    async fn list_by_theme(&self, theme_uuid: &str) -> DbResult<Vec<UseCase>> {
        Ok(self.list_with_theme(theme_uuid).await?.1)
    }

    async fn list_with_theme(&self, theme_uuid: &str) -> DbResult<(Theme, Vec<UseCase>)> {
        let mut tx = self.pool.begin().await?;
        let listed = theme_with_use_cases(&mut tx, theme_uuid).await?;
        tx.commit().await?;

        Ok(listed)
    }

    async fn create_or_revive(&self, theme_uuid: &str, input: &UseCaseInput) -> DbResult<UseCase> {
        validate_use_case_input(input)?;
        let key = UseCaseKey {
            title: input.title.clone(),
            instruction: input.instruction.clone(),
            user_input_form: input.user_input_form.clone(),
        };
        let now = current_timestamp();

        let mut tx = begin_write(self.pool).await?;
        let theme_id = alive_theme_id(&mut tx, theme_uuid).await?;
        upsert_use_case(&mut tx, theme_id, &key, input.position, None, &now).await?;
        let use_case = lookup_use_case(&mut tx, theme_id, &key)
            .await?
            .and_then(|e| e.stored.into_alive())
            .ok_or_else(|| DbError::Database {
                message: format!("Use case {} vanished after upsert", key),
            })?;
        tx.commit().await?;

        Ok(use_case)
    }

    async fn update(&self, uuid: &str, theme_uuid: &str, input: &UseCaseInput) -> DbResult<UseCase> {
        validate_use_case_input(input)?;
        let mut tx = begin_write(self.pool).await?;

        let current: Option<(i64, i64)> = sqlx::query_as(
            "SELECT theme_id, sequence FROM use_case WHERE uuid = ? AND deleted_at IS NULL",
        )
        .bind(uuid)
        .fetch_optional(&mut *tx)
        .await?;
        let (current_theme_id, current_sequence) =
            current.ok_or_else(|| DbError::not_found("UseCase", uuid))?;

        let theme_id = alive_theme_id(&mut tx, theme_uuid).await?;
        // Moving to another theme appends to the end of that theme's order.
        let sequence = if theme_id == current_theme_id {
            current_sequence
        } else {
            next_use_case_sequence(&mut tx, theme_id).await?
        };

        sqlx::query(
            "UPDATE use_case SET theme_id = ?, title = ?, instruction = ?, user_input_form = ?, \
             position = ?, sequence = ?, updated_at = ? WHERE uuid = ?",
        )
        .bind(theme_id)
        .bind(&input.title)
        .bind(&input.instruction)
        .bind(&input.user_input_form)
        .bind(input.position)
        .bind(sequence)
        .bind(current_timestamp())
        .bind(uuid)
        .execute(&mut *tx)
        .await?;

        let updated = get_alive(&mut tx, uuid).await?;
        tx.commit().await?;

        Ok(updated)
    }

    async fn soft_delete(&self, uuid: &str) -> DbResult<()> {
        let now = current_timestamp();
        let result = sqlx::query(
            "UPDATE use_case SET deleted_at = ?, updated_at = ? WHERE uuid = ? AND deleted_at IS NULL",
        )
        .bind(&now)
        .bind(&now)
        .bind(uuid)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("UseCase", uuid));
        }

        Ok(())
    }
}

impl<'a> SqliteUseCaseRepository<'a> {
    /// Soft-delete state of a use-case regardless of its theme, for diagnostics and tests.
    pub async fn stored(&self, uuid: &str) -> DbResult<Option<Stored<UseCase>>> {
        let sql = format!(
            "SELECT {USE_CASE_COLUMNS} FROM use_case u JOIN theme t ON t.id = u.theme_id WHERE u.uuid = ?"
        );
        let row = sqlx::query(&sql)
            .bind(uuid)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.as_ref().map(|r| use_case_from_row(r).stored))
    }
}
