//! SQLite ThemeRepository implementation.

use sqlx::SqlitePool;

use super::helpers::{
    THEME_COLUMNS, begin_write, display_order, lookup_theme, theme_from_row, upsert_theme,
    validate_theme_input,
};
use crate::db::utils::current_timestamp;
use crate::db::{DbError, DbResult, Stored, Theme, ThemeInput, ThemeKey, ThemeRepository};

/// SQLx-backed theme repository.
pub struct SqliteThemeRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> SqliteThemeRepository<'a> {
    async fn get_stored(&self, uuid: &str) -> DbResult<Option<Stored<Theme>>> {
        let sql = format!("SELECT {THEME_COLUMNS} FROM theme WHERE uuid = ?");
        let row = sqlx::query(&sql)
            .bind(uuid)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.as_ref().map(|r| theme_from_row(r).stored))
    }
}

impl<'a> ThemeRepository for SqliteThemeRepository<'a> {
    async fn get(&self, uuid: &str) -> DbResult<Theme> {
        self.get_stored(uuid)
            .await?
            .and_then(Stored::into_alive)
            .ok_or_else(|| DbError::not_found("Theme", uuid))
    }

    async fn find_by_identity(&self, key: &ThemeKey) -> DbResult<Option<Theme>> {
        Ok(self.lookup(key).await?.and_then(Stored::into_alive))
    }

    async fn lookup(&self, key: &ThemeKey) -> DbResult<Option<Stored<Theme>>> {
        let mut conn = self.pool.acquire().await?;
        Ok(lookup_theme(&mut conn, key).await?.map(|e| e.stored))
    }

    async fn list(&self) -> DbResult<Vec<Theme>> {
        let sql = format!(
            "SELECT {THEME_COLUMNS} FROM theme WHERE deleted_at IS NULL ORDER BY {}",
            display_order("")
        );
        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;

        Ok(rows
            .iter()
            .filter_map(|row| theme_from_row(row).stored.into_alive())
            .collect())
    }

    async fn create_or_revive(&self, input: &ThemeInput) -> DbResult<Theme> {
        validate_theme_input(input)?;
        let key = ThemeKey {
            title: input.title.clone(),
            subtitle: input.subtitle.clone(),
        };
        let now = current_timestamp();

        let mut tx = begin_write(self.pool).await?;
        upsert_theme(&mut tx, &key, input.position, None, &now).await?;
        let theme = lookup_theme(&mut tx, &key)
            .await?
            .and_then(|e| e.stored.into_alive())
            .ok_or_else(|| DbError::Database {
                message: format!("Theme {} vanished after upsert", key),
            })?;
        tx.commit().await?;

        Ok(theme)
    }

    async fn update(&self, uuid: &str, input: &ThemeInput) -> DbResult<Theme> {
        validate_theme_input(input)?;
        let result = sqlx::query(
            "UPDATE theme SET title = ?, subtitle = ?, position = ?, updated_at = ? \
             WHERE uuid = ? AND deleted_at IS NULL",
        )
        .bind(&input.title)
        .bind(&input.subtitle)
        .bind(input.position)
        .bind(current_timestamp())
        .bind(uuid)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Theme", uuid));
        }

        self.get(uuid).await
    }

    async fn soft_delete(&self, uuid: &str) -> DbResult<()> {
        let now = current_timestamp();
        let result = sqlx::query(
            "UPDATE theme SET deleted_at = ?, updated_at = ? WHERE uuid = ? AND deleted_at IS NULL",
        )
        .bind(&now)
        .bind(&now)
        .bind(uuid)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Theme", uuid));
        }

        Ok(())
    }
}
