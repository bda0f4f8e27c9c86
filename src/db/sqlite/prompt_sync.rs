//! SQLite-specific bulk sync repository implementation.

use std::collections::HashSet;

use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use super::helpers::{Upsert, begin_write, upsert_theme, upsert_use_case};
use crate::db::utils::current_timestamp;
use crate::db::{
    DbResult, EntityCounts, PrebuiltPrompt, PromptSyncRepository, SyncPlan, SyncSummary,
};

/// SQLite-specific bulk sync repository.
pub struct SqlitePromptSyncRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> PromptSyncRepository for SqlitePromptSyncRepository<'a> {
    async fn reconcile(&self, plan: &SyncPlan) -> DbResult<SyncSummary> {
        let mut tx = begin_write(self.pool).await?;

        let summary = reconcile_with_transaction(&mut tx, plan).await?;

        // Dropping `tx` on any earlier `?` rolls everything back.
        tx.commit().await?;

        Ok(summary)
    }

    async fn export(&self) -> DbResult<Vec<PrebuiltPrompt>> {
        // One statement, so SQLite serves it from a single snapshot.
        let rows = sqlx::query(
            "SELECT t.title AS theme_title, t.subtitle AS theme_subtitle, t.position AS theme_position, \
                    u.title AS use_case_title, u.instruction AS use_case_instruction, \
                    u.user_input_form AS use_case_user_input_form, u.position AS use_case_position \
             FROM theme t JOIN use_case u ON u.theme_id = t.id \
             WHERE t.deleted_at IS NULL AND u.deleted_at IS NULL \
             ORDER BY t.position IS NULL, t.position, t.sequence, t.id, \
                      u.position IS NULL, u.position, u.sequence, u.id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PrebuiltPrompt {
                theme_title: row.get("theme_title"),
                theme_subtitle: row.get("theme_subtitle"),
                theme_position: row.get("theme_position"),
                use_case_title: row.get("use_case_title"),
                use_case_instruction: row.get("use_case_instruction"),
                use_case_user_input_form: row.get("use_case_user_input_form"),
                use_case_position: row.get("use_case_position"),
            })
            .collect())
    }
}

fn tally(counts: &mut EntityCounts, outcome: Upsert) {
    match outcome {
        Upsert::Created => counts.created += 1,
        Upsert::Revived => counts.revived += 1,
        Upsert::Updated => counts.updated += 1,
        Upsert::Unchanged => {}
    }
}

/// Apply a plan on an open connection (normally a transaction).
///
/// Upserts every planned theme and use-case with its submitted arrival order,
/// then soft-deletes every alive row the plan did not touch.
async fn reconcile_with_transaction(
    conn: &mut SqliteConnection,
    plan: &SyncPlan,
) -> DbResult<SyncSummary> {
    let now = current_timestamp();
    let mut summary = SyncSummary::default();
    let mut kept_themes: HashSet<i64> = HashSet::with_capacity(plan.themes.len());
    let mut kept_use_cases: HashSet<i64> = HashSet::with_capacity(plan.use_case_count());

    for theme in &plan.themes {
        let (theme_id, outcome) = upsert_theme(
            conn,
            &theme.key,
            theme.position,
            Some(theme.sequence),
            &now,
        )
        .await?;
        tally(&mut summary.themes, outcome);
        kept_themes.insert(theme_id);

        for use_case in &theme.use_cases {
            let (use_case_id, outcome) = upsert_use_case(
                conn,
                theme_id,
                &use_case.key,
                use_case.position,
                Some(use_case.sequence),
                &now,
            )
            .await?;
            tally(&mut summary.use_cases, outcome);
            kept_use_cases.insert(use_case_id);
        }
    }

    summary.themes.deleted = sweep(conn, "theme", &kept_themes, &now).await?;
    summary.use_cases.deleted = sweep(conn, "use_case", &kept_use_cases, &now).await?;

    debug!(?summary, "reconcile applied");
    Ok(summary)
}

/// Soft-delete every alive row of `table` whose id is not in `keep`.
async fn sweep(
    conn: &mut SqliteConnection,
    table: &'static str,
    keep: &HashSet<i64>,
    now: &str,
) -> DbResult<usize> {
    let alive: Vec<i64> = sqlx::query_scalar(&format!(
        "SELECT id FROM {table} WHERE deleted_at IS NULL"
    ))
    .fetch_all(&mut *conn)
    .await?;

    let update = format!("UPDATE {table} SET deleted_at = ?, updated_at = ? WHERE id = ?");
    let mut deleted = 0;
    for id in alive.into_iter().filter(|id| !keep.contains(id)) {
        sqlx::query(&update)
            .bind(now)
            .bind(now)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        deleted += 1;
    }

    Ok(deleted)
}
