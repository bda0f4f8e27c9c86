//! Tests for SqlitePromptSyncRepository.

use crate::db::{
    Database, PlannedTheme, PlannedUseCase, PromptSyncRepository, SqliteDatabase, SyncPlan,
    ThemeKey, ThemeRepository, UseCaseKey, UseCaseRepository,
};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

fn theme(title: &str, position: Option<i64>, sequence: i64, use_cases: &[&str]) -> PlannedTheme {
    PlannedTheme {
        key: ThemeKey {
            title: title.to_string(),
            subtitle: "Sub".to_string(),
        },
        position,
        sequence,
        use_cases: use_cases
            .iter()
            .enumerate()
            .map(|(i, title)| PlannedUseCase {
                key: UseCaseKey {
                    title: title.to_string(),
                    instruction: "Do it".to_string(),
                    user_input_form: String::new(),
                },
                position: None,
                sequence: i as i64,
            })
            .collect(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn reconcile_creates_then_reports_unchanged() {
    let db = setup_db().await;
    let plan = SyncPlan {
        themes: vec![theme("A", Some(1), 0, &["U1", "U2"]), theme("B", None, 1, &["U3"])],
    };

    let first = db.prompts().reconcile(&plan).await.expect("Reconcile");
    assert_eq!(first.themes.created, 2);
    assert_eq!(first.use_cases.created, 3);

    let second = db.prompts().reconcile(&plan).await.expect("Reconcile");
    assert_eq!(second, Default::default());
}

#[tokio::test(flavor = "multi_thread")]
async fn reconcile_counts_updates_and_deletions() {
    let db = setup_db().await;
    db.prompts()
        .reconcile(&SyncPlan {
            themes: vec![theme("A", Some(1), 0, &["U1", "U2"]), theme("B", None, 1, &["U3"])],
        })
        .await
        .expect("Seed");

    let summary = db
        .prompts()
        .reconcile(&SyncPlan {
            themes: vec![theme("A", Some(2), 0, &["U1"])],
        })
        .await
        .expect("Reconcile");

    assert_eq!(summary.themes.updated, 1);
    assert_eq!(summary.themes.deleted, 1);
    // U2 is dropped from A, U3 goes with B.
    assert_eq!(summary.use_cases.deleted, 2);
    assert_eq!(summary.use_cases.created, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn reconcile_revives_use_cases_left_alive_under_deleted_theme() {
    let db = setup_db().await;
    let plan = SyncPlan {
        themes: vec![theme("A", None, 0, &["U1"])],
    };
    db.prompts().reconcile(&plan).await.expect("Seed");

    let a = db
        .themes()
        .list()
        .await
        .expect("List")
        .pop()
        .expect("Theme A");
    db.themes().soft_delete(&a.uuid).await.expect("Delete");

    let summary = db.prompts().reconcile(&plan).await.expect("Reconcile");
    assert_eq!(summary.themes.revived, 1);
    assert_eq!(summary.use_cases.revived, 0);

    let use_cases = db.use_cases().list_by_theme(&a.uuid).await.expect("List");
    assert_eq!(use_cases.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_plan_soft_deletes_everything() {
    let db = setup_db().await;
    db.prompts()
        .reconcile(&SyncPlan {
            themes: vec![theme("A", None, 0, &["U1"])],
        })
        .await
        .expect("Seed");

    let summary = db
        .prompts()
        .reconcile(&SyncPlan::default())
        .await
        .expect("Reconcile");
    assert_eq!(summary.themes.deleted, 1);
    assert_eq!(summary.use_cases.deleted, 1);

    let alive: i64 = sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM theme WHERE deleted_at IS NULL) + \
                (SELECT COUNT(*) FROM use_case WHERE deleted_at IS NULL)",
    )
    .fetch_one(db.pool())
    .await
    .expect("Count");
    assert_eq!(alive, 0);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM theme")
        .fetch_one(db.pool())
        .await
        .expect("Count");
    assert_eq!(rows, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn export_skips_deleted_and_follows_display_order() {
    let db = setup_db().await;
    db.prompts()
        .reconcile(&SyncPlan {
            themes: vec![
                theme("late", None, 0, &["x"]),
                theme("first", Some(1), 1, &["b", "a"]),
                theme("gone", Some(0), 2, &["y"]),
            ],
        })
        .await
        .expect("Seed");
    let gone = db
        .themes()
        .list()
        .await
        .expect("List")
        .into_iter()
        .find(|t| t.title == "gone")
        .expect("Theme gone");
    db.themes().soft_delete(&gone.uuid).await.expect("Delete");

    let rows = db.prompts().export().await.expect("Export");
    let pairs: Vec<_> = rows
        .iter()
        .map(|r| (r.theme_title.as_str(), r.use_case_title.as_str()))
        .collect();
    assert_eq!(pairs, vec![("first", "b"), ("first", "a"), ("late", "x")]);
    assert_eq!(rows[0].theme_position, Some(1));
    assert_eq!(rows[2].theme_position, None);
}
