//! Tests for database error types.

use crate::db::DbError;

#[test]
fn not_found_error_displays_correctly() {
    let err = DbError::not_found("Theme", "0b5e7b7e-1111-4c4c-9d9d-000000000001");
    assert_eq!(
        err.to_string(),
        "Entity not found: Theme with id '0b5e7b7e-1111-4c4c-9d9d-000000000001'"
    );
}

#[test]
fn constraint_error_displays_correctly() {
    let err = DbError::Constraint {
        message: "UNIQUE constraint failed: theme.title, theme.subtitle".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Constraint violation: UNIQUE constraint failed: theme.title, theme.subtitle"
    );
}

#[test]
fn migration_error_displays_correctly() {
    let err = DbError::Migration {
        message: "failed to apply migration 0001".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Migration error: failed to apply migration 0001"
    );
}

#[test]
fn connection_and_database_errors_are_transient() {
    assert!(
        DbError::Connection {
            message: "pool timed out".to_string()
        }
        .is_transient()
    );
    assert!(
        DbError::Database {
            message: "disk I/O error".to_string()
        }
        .is_transient()
    );
    assert!(!DbError::not_found("UseCase", "x").is_transient());
    assert!(
        !DbError::Validation {
            message: "title is blank".to_string()
        }
        .is_transient()
    );
}

#[test]
fn pool_timeout_maps_to_connection_error() {
    let err = DbError::from(sqlx::Error::PoolTimedOut);
    assert!(matches!(err, DbError::Connection { .. }));
}

#[test]
fn row_not_found_maps_to_database_error() {
    let err = DbError::from(sqlx::Error::RowNotFound);
    assert!(matches!(err, DbError::Database { .. }));
}
