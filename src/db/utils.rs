//! Database utility functions.

use chrono::Utc;
use uuid::Uuid;

/// Generate a fresh uuid for a new theme or use-case.
pub fn generate_entity_id() -> String {
    Uuid::new_v4().to_string()
}

/// Get current datetime as string in SQLite format
pub fn current_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_uuids() {
        let id = generate_entity_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, generate_entity_id());
    }

    #[test]
    fn timestamp_uses_sqlite_format() {
        let ts = current_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, "%Y-%m-%d %H:%M:%S").is_ok());
    }
}
