// SPDX-License-Identifier: MIT

use chrono::NaiveDate;
use cragsync::db::{self, TickStore};
use cragsync::models::{CanonicalTick, LogbookType, RawRecord};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Create an in-memory database with the schema applied.
///
/// Capped to one connection: each `:memory:` connection is a separate
/// database, so a larger pool would scatter tables across them.
#[allow(dead_code)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    db::init_schema(&pool)
        .await
        .expect("Failed to initialize schema");
    pool
}

#[allow(dead_code)]
pub async fn test_store() -> TickStore {
    TickStore::new(test_pool().await)
}

/// Minimal canonical tick with sensible defaults for pipeline tests.
#[allow(dead_code)]
pub fn canonical_tick(route_name: &str, grade: &str, date: &str) -> CanonicalTick {
    CanonicalTick {
        user_id: "test-user".to_string(),
        logbook_type: LogbookType::MountainProject,
        route_name: route_name.to_string(),
        tick_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("bad test date"),
        route_grade: grade.to_string(),
        location: None,
        length: None,
        pitches: None,
        lead_style: Some("redpoint".to_string()),
        notes: None,
        discipline_hint: Some("sport".to_string()),
    }
}

/// Build a raw Mountain Project export row keyed by the CSV headers.
#[allow(dead_code)]
pub fn mp_raw_record(fields: &[(&str, &str)]) -> RawRecord {
    let mut record = RawRecord::new();
    for (key, value) in fields {
        record.insert(
            key.to_string(),
            serde_json::Value::String(value.to_string()),
        );
    }
    record
}
