// SPDX-License-Identifier: MIT

//! Database layer (SQLite via sqlx).

pub mod store;

pub use store::{CommitSummary, TickStore};

use std::str::FromStr;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;

use crate::error::Result;

/// Connect to the database (creating the file if needed) and ensure
/// the schema exists.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    tracing::debug!(url = database_url, "Connecting to database");
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Create the tables if they don't exist.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_ticks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            logbook_type TEXT NOT NULL,
            route_name TEXT NOT NULL,
            tick_date TEXT NOT NULL,
            route_grade TEXT NOT NULL,
            binned_grade TEXT,
            binned_code INTEGER,
            location TEXT,
            length REAL,
            pitches INTEGER,
            lead_style TEXT,
            discipline TEXT NOT NULL,
            send_bool INTEGER NOT NULL,
            length_category TEXT,
            season_category TEXT NOT NULL,
            crux_angle TEXT,
            crux_energy TEXT,
            notes TEXT,
            cur_max_sport INTEGER,
            cur_max_trad INTEGER,
            cur_max_boulder INTEGER,
            difficulty_category TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            text TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_tick_tags (
            tick_id INTEGER NOT NULL REFERENCES user_ticks(id),
            tag_id INTEGER NOT NULL REFERENCES tags(id),
            PRIMARY KEY (tick_id, tag_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS performance_pyramid (
            user_id TEXT NOT NULL,
            discipline TEXT NOT NULL,
            binned_code INTEGER NOT NULL,
            num_sends INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, discipline, binned_code)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sync_state (
            user_id TEXT NOT NULL,
            logbook_type TEXT NOT NULL,
            last_synced_at TEXT NOT NULL,
            PRIMARY KEY (user_id, logbook_type)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::debug!("Database schema initialized");
    Ok(())
}
