// SPDX-License-Identifier: MIT

//! Persisted entity shapes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A tick ready to be inserted (no id yet; the store assigns one).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTick {
    pub user_id: String,
    pub logbook_type: String,
    pub route_name: String,
    pub tick_date: NaiveDate,
    pub route_grade: String,
    pub binned_grade: Option<String>,
    pub binned_code: Option<i64>,
    pub location: Option<String>,
    pub length: Option<f64>,
    pub pitches: Option<i64>,
    pub lead_style: Option<String>,
    pub discipline: String,
    pub send_bool: bool,
    pub length_category: Option<String>,
    pub season_category: String,
    pub crux_angle: Option<String>,
    pub crux_energy: Option<String>,
    pub notes: Option<String>,
    pub cur_max_sport: Option<i64>,
    pub cur_max_trad: Option<i64>,
    pub cur_max_boulder: Option<i64>,
    pub difficulty_category: Option<String>,
    /// Tag texts to associate with this tick at commit time
    pub tags: Vec<String>,
}

/// A persisted tick row. `user_id` is fixed at creation and the row is
/// never mutated by the pipeline afterwards.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserTick {
    pub id: i64,
    pub user_id: String,
    pub logbook_type: String,
    pub route_name: String,
    pub tick_date: NaiveDate,
    pub route_grade: String,
    pub binned_grade: Option<String>,
    pub binned_code: Option<i64>,
    pub location: Option<String>,
    pub length: Option<f64>,
    pub pitches: Option<i64>,
    pub lead_style: Option<String>,
    pub discipline: String,
    pub send_bool: bool,
    pub length_category: Option<String>,
    pub season_category: String,
    pub crux_angle: Option<String>,
    pub crux_energy: Option<String>,
    pub notes: Option<String>,
    pub cur_max_sport: Option<i64>,
    pub cur_max_trad: Option<i64>,
    pub cur_max_boulder: Option<i64>,
    pub difficulty_category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Free-form label, unique by text, many-to-many with ticks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub text: String,
}

/// Aggregated best-ascent summary per grade/discipline band.
///
/// The table and shape exist for the builder contract; the base sync
/// flow does not populate it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PerformancePyramidEntry {
    pub user_id: String,
    pub discipline: String,
    pub binned_code: i64,
    pub num_sends: i64,
}

/// Per-user, per-source last-sync marker, updated atomically with each
/// successful batch.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SyncState {
    pub user_id: String,
    pub logbook_type: String,
    pub last_synced_at: DateTime<Utc>,
}
