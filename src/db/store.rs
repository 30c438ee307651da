// SPDX-License-Identifier: MIT

//! Tick store with transactional batch commits.
//!
//! A batch either persists ticks + tag associations + the sync marker
//! together, or persists nothing: every statement runs inside one
//! transaction, and an error before `commit` drops the transaction,
//! rolling the whole batch back.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{LogbookType, NewTick, PerformancePyramidEntry, SyncState, Tag, UserTick};

/// What a successful commit wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitSummary {
    pub tick_count: usize,
    /// Distinct tags referenced by this batch (created or reused)
    pub tag_count: usize,
    /// Reserved: the base sync flow does not build pyramid rows
    pub pyramid_count: usize,
}

/// SQLite-backed store for ticks, tags, pyramid rows and sync markers.
#[derive(Clone)]
pub struct TickStore {
    pool: SqlitePool,
}

impl TickStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Commit one batch atomically: insert ticks, create-or-reuse tags
    /// and associate them, and advance the sync marker. Returns how
    /// much was written, or rolls everything back.
    pub async fn commit_batch(
        &self,
        user_id: &str,
        logbook_type: LogbookType,
        ticks: &[NewTick],
    ) -> Result<CommitSummary> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let mut tick_ids = Vec::with_capacity(ticks.len());
        for tick in ticks {
            let result = sqlx::query(
                r#"
                INSERT INTO user_ticks (
                    user_id, logbook_type, route_name, tick_date, route_grade,
                    binned_grade, binned_code, location, length, pitches,
                    lead_style, discipline, send_bool, length_category,
                    season_category, crux_angle, crux_energy, notes,
                    cur_max_sport, cur_max_trad, cur_max_boulder,
                    difficulty_category, created_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&tick.user_id)
            .bind(&tick.logbook_type)
            .bind(&tick.route_name)
            .bind(tick.tick_date)
            .bind(&tick.route_grade)
            .bind(&tick.binned_grade)
            .bind(tick.binned_code)
            .bind(&tick.location)
            .bind(tick.length)
            .bind(tick.pitches)
            .bind(&tick.lead_style)
            .bind(&tick.discipline)
            .bind(tick.send_bool)
            .bind(&tick.length_category)
            .bind(&tick.season_category)
            .bind(&tick.crux_angle)
            .bind(&tick.crux_energy)
            .bind(&tick.notes)
            .bind(tick.cur_max_sport)
            .bind(tick.cur_max_trad)
            .bind(tick.cur_max_boulder)
            .bind(&tick.difficulty_category)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            tick_ids.push(result.last_insert_rowid());
        }

        // Create-if-absent-else-reuse per distinct tag text, then
        // associate with the ticks that produced it.
        let mut tag_ids: HashMap<&str, i64> = HashMap::new();
        for (tick, tick_id) in ticks.iter().zip(&tick_ids) {
            for tag_text in &tick.tags {
                let tag_id = match tag_ids.get(tag_text.as_str()) {
                    Some(id) => *id,
                    None => {
                        sqlx::query("INSERT INTO tags (text) VALUES (?) ON CONFLICT(text) DO NOTHING")
                            .bind(tag_text)
                            .execute(&mut *tx)
                            .await?;
                        let (id,): (i64,) = sqlx::query_as("SELECT id FROM tags WHERE text = ?")
                            .bind(tag_text)
                            .fetch_one(&mut *tx)
                            .await?;
                        tag_ids.insert(tag_text, id);
                        id
                    }
                };
                sqlx::query(
                    "INSERT OR IGNORE INTO user_tick_tags (tick_id, tag_id) VALUES (?, ?)",
                )
                .bind(tick_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        sqlx::query(
            r#"
            INSERT INTO sync_state (user_id, logbook_type, last_synced_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, logbook_type)
            DO UPDATE SET last_synced_at = excluded.last_synced_at
            "#,
        )
        .bind(user_id)
        .bind(logbook_type.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let summary = CommitSummary {
            tick_count: tick_ids.len(),
            tag_count: tag_ids.len(),
            pyramid_count: 0,
        };
        tracing::info!(
            user_id,
            logbook_type = logbook_type.as_str(),
            ticks = summary.tick_count,
            tags = summary.tag_count,
            "Batch committed"
        );
        Ok(summary)
    }

    // ─── Read Surface ────────────────────────────────────────────

    /// All ticks for a user, chronological.
    pub async fn ticks_for_user(&self, user_id: &str) -> Result<Vec<UserTick>> {
        let ticks = sqlx::query_as::<_, UserTick>(
            "SELECT * FROM user_ticks WHERE user_id = ? ORDER BY tick_date, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ticks)
    }

    /// Tags associated with one tick.
    pub async fn tags_for_tick(&self, tick_id: i64) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.text FROM tags t
            JOIN user_tick_tags utt ON utt.tag_id = t.id
            WHERE utt.tick_id = ?
            ORDER BY t.text
            "#,
        )
        .bind(tick_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    /// Total number of tag rows (distinct tag texts ever created).
    pub async fn tag_count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Last-sync marker for (user, source), if any batch has committed.
    pub async fn sync_state(
        &self,
        user_id: &str,
        logbook_type: LogbookType,
    ) -> Result<Option<SyncState>> {
        let state = sqlx::query_as::<_, SyncState>(
            "SELECT * FROM sync_state WHERE user_id = ? AND logbook_type = ?",
        )
        .bind(user_id)
        .bind(logbook_type.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(state)
    }

    /// Pyramid rows for a user (reserved; empty in the base flow).
    pub async fn pyramid_for_user(&self, user_id: &str) -> Result<Vec<PerformancePyramidEntry>> {
        let rows = sqlx::query_as::<_, PerformancePyramidEntry>(
            "SELECT * FROM performance_pyramid WHERE user_id = ? ORDER BY discipline, binned_code",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
