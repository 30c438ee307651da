// SPDX-License-Identifier: MIT

//! Sync orchestrator: drives one logbook through the full pipeline.
//!
//! fetch -> normalize -> classify -> aggregate -> build -> commit
//!
//! Syncs for the same user are single-flight: a per-user async lock
//! serializes them so two concurrent requests cannot interleave their
//! running-max stamps or double-write a batch.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::db::TickStore;
use crate::error::Result;
use crate::models::{LogbookType, SourceCredential};
use crate::services::{
    aggregator, builder, classifier, EightAGateway, GradeService, MountainProjectClient,
    Normalizer, SourceGateway,
};

/// Per-user advisory locks. Entries are created on first use and kept
/// for the lifetime of the service.
type UserLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Counts reported by a completed sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub tick_count: usize,
    pub tag_count: usize,
    pub pyramid_count: usize,
}

/// Orchestrates logbook syncs across both sources.
pub struct SyncService {
    mountain_project: MountainProjectClient,
    eight_a: EightAGateway,
    normalizer: Normalizer,
    store: TickStore,
    user_locks: UserLocks,
}

impl SyncService {
    pub fn new(
        mountain_project: MountainProjectClient,
        eight_a: EightAGateway,
        grades: Arc<GradeService>,
        store: TickStore,
    ) -> Self {
        Self {
            mountain_project,
            eight_a,
            normalizer: Normalizer::new(grades),
            store,
            user_locks: Arc::new(DashMap::new()),
        }
    }

    /// Run one complete sync for a (user, source) pair.
    ///
    /// The credential lives only for the duration of this call and is
    /// never logged or persisted.
    pub async fn process(
        &self,
        user_id: &str,
        logbook_type: LogbookType,
        credential: &SourceCredential,
    ) -> Result<SyncOutcome> {
        let lock = self
            .user_locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        tracing::info!(
            user_id,
            logbook_type = logbook_type.as_str(),
            "Starting logbook sync"
        );

        let raw = match logbook_type {
            LogbookType::MountainProject => self.mountain_project.fetch(credential).await?,
            LogbookType::EightA => self.eight_a.fetch(credential).await?,
        };
        tracing::info!(user_id, rows = raw.len(), "Fetched raw logbook");

        let canonical = match logbook_type {
            LogbookType::MountainProject => {
                self.normalizer.normalize_mountain_project(user_id, &raw)
            }
            LogbookType::EightA => self.normalizer.normalize_eight_a(user_id, &raw),
        };
        let dropped = raw.len() - canonical.len();
        if dropped > 0 {
            tracing::warn!(user_id, dropped, "Dropped rows during normalization");
        }

        let classified: Vec<_> = canonical.into_iter().map(classifier::classify).collect();
        let stamped = aggregator::stamp_running_max(classified);
        let ticks = builder::build_entities(stamped);

        let summary = self
            .store
            .commit_batch(user_id, logbook_type, &ticks)
            .await?;

        tracing::info!(
            user_id,
            logbook_type = logbook_type.as_str(),
            ticks = summary.tick_count,
            tags = summary.tag_count,
            "Logbook sync complete"
        );

        Ok(SyncOutcome {
            tick_count: summary.tick_count,
            tag_count: summary.tag_count,
            pyramid_count: summary.pyramid_count,
        })
    }
}
