// SPDX-License-Identifier: MIT

//! Data models for the sync pipeline.

pub mod entities;
pub mod source;
pub mod tick;

pub use entities::{NewTick, PerformancePyramidEntry, SyncState, Tag, UserTick};
pub use source::{LogbookType, RawRecord, SourceCredential};
pub use tick::{CanonicalTick, ClassifiedTick, Discipline};
