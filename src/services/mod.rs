// SPDX-License-Identifier: MIT

//! Services module - the ingestion pipeline stages.

pub mod aggregator;
pub mod builder;
pub mod classifier;
pub mod eight_a;
pub mod grades;
pub mod mountain_project;
pub mod normalizer;
pub mod sync;

pub use eight_a::{EightAClient, EightAGateway, SessionPool};
pub use grades::{GradeService, GradeSystem};
pub use mountain_project::MountainProjectClient;
pub use normalizer::Normalizer;
pub use sync::{SyncOutcome, SyncService};

use crate::error::Result;
use crate::models::{RawRecord, SourceCredential};

/// Common gateway contract: fetch the complete raw record set for one
/// account. Implementations fail with `SourceUnavailable`,
/// `Authentication` or `SourceFormat`; they never partially succeed.
pub trait SourceGateway {
    fn fetch(
        &self,
        credential: &SourceCredential,
    ) -> impl std::future::Future<Output = Result<Vec<RawRecord>>> + Send;
}
