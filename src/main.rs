// SPDX-License-Identifier: MIT

//! Cragsync CLI
//!
//! Runs one logbook sync end to end. Usage:
//!
//! ```text
//! cragsync <user_id> mountain_project <profile_url>
//! cragsync <user_id> eight_a <username>     # password from EIGHT_A_PASSWORD
//! ```

use std::sync::Arc;

use cragsync::{
    config::Config,
    db,
    models::{LogbookType, SourceCredential},
    services::{
        EightAClient, EightAGateway, GradeService, MountainProjectClient, SessionPool, SyncService,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    let config = Config::from_env()?;
    tracing::info!("Starting cragsync");

    let (user_id, logbook_type, credential) = parse_args()?;

    let pool = db::connect(&config.database_url).await?;
    let store = db::TickStore::new(pool);

    let grades = Arc::new(GradeService::new(config.grade_cache_size));
    let eight_a = EightAGateway::new(
        EightAClient::new(config.eight_a_base_url.clone()),
        SessionPool::new(config.scraper_pool_size),
    );
    let sync = SyncService::new(
        MountainProjectClient::new(config.mp_base_url.clone()),
        eight_a,
        grades,
        store,
    );

    let outcome = sync.process(&user_id, logbook_type, &credential).await?;
    tracing::info!(
        user_id = %user_id,
        ticks = outcome.tick_count,
        tags = outcome.tag_count,
        "Sync finished"
    );

    Ok(())
}

/// Parse `<user_id> <source> <profile_url | username>` from argv.
///
/// The 8a.nu password comes from the EIGHT_A_PASSWORD environment
/// variable so it never appears in process listings.
fn parse_args() -> Result<(String, LogbookType, SourceCredential), String> {
    let mut args = std::env::args().skip(1);
    let user_id = args.next().ok_or("usage: cragsync <user_id> <source> <target>")?;
    let source = args.next().ok_or("missing source (mountain_project | eight_a)")?;
    let target = args.next().ok_or("missing profile URL or username")?;

    let logbook_type: LogbookType = source.parse()?;
    let credential = match logbook_type {
        LogbookType::MountainProject => SourceCredential::ProfileUrl(target),
        LogbookType::EightA => {
            let password = std::env::var("EIGHT_A_PASSWORD")
                .map_err(|_| "EIGHT_A_PASSWORD must be set for 8a.nu syncs".to_string())?;
            SourceCredential::Login {
                username: target,
                password,
            }
        }
    };
    Ok((user_id, logbook_type, credential))
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cragsync=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
