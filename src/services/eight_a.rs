// SPDX-License-Identifier: MIT

//! 8a.nu gateway: interactive session scraping.
//!
//! 8a.nu has no export endpoint. The gateway drives a stateful login
//! against the site's identity provider (session cookie preserved in
//! the client's cookie store), then pages through the protected ascent
//! listing until the full record set is assembled.
//!
//! The flow is inherently blocking and stateful, so it runs on a
//! bounded `spawn_blocking` pool ([`SessionPool`]) and is bridged back
//! to the async pipeline as a single future. The pool size bounds the
//! number of concurrent interactive sessions system-wide; the blocking
//! call never occupies a scheduler thread.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::error::{AppError, Result};
use crate::models::{RawRecord, SourceCredential};
use crate::services::SourceGateway;

pub const SOURCE_NAME: &str = "eight_a";

const PAGE_SIZE: u32 = 50;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One page of the ascent listing.
#[derive(Debug, Deserialize)]
struct AscentPage {
    #[serde(default)]
    ascents: Vec<RawRecord>,
    #[serde(default, rename = "totalItems")]
    total_items: Option<u64>,
}

/// Bounded worker pool for interactive scraper sessions.
///
/// Wraps a semaphore whose permits cap how many blocking sessions may
/// run at once; `spawn_blocking` keeps them off the async scheduler.
#[derive(Clone)]
pub struct SessionPool {
    permits: Arc<Semaphore>,
}

impl SessionPool {
    pub fn new(size: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(size.max(1))),
        }
    }

    /// Run a blocking job on the pool and await its result.
    pub async fn run<T, F>(&self, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("session pool closed: {}", e)))?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit; // held for the session's lifetime
            job()
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("scraper task panicked: {}", e)))?
    }
}

/// Blocking 8a.nu session client.
#[derive(Clone)]
pub struct EightAClient {
    base_url: String,
}

impl EightAClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Log in and pull every ascent page. Blocking; call through
    /// [`SessionPool::run`].
    pub fn fetch_blocking(&self, username: &str, password: &str) -> Result<Vec<RawRecord>> {
        let http = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("http client: {}", e)))?;

        self.login(&http, username, password)?;

        let mut records: Vec<RawRecord> = Vec::new();
        let mut page_index = 0u32;
        loop {
            let page = self.fetch_page(&http, username, page_index)?;
            let page_len = page.ascents.len();
            records.extend(page.ascents);

            let done = match page.total_items {
                Some(total) => records.len() as u64 >= total,
                None => page_len < PAGE_SIZE as usize,
            };
            if done || page_len == 0 {
                break;
            }
            page_index += 1;
        }

        tracing::info!(count = records.len(), pages = page_index + 1, "Fetched 8a.nu ascents");
        Ok(records)
    }

    /// Authenticate against the identity provider; the session cookie
    /// lands in the client's cookie store.
    fn login(&self, http: &reqwest::blocking::Client, username: &str, password: &str) -> Result<()> {
        let url = format!("{}/api/login", self.base_url);
        let response = http
            .post(&url)
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", SOURCE_NAME, e)))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AppError::Authentication(format!(
                "{} rejected the login for this account",
                SOURCE_NAME
            )));
        }
        if !status.is_success() {
            return Err(AppError::SourceUnavailable(format!(
                "{}: login HTTP {}",
                SOURCE_NAME, status
            )));
        }
        Ok(())
    }

    fn fetch_page(
        &self,
        http: &reqwest::blocking::Client,
        username: &str,
        page_index: u32,
    ) -> Result<AscentPage> {
        let url = format!("{}/api/users/{}/ascents", self.base_url, username);
        let response = http
            .get(&url)
            .query(&[
                ("pageIndex", page_index.to_string()),
                ("pageSize", PAGE_SIZE.to_string()),
            ])
            .send()
            .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", SOURCE_NAME, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::SourceUnavailable(format!(
                "{}: ascent page HTTP {}",
                SOURCE_NAME, status
            )));
        }

        response
            .json()
            .map_err(|e| AppError::source_format(SOURCE_NAME, format!("bad ascent page: {}", e)))
    }
}

/// Async-facing gateway pairing the blocking client with its pool.
#[derive(Clone)]
pub struct EightAGateway {
    client: EightAClient,
    pool: SessionPool,
}

impl EightAGateway {
    pub fn new(client: EightAClient, pool: SessionPool) -> Self {
        Self { client, pool }
    }
}

impl SourceGateway for EightAGateway {
    async fn fetch(&self, credential: &SourceCredential) -> Result<Vec<RawRecord>> {
        let (username, password) = match credential {
            SourceCredential::Login { username, password } => {
                (username.clone(), password.clone())
            }
            SourceCredential::ProfileUrl(_) => {
                return Err(AppError::Authentication(format!(
                    "{} requires a username and password",
                    SOURCE_NAME
                )))
            }
        };

        let client = self.client.clone();
        self.pool
            .run(move || client.fetch_blocking(&username, &password))
            .await
    }
}
