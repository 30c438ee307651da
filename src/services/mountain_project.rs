// SPDX-License-Identifier: MIT

//! Mountain Project gateway: direct fetch of the tick export.
//!
//! Mountain Project publishes a user's complete tick history as a CSV
//! document at `<profile>/tick-export`. One GET, no session state; the
//! calling task suspends only while the request is in flight.

use crate::error::{AppError, Result};
use crate::models::{RawRecord, SourceCredential};
use crate::services::SourceGateway;

pub const SOURCE_NAME: &str = "mountain_project";

/// Columns the export must carry for normalization to make sense.
const REQUIRED_COLUMNS: &[&str] = &[
    "Date",
    "Route",
    "Rating",
    "Notes",
    "Pitches",
    "Location",
    "Style",
    "Lead Style",
    "Route Type",
    "Length",
];

/// Mountain Project tick-export client.
#[derive(Clone)]
pub struct MountainProjectClient {
    http: reqwest::Client,
    base_url: String,
}

impl MountainProjectClient {
    /// Create a client rooted at the given site base URL (overridable
    /// for tests).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Export endpoint for a profile locator. Absolute locators are
    /// used as-is; bare profile paths resolve against the base URL.
    fn export_url(&self, profile: &str) -> String {
        let profile = profile.trim_end_matches('/');
        if profile.starts_with("http://") || profile.starts_with("https://") {
            format!("{}/tick-export", profile)
        } else {
            format!(
                "{}/{}/tick-export",
                self.base_url.trim_end_matches('/'),
                profile.trim_start_matches('/')
            )
        }
    }

    /// Fetch and parse the tick export for a profile locator.
    pub async fn fetch_ticks(&self, profile_url: &str) -> Result<Vec<RawRecord>> {
        let url = self.export_url(profile_url);

        let response = self
            .http
            .get(&url)
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", SOURCE_NAME, e)))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AppError::Authentication(format!(
                "{} rejected the profile locator (HTTP {})",
                SOURCE_NAME, status
            )));
        }
        if !status.is_success() {
            return Err(AppError::SourceUnavailable(format!(
                "{}: HTTP {}",
                SOURCE_NAME, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", SOURCE_NAME, e)))?;

        let records = parse_tick_export(&body)?;
        tracing::info!(count = records.len(), "Fetched Mountain Project ticks");
        Ok(records)
    }
}

impl SourceGateway for MountainProjectClient {
    async fn fetch(&self, credential: &SourceCredential) -> Result<Vec<RawRecord>> {
        match credential {
            SourceCredential::ProfileUrl(url) => self.fetch_ticks(url).await,
            SourceCredential::Login { .. } => Err(AppError::Authentication(format!(
                "{} requires a profile URL, not a login",
                SOURCE_NAME
            ))),
        }
    }
}

/// Parse the CSV tick export into raw records, enforcing the expected
/// header columns.
pub fn parse_tick_export(body: &str) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::source_format(SOURCE_NAME, format!("unreadable header: {}", e)))?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(AppError::source_format(
                SOURCE_NAME,
                format!("missing expected column '{}'", column),
            ));
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row =
            row.map_err(|e| AppError::source_format(SOURCE_NAME, format!("bad row: {}", e)))?;
        let mut record = RawRecord::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            record.insert(
                header.to_string(),
                serde_json::Value::String(value.to_string()),
            );
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
Date,Route,Rating,Notes,URL,Pitches,Location,\"Avg Stars\",\"Your Stars\",Style,\"Lead Style\",\"Route Type\",\"Your Rating\",Length,\"Rating Code\"
2023-01-15,The Nose,5.9,\"Classic, a bit polished\",https://example.com/r/1,1,Yosemite > El Capitan,3.9,4,Lead,Onsight,Trad,,80,800
2023-02-01,Midnight Lightning,V8,,https://example.com/r/2,1,Yosemite > Camp 4,4.0,-1,Send,,Boulder,,12,20800
";

    #[test]
    fn test_export_url_resolution() {
        let client = MountainProjectClient::new("https://www.mountainproject.com");
        assert_eq!(
            client.export_url("https://www.mountainproject.com/user/12345/jane-doe/"),
            "https://www.mountainproject.com/user/12345/jane-doe/tick-export"
        );
        assert_eq!(
            client.export_url("user/12345/jane-doe"),
            "https://www.mountainproject.com/user/12345/jane-doe/tick-export"
        );
    }

    #[test]
    fn test_parse_tick_export() {
        let records = parse_tick_export(EXPORT).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Route"], "The Nose");
        assert_eq!(records[0]["Location"], "Yosemite > El Capitan");
        assert_eq!(records[1]["Rating"], "V8");
    }

    #[test]
    fn test_parse_missing_column_is_format_error() {
        let body = "Date,Route\n2023-01-15,The Nose\n";
        let err = parse_tick_export(body).unwrap_err();
        match err {
            AppError::SourceFormat { source_name, detail } => {
                assert_eq!(source_name, SOURCE_NAME);
                assert!(detail.contains("Rating"));
            }
            other => panic!("expected SourceFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_export() {
        let body = "Date,Route,Rating,Notes,URL,Pitches,Location,Style,Lead Style,Route Type,Length\n";
        let records = parse_tick_export(body).unwrap();
        assert!(records.is_empty());
    }
}
