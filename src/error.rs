// SPDX-License-Identifier: MIT

//! Application error types for the sync pipeline.
//!
//! Only whole-call failures live here. Row-local conditions (a record
//! missing a required field, a grade that cannot be binned) are handled
//! in place with a tracing event and never abort a batch.

/// Pipeline error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Network failure or timeout reaching a source. Retryable by the
    /// caller; never retried internally.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// The source rejected the supplied credential.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The source returned data in an unexpected shape. The field is
    /// `source_name` because thiserror reserves `source` for the
    /// error-source chain.
    #[error("Unexpected data from {source_name}: {detail}")]
    SourceFormat { source_name: String, detail: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build a `SourceFormat` error tagged with the offending source.
    pub fn source_format(source_name: &str, detail: impl Into<String>) -> Self {
        AppError::SourceFormat {
            source_name: source_name.to_string(),
            detail: detail.into(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

/// Result type alias for the pipeline.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format_display_names_the_source() {
        let err = AppError::source_format("eight_a", "bad ascent page");
        assert_eq!(err.to_string(), "Unexpected data from eight_a: bad ascent page");
        // Usable through the std error trait like any other variant
        let dyn_err: &dyn std::error::Error = &err;
        assert!(dyn_err.to_string().contains("eight_a"));
    }

    #[test]
    fn test_sqlx_errors_map_to_database() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Database(_)));
    }
}
