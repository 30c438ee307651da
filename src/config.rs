//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database URL
    pub database_url: String,
    /// Maximum concurrent 8a.nu scraper sessions (bounds the blocking
    /// worker pool system-wide)
    pub scraper_pool_size: usize,
    /// Capacity of the grade-conversion LRU cache
    pub grade_cache_size: usize,
    /// Mountain Project base URL (overridable for tests)
    pub mp_base_url: String,
    /// 8a.nu base URL (overridable for tests)
    pub eight_a_base_url: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            scraper_pool_size: 2,
            grade_cache_size: 1024,
            mp_base_url: "https://www.mountainproject.com".to_string(),
            eight_a_base_url: "https://www.8a.nu".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            scraper_pool_size: env::var("SCRAPER_POOL_SIZE")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap_or(2),
            grade_cache_size: env::var("GRADE_CACHE_SIZE")
                .unwrap_or_else(|_| "1024".to_string())
                .parse()
                .unwrap_or(1024),
            mp_base_url: env::var("MP_BASE_URL")
                .unwrap_or_else(|_| "https://www.mountainproject.com".to_string()),
            eight_a_base_url: env::var("EIGHT_A_BASE_URL")
                .unwrap_or_else(|_| "https://www.8a.nu".to_string()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.scraper_pool_size, 2);
        assert_eq!(config.grade_cache_size, 1024);
        assert!(config.mp_base_url.contains("mountainproject"));
    }
}
