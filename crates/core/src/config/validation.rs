//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use crate::tree::MAX_PAGE_SIZE;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `page_size` or `refresh_page_size` is outside 1-100
    /// - `max_concurrent_expansions` is outside 1-64
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `min_request_interval_ms` exceeds 10 seconds
    /// - `user_agent`, `notion_version` or `notion_base_url` is empty
    /// - `port` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, size) in [("page_size", self.page_size), ("refresh_page_size", self.refresh_page_size)] {
            if size == 0 || size > MAX_PAGE_SIZE {
                return Err(invalid(field, format!("must be between 1 and {}", MAX_PAGE_SIZE)));
            }
        }

        if !(1..=64).contains(&self.max_concurrent_expansions) {
            return Err(invalid("max_concurrent_expansions", "must be between 1 and 64"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.min_request_interval_ms > 10_000 {
            return Err(invalid("min_request_interval_ms", "must not exceed 10 seconds"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.notion_version.is_empty() {
            return Err(invalid("notion_version", "must not be empty"));
        }
        if !self.notion_base_url.starts_with("http://") && !self.notion_base_url.starts_with("https://") {
            return Err(invalid("notion_base_url", "must be an http(s) URL"));
        }

        if self.port == 0 {
            return Err(invalid("port", "must not be 0"));
        }

        if self.page_size < self.refresh_page_size {
            tracing::warn!(
                page_size = self.page_size,
                refresh_page_size = self.refresh_page_size,
                "refresh scan pages are larger than full-fetch pages"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(config: AppConfig, expected: &str) {
        let result = config.validate();
        assert!(
            matches!(&result, Err(ConfigError::Invalid { field, .. }) if field == expected),
            "expected {} to be invalid, got {:?}",
            expected,
            result
        );
    }

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_page_sizes() {
        assert_invalid(AppConfig { page_size: 0, ..Default::default() }, "page_size");
        assert_invalid(AppConfig { page_size: 101, ..Default::default() }, "page_size");
        assert_invalid(AppConfig { refresh_page_size: 0, ..Default::default() }, "refresh_page_size");
    }

    #[test]
    fn test_validate_concurrency() {
        assert_invalid(AppConfig { max_concurrent_expansions: 0, ..Default::default() }, "max_concurrent_expansions");
        assert_invalid(AppConfig { max_concurrent_expansions: 65, ..Default::default() }, "max_concurrent_expansions");
    }

    #[test]
    fn test_validate_timeout_bounds() {
        assert_invalid(AppConfig { timeout_ms: 50, ..Default::default() }, "timeout_ms");
        assert_invalid(AppConfig { timeout_ms: 301_000, ..Default::default() }, "timeout_ms"); // 5min 1sec
    }

    #[test]
    fn test_validate_request_interval() {
        assert_invalid(AppConfig { min_request_interval_ms: 10_001, ..Default::default() }, "min_request_interval_ms");
        assert!(AppConfig { min_request_interval_ms: 0, ..Default::default() }.validate().is_ok());
    }

    #[test]
    fn test_validate_strings() {
        assert_invalid(AppConfig { user_agent: String::new(), ..Default::default() }, "user_agent");
        assert_invalid(AppConfig { notion_version: String::new(), ..Default::default() }, "notion_version");
        assert_invalid(AppConfig { notion_base_url: "api.notion.com".into(), ..Default::default() }, "notion_base_url");
    }

    #[test]
    fn test_validate_port() {
        assert_invalid(AppConfig { port: 0, ..Default::default() }, "port");
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig {
            page_size: 1,
            refresh_page_size: 100,
            max_concurrent_expansions: 64,
            timeout_ms: 100,
            ..Default::default()
        }; // minimum/maximum valid values
        assert!(config.validate().is_ok());
    }
}
