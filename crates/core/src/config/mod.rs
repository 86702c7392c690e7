//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (DATEMARK_*)
//! 2. TOML config file (if DATEMARK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::tree::MirrorOptions;

mod validation;

pub use validation::ConfigError;

/// Which surface the binary serves the query interface on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// `GET /get` and `GET /refresh` over HTTP.
    #[default]
    Http,
    /// MCP tools over stdin/stdout.
    Stdio,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (DATEMARK_*)
/// 2. TOML config file (if DATEMARK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Notion integration token.
    ///
    /// Set via DATEMARK_NOTION_TOKEN environment variable.
    #[serde(default)]
    pub notion_token: Option<String>,

    /// Id of the page whose blocks are mirrored.
    ///
    /// Set via DATEMARK_PAGE_ID environment variable.
    #[serde(default)]
    pub page_id: Option<String>,

    /// Notion API base URL.
    #[serde(default = "default_notion_base_url")]
    pub notion_base_url: String,

    /// Value of the `Notion-Version` header.
    #[serde(default = "default_notion_version")]
    pub notion_version: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via DATEMARK_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via DATEMARK_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Page size for full subtree fetches (1-100).
    #[serde(default = "default_page_size")]
    pub page_size: u8,

    /// Page size for the top-level staleness scan (1-100).
    #[serde(default = "default_refresh_page_size")]
    pub refresh_page_size: u8,

    /// How many changed siblings of one scan page are re-fetched at once.
    #[serde(default = "default_max_concurrent_expansions")]
    pub max_concurrent_expansions: usize,

    /// Minimum spacing between Notion requests in milliseconds; 0 disables pacing.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Serve over HTTP (default) or MCP stdio.
    #[serde(default)]
    pub transport: Transport,

    /// HTTP listen address.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_notion_base_url() -> String {
    "https://api.notion.com/v1".into()
}

fn default_notion_version() -> String {
    "2022-06-28".into()
}

fn default_user_agent() -> String {
    "datemark/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_page_size() -> u8 {
    100
}

fn default_refresh_page_size() -> u8 {
    10
}

fn default_max_concurrent_expansions() -> usize {
    10
}

fn default_min_request_interval_ms() -> u64 {
    334 // ~3 requests per second
}

fn default_host() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}

fn default_port() -> u16 {
    3000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notion_token: None,
            page_id: None,
            notion_base_url: default_notion_base_url(),
            notion_version: default_notion_version(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            page_size: default_page_size(),
            refresh_page_size: default_refresh_page_size(),
            max_concurrent_expansions: default_max_concurrent_expansions(),
            min_request_interval_ms: default_min_request_interval_ms(),
            transport: Transport::default(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    /// Socket address the HTTP surface binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Mirror paging and concurrency settings.
    pub fn mirror_options(&self) -> MirrorOptions {
        MirrorOptions {
            page_size: self.page_size,
            refresh_page_size: self.refresh_page_size,
            max_concurrent_expansions: self.max_concurrent_expansions,
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `DATEMARK_`
    /// 2. TOML file from `DATEMARK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("DATEMARK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("DATEMARK_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// The Notion token, required before any request is made.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the token is not set.
    pub fn require_notion_token(&self) -> Result<&str, ConfigError> {
        self.notion_token.as_deref().filter(|t| !t.is_empty()).ok_or_else(|| ConfigError::Missing {
            field: "notion_token".into(),
            hint: "Set DATEMARK_NOTION_TOKEN environment variable".into(),
        })
    }

    /// The id of the mirrored page.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the page id is not set.
    pub fn require_page_id(&self) -> Result<&str, ConfigError> {
        self.page_id.as_deref().filter(|p| !p.is_empty()).ok_or_else(|| ConfigError::Missing {
            field: "page_id".into(),
            hint: "Set DATEMARK_PAGE_ID environment variable".into(),
        })
    }
}
