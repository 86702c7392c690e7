//! Notion block-children API client.
//!
//! Implements [`DocumentStore`] on top of the Notion REST API.
//!
//! ### API contract
//!
//! - **Endpoint**: `GET https://api.notion.com/v1/blocks/{block_id}/children`
//! - **Authentication**: `Authorization: Bearer <token>` plus a `Notion-Version` header.
//! - **Pagination**: `page_size` (max 100) and `start_cursor`; responses carry
//!   `next_cursor` and `has_more`.
//! - **Rate Limiting**:
//!   - Notion allows an average of three requests per second per integration.
//!   - Requests are spaced by a configurable minimum interval.
//!   - 429 responses surface as `RateLimited`; no retries happen here.
//! - **Normalization**: Raw block objects become [`Node`](datemark_core::Node)s.

pub mod error;
pub mod request;
pub mod response;

pub use error::NotionError;
pub use request::ListChildrenRequest;
pub use response::{ApiErrorBody, ListChildrenResponse, RawBlock};

use async_trait::async_trait;
use datemark_core::{AppConfig, ChildPage, DocumentStore};
use reqwest::{StatusCode, header};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Default base URL for the Notion API.
const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// API version sent with every request.
const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "datemark/0.1";

/// Default spacing between requests (about three per second).
const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(334);

/// Notion API client configuration.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    /// Integration token.
    pub token: String,
    /// Base URL (default: https://api.notion.com/v1).
    pub base_url: String,
    /// `Notion-Version` header (default: 2022-06-28).
    pub notion_version: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: datemark/0.x).
    pub user_agent: String,
    /// Minimum spacing between requests; zero disables pacing.
    pub min_request_interval: Duration,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
        }
    }
}

impl NotionConfig {
    /// Build the client configuration from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, NotionError> {
        let token = config.require_notion_token().map_err(|_| NotionError::MissingToken)?;

        Ok(Self {
            token: token.to_string(),
            base_url: config.notion_base_url.clone(),
            notion_version: config.notion_version.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            min_request_interval: config.min_request_interval(),
        })
    }
}

/// Rate limiter to enforce request intervals.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now)),
            min_interval,
        }
    }

    /// Acquire permission to make a request, waiting if necessary.
    async fn acquire(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// Notion API client.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    config: NotionConfig,
    rate_limiter: Arc<RateLimiter>,
}

impl NotionClient {
    /// Create a new Notion client with the given configuration.
    pub fn new(config: NotionConfig) -> Result<Self, NotionError> {
        if config.token.is_empty() {
            return Err(NotionError::MissingToken);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| NotionError::Network(Arc::new(e)))?;

        let rate_limiter = Arc::new(RateLimiter::new(config.min_request_interval));

        Ok(Self { http, config, rate_limiter })
    }

    /// Create a new Notion client from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, NotionError> {
        Self::new(NotionConfig::from_app_config(config)?)
    }

    /// Fetch one page of a block's children.
    pub async fn list_children(&self, req: &ListChildrenRequest) -> Result<ListChildrenResponse, NotionError> {
        req.validate()?;
        let url = req.url(&self.config.base_url)?;

        self.rate_limiter.acquire().await;

        let start = Instant::now();
        tracing::debug!(block_id = %req.block_id, cursor = ?req.start_cursor, "listing Notion block children");

        let http_response = self
            .http
            .get(url)
            .bearer_auth(&self.config.token)
            .header("Notion-Version", &self.config.notion_version)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .query(req)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("Notion API response status: {}", status);

        if !status.is_success() {
            let retry_after = http_response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = http_response.bytes().await.unwrap_or_default();
            return Err(Self::status_error(status, &body, retry_after));
        }

        let bytes = http_response.bytes().await?;
        let response: ListChildrenResponse =
            serde_json::from_slice(&bytes).map_err(|e| NotionError::Parse(e.to_string()))?;

        tracing::debug!(
            "listed {} children of {} in {:?} (has_more={})",
            response.results.len(),
            req.block_id,
            start.elapsed(),
            response.has_more
        );

        Ok(response)
    }

    /// Map a non-success response to an error, keeping Notion's message when present.
    fn status_error(status: StatusCode, body: &[u8], retry_after: Option<u64>) -> NotionError {
        let message = serde_json::from_slice::<ApiErrorBody>(body)
            .map(|b| if b.code.is_empty() { b.message } else { format!("{}: {}", b.code, b.message) })
            .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => NotionError::AuthError(message),
            StatusCode::NOT_FOUND => NotionError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => NotionError::RateLimited { retry_after },
            _ => NotionError::HttpError { status: status.as_u16(), message },
        }
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &NotionConfig {
        &self.config
    }
}

#[async_trait]
impl DocumentStore for NotionClient {
    async fn list_children(
        &self, node_id: &str, page_size: u8, cursor: Option<&str>,
    ) -> Result<ChildPage, datemark_core::Error> {
        let req = ListChildrenRequest::new(node_id, page_size, cursor);
        let response = NotionClient::list_children(self, &req).await?;
        Ok(response.into())
    }
}
