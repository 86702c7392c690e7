//! Notion API client error types.

use std::sync::Arc;

/// Errors from the Notion API client.
#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// No integration token configured.
    #[error("missing API token: DATEMARK_NOTION_TOKEN not set")]
    MissingToken,

    /// Invalid request parameters (block id, page size, base URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (invalid token or page not shared).
    #[error("authentication failed: {0}")]
    AuthError(String),

    /// The block does not exist or the integration cannot see it.
    #[error("block not found: {0}")]
    NotFound(String),

    /// Rate limited by Notion.
    #[error("rate limited: too many requests{}", retry_after.map(|s| format!(" (retry after {}s)", s)).unwrap_or_default())]
    RateLimited { retry_after: Option<u64> },

    /// HTTP error response.
    #[error("HTTP error: {status} {message}")]
    HttpError { status: u16, message: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for NotionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { NotionError::Timeout } else { NotionError::Network(Arc::new(err)) }
    }
}

impl From<NotionError> for datemark_core::Error {
    fn from(err: NotionError) -> Self {
        use datemark_core::Error;

        let message = err.to_string();
        match err {
            NotionError::MissingToken | NotionError::AuthError(_) => Error::StoreAuth(message),
            NotionError::InvalidRequest(_) => Error::InvalidInput(message),
            NotionError::NotFound(_) => Error::StoreNotFound(message),
            NotionError::RateLimited { .. } => Error::StoreRateLimited(message),
            NotionError::HttpError { .. } => Error::StoreHttp(message),
            NotionError::Timeout => Error::StoreTimeout(message),
            NotionError::Network(_) => Error::StoreNetwork(message),
            NotionError::Parse(_) => Error::StoreParse(message),
        }
    }
}
