//! Unified error types for datemark.
//!
//! Every failure that can end a query maps to one of these. The display string
//! starts with a stable upper-case code so callers can match on it.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the datemark mirror and its surfaces.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty root id, page size out of range).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The document service rejected our credentials.
    #[error("STORE_AUTH_ERROR: {0}")]
    StoreAuth(String),

    /// The requested block does not exist or is not shared with the integration.
    #[error("STORE_NOT_FOUND: {0}")]
    StoreNotFound(String),

    /// The document service throttled us.
    #[error("STORE_RATE_LIMITED: {0}")]
    StoreRateLimited(String),

    /// A request to the document service timed out.
    #[error("STORE_TIMEOUT: {0}")]
    StoreTimeout(String),

    /// Any other non-success HTTP response.
    #[error("STORE_HTTP_ERROR: {0}")]
    StoreHttp(String),

    /// Connection-level failure.
    #[error("STORE_NETWORK_ERROR: {0}")]
    StoreNetwork(String),

    /// The response body could not be decoded.
    #[error("STORE_PARSE_ERROR: {0}")]
    StoreParse(String),
}

impl Error {
    /// The stable code prefix of this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::StoreAuth(_) => "STORE_AUTH_ERROR",
            Error::StoreNotFound(_) => "STORE_NOT_FOUND",
            Error::StoreRateLimited(_) => "STORE_RATE_LIMITED",
            Error::StoreTimeout(_) => "STORE_TIMEOUT",
            Error::StoreHttp(_) => "STORE_HTTP_ERROR",
            Error::StoreNetwork(_) => "STORE_NETWORK_ERROR",
            Error::StoreParse(_) => "STORE_PARSE_ERROR",
        }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::StoreAuth(msg) => (-32009, msg.clone()),
            Error::StoreNotFound(msg) => (-32001, msg.clone()),
            Error::StoreRateLimited(msg) => (-32010, msg.clone()),
            Error::StoreTimeout(msg) => (-32006, msg.clone()),
            Error::StoreHttp(msg) => (-32008, msg.clone()),
            Error::StoreNetwork(msg) => (-32008, msg.clone()),
            Error::StoreParse(msg) => (-32000, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
