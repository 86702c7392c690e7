//! Block-children request parameters and validation.

use serde::Serialize;

use crate::notion::NotionError;

/// Query parameters for `GET /blocks/{block_id}/children`.
///
/// See https://developers.notion.com/reference/get-block-children
#[derive(Debug, Clone, Serialize)]
pub struct ListChildrenRequest {
    /// Parent block (or page) id; not part of the query string.
    #[serde(skip)]
    pub block_id: String,

    /// Number of children per page (1-100).
    pub page_size: u8,

    /// Cursor returned by the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

impl ListChildrenRequest {
    pub fn new(block_id: &str, page_size: u8, start_cursor: Option<&str>) -> Self {
        Self { block_id: block_id.to_string(), page_size, start_cursor: start_cursor.map(str::to_string) }
    }

    /// Validate the request parameters.
    ///
    /// Block ids are UUIDs, with or without dashes; anything else would be
    /// spliced into the URL path, so it is rejected up front.
    pub fn validate(&self) -> Result<(), NotionError> {
        if self.block_id.is_empty() {
            return Err(NotionError::InvalidRequest("block id cannot be empty".to_string()));
        }

        if !self.block_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(NotionError::InvalidRequest(format!("malformed block id: {}", self.block_id)));
        }

        if !(1..=datemark_core::tree::MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(NotionError::InvalidRequest(format!(
                "page_size must be 1-{}, got {}",
                datemark_core::tree::MAX_PAGE_SIZE,
                self.page_size
            )));
        }

        if let Some(cursor) = &self.start_cursor
            && cursor.is_empty()
        {
            return Err(NotionError::InvalidRequest("start_cursor cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Endpoint URL below the API base.
    pub fn url(&self, base_url: &str) -> Result<url::Url, NotionError> {
        let raw = format!("{}/blocks/{}/children", base_url.trim_end_matches('/'), self.block_id);
        url::Url::parse(&raw).map_err(|e| NotionError::InvalidRequest(format!("bad URL {}: {}", raw, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let req = ListChildrenRequest::new("b55c9c91-384d-452b-81db-d1ef79372b75", 100, None);
        assert!(req.validate().is_ok());

        let req = ListChildrenRequest::new("b55c9c91384d452b81dbd1ef79372b75", 1, Some("abc"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_invalid_block_id() {
        let req = ListChildrenRequest::new("", 10, None);
        assert!(matches!(req.validate(), Err(NotionError::InvalidRequest(_))));

        let req = ListChildrenRequest::new("../users", 10, None);
        assert!(matches!(req.validate(), Err(NotionError::InvalidRequest(_))));
    }

    #[test]
    fn test_invalid_page_size() {
        assert!(ListChildrenRequest::new("abc", 0, None).validate().is_err());
        assert!(ListChildrenRequest::new("abc", 101, None).validate().is_err());
    }

    #[test]
    fn test_empty_cursor() {
        let req = ListChildrenRequest::new("abc", 10, Some(""));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_query_serialization() {
        let req = ListChildrenRequest::new("abc", 10, None);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "page_size": 10 }));

        let req = ListChildrenRequest::new("abc", 10, Some("next"));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "page_size": 10, "start_cursor": "next" }));
    }

    #[test]
    fn test_url() {
        let req = ListChildrenRequest::new("abc", 10, None);
        let url = req.url("https://api.notion.com/v1/").unwrap();
        assert_eq!(url.as_str(), "https://api.notion.com/v1/blocks/abc/children");
    }
}
