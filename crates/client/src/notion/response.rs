//! Notion API response types and normalization.

use chrono::{DateTime, Utc};
use datemark_core::{ChildPage, Node, NodeKind};
use serde::Deserialize;

/// Raw paginated list returned by `GET /blocks/{id}/children`.
#[derive(Debug, Deserialize)]
pub struct ListChildrenResponse {
    pub results: Vec<RawBlock>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// A block object, reduced to the fields the mirror needs.
#[derive(Debug, Deserialize)]
pub struct RawBlock {
    pub id: String,
    pub last_edited_time: DateTime<Utc>,
    #[serde(default)]
    pub has_children: bool,
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default)]
    pub heading_2: Option<HeadingBody>,
}

/// Payload of a `heading_2` block.
#[derive(Debug, Deserialize)]
pub struct HeadingBody {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: Option<String>,
}

/// Error object Notion returns with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl From<RawBlock> for Node {
    /// Convert a raw block into a tree node.
    ///
    /// Only the first rich-text run of a heading is kept.
    fn from(raw: RawBlock) -> Self {
        let kind = match raw.heading_2 {
            Some(heading) => {
                NodeKind::Heading2 { text: heading.rich_text.into_iter().next().and_then(|run| run.plain_text) }
            }
            None => NodeKind::Other { block_type: raw.block_type },
        };

        Node {
            id: raw.id,
            last_modified: raw.last_edited_time,
            has_children: raw.has_children,
            kind,
            children: Vec::new(),
        }
    }
}

impl From<ListChildrenResponse> for ChildPage {
    fn from(raw: ListChildrenResponse) -> Self {
        ChildPage {
            results: raw.results.into_iter().map(Node::from).collect(),
            next_cursor: raw.next_cursor,
            has_more: raw.has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"{
        "object": "list",
        "results": [
            {
                "object": "block",
                "id": "c02fc1d3-db8b-45c5-a222-27595b15aea7",
                "created_time": "2024-03-01T09:00:00.000Z",
                "last_edited_time": "2024-03-02T10:15:00.000Z",
                "has_children": false,
                "archived": false,
                "type": "heading_2",
                "heading_2": {
                    "rich_text": [
                        { "type": "text", "text": { "content": "2024-03-02" }, "plain_text": "2024-03-02" },
                        { "type": "text", "text": { "content": " Sat" }, "plain_text": " Sat" }
                    ],
                    "is_toggleable": false,
                    "color": "default"
                }
            },
            {
                "object": "block",
                "id": "acc7eb06-05cd-4603-a384-5e1e4f1f4e72",
                "created_time": "2024-03-01T09:00:00.000Z",
                "last_edited_time": "2024-03-01T09:00:00.000Z",
                "has_children": true,
                "archived": false,
                "type": "toggle",
                "toggle": { "rich_text": [], "color": "default" }
            },
            {
                "object": "block",
                "id": "3c29dedf-00a5-4915-b137-120c61f5e5d8",
                "created_time": "2024-03-01T09:00:00.000Z",
                "last_edited_time": "2024-03-01T09:00:00.000Z",
                "has_children": false,
                "type": "heading_2",
                "heading_2": { "rich_text": [], "color": "default" }
            }
        ],
        "next_cursor": "3c29dedf-00a5-4915-b137-120c61f5e5d9",
        "has_more": true,
        "type": "block",
        "block": {}
    }"#;

    #[test]
    fn test_deserialize_list_response() {
        let response: ListChildrenResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert_eq!(response.results.len(), 3);
        assert!(response.has_more);
        assert_eq!(response.next_cursor.as_deref(), Some("3c29dedf-00a5-4915-b137-120c61f5e5d9"));
        assert_eq!(response.results[0].block_type, "heading_2");
        assert_eq!(response.results[0].last_edited_time, "2024-03-02T10:15:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_normalize_to_child_page() {
        let raw: ListChildrenResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        let page: ChildPage = raw.into();

        let heading = &page.results[0];
        assert_eq!(heading.heading_text(), Some("2024-03-02"));
        assert!(!heading.has_children);

        let toggle = &page.results[1];
        assert_eq!(toggle.kind, NodeKind::Other { block_type: "toggle".into() });
        assert!(toggle.has_children);
        assert!(toggle.children.is_empty());

        let untitled = &page.results[2];
        assert!(untitled.is_heading());
        assert_eq!(untitled.heading_text(), None);
    }

    #[test]
    fn test_last_page() {
        let json = r#"{"object": "list", "results": [], "next_cursor": null, "has_more": false}"#;
        let raw: ListChildrenResponse = serde_json::from_str(json).unwrap();
        let page: ChildPage = raw.into();
        assert!(page.results.is_empty());
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_error_body() {
        let json = r#"{"object": "error", "status": 401, "code": "unauthorized", "message": "API token is invalid."}"#;
        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.code, "unauthorized");
        assert_eq!(body.message, "API token is invalid.");
    }
}
