//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::date_headings::date_headings_impl;
use datemark_core::TreeMirror;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::{ToolCallContext, ToolRouter},
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The MCP server handler for datemark.
#[derive(Clone)]
pub struct DatemarkServer {
    mirror: Arc<TreeMirror>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl DatemarkServer {
    /// Create a new server handler over a shared mirror.
    pub fn new(mirror: Arc<TreeMirror>) -> Self {
        Self { mirror, tool_router: Self::tool_router() }
    }

    /// Count dated level-2 headings, refreshing changed top-level blocks first.
    #[tool(
        description = "Count level-2 headings starting with a YYYY-MM-DD date, grouped by date. Re-fetches only top-level blocks edited since the last call."
    )]
    async fn date_headings(&self) -> Result<CallToolResult, McpError> {
        date_headings_impl(&self.mirror, false).await
    }

    /// Rebuild the mirror from scratch, then count.
    #[tool(
        description = "Discard the cached document tree, fetch it again in full, and count level-2 headings starting with a YYYY-MM-DD date."
    )]
    async fn date_headings_refresh(&self) -> Result<CallToolResult, McpError> {
        date_headings_impl(&self.mirror, true).await
    }
}

impl ServerHandler for DatemarkServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "datemark".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
