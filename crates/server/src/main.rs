//! datemark server entry point.
//!
//! Loads configuration, builds the Notion-backed tree mirror and serves it over
//! HTTP (default) or MCP stdio. Logging goes to stderr to avoid interfering
//! with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use datemark_client::NotionClient;
use datemark_core::{AppConfig, Transport, TreeMirror};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod http;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let page_id = config.require_page_id()?;
    let client = NotionClient::from_app_config(&config)?;
    let mirror = Arc::new(TreeMirror::new(Arc::new(client), page_id, config.mirror_options())?);

    match config.transport {
        Transport::Http => {
            tracing::info!(page_id, "Starting datemark on HTTP transport");
            http::serve(mirror, config.bind_addr()).await?;
        }
        Transport::Stdio => {
            tracing::info!(page_id, "Starting datemark on stdio transport");
            let server = serve_server(handler::DatemarkServer::new(mirror), stdio()).await?;
            server.waiting().await?;
        }
    }

    Ok(())
}
