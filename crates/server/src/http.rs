//! HTTP surface: `GET /get` and `GET /refresh`.
//!
//! Both answer with the ordered `[date, count]` pairs as JSON and an `ETag`
//! derived from the counts.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use datemark_core::{DateCounts, TreeMirror};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

/// Build the router over a shared mirror.
pub fn router(mirror: Arc<TreeMirror>) -> Router {
    Router::new()
        .route("/get", get(get_counts))
        .route("/refresh", get(refresh_counts))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(mirror)
}

/// Counts after an incremental refresh (or a full fetch on first use).
async fn get_counts(State(mirror): State<Arc<TreeMirror>>) -> Result<Response, ApiError> {
    let counts = mirror.date_counts().await?;
    Ok(counts_response(&counts))
}

/// Counts after discarding and rebuilding the whole mirror.
async fn refresh_counts(State(mirror): State<Arc<TreeMirror>>) -> Result<Response, ApiError> {
    let counts = mirror.refresh_date_counts().await?;
    Ok(counts_response(&counts))
}

fn counts_response(counts: &DateCounts) -> Response {
    let etag = format!("\"{}\"", counts.fingerprint());
    ([(header::ETAG, etag)], Json(counts.to_pairs())).into_response()
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(mirror: Arc<TreeMirror>, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running at http://{}/", listener.local_addr()?);

    axum::serve(listener, router(mirror))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
