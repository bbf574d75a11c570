//! HTTP request handlers: scrape endpoint and health check.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use prometheus::{Encoder, Registry, TextEncoder};
use tracing::{debug, error};

use crate::state::AppState;

// ============================================================
// Health
// ============================================================

pub(crate) async fn handle_health() -> &'static str {
    "ok"
}

// ============================================================
// Metrics
// ============================================================

/// Gathers every registered collector and renders the text exposition format.
///
/// Collection reads the report from disk and may wait on the collector's
/// scrape lock, so it runs on the blocking pool.
pub(crate) async fn handle_metrics(State(state): State<AppState>) -> Result<Response, StatusCode> {
    let registry = state.registry.clone();
    let body = tokio::task::spawn_blocking(move || encode(&registry))
        .await
        .map_err(|e| {
            error!(error = %e, "scrape task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    debug!(bytes = body.len(), "served scrape");
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response())
}

fn encode(registry: &Registry) -> prometheus::Result<Vec<u8>> {
    let families = registry.gather();
    let mut buf = Vec::new();
    TextEncoder::new().encode(&families, &mut buf)?;
    Ok(buf)
}
