//! Router configuration for the web host.
//!
//! The host has no API: it answers the readiness probe and serves the
//! single-page application, falling back to its entry document for any
//! other path so that client-side routes resolve.

use std::path::Path;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::WebConfig;

use super::middleware::create_cors_layer;

/// Health check response body.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Create the full router: health check, static files and SPA fallback.
pub fn create_router(config: &WebConfig) -> Router {
    create_health_router()
        .merge(create_static_router(&config.static_path, &config.index_file))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&config.cors_origins))
                .layer(CompressionLayer::new()),
        )
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

/// Create a router serving `static_path`, answering unknown paths with
/// `index_file` and a 200 status.
pub fn create_static_router(static_path: &str, index_file: &str) -> Router {
    let index = Path::new(static_path).join(index_file);
    if !index.exists() {
        tracing::warn!(path = %index.display(), "SPA entry document not found");
    }

    let serve_dir = ServeDir::new(static_path).fallback(ServeFile::new(index));
    Router::new().fallback_service(serve_dir)
}
