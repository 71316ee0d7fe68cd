//! Health Check API Handler
//!
//! Liveness endpoint for probes and monitoring.

use axum::{http::StatusCode, response::IntoResponse};

/// GET /health
/// Liveness check for the daemon
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
