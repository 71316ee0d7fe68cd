//! Job API Handlers
//!
//! HTTP endpoints for execution status lookups and manual reprocessing.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use sluice_core::dto::execution::ExecutionView;
use sluice_core::dto::retry::RetryObject;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    url: String,
}

/// GET /job/status?url=s3://bucket/key
/// Look up the tracked execution for a canonical object URL
pub async fn job_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<ExecutionView>> {
    tracing::debug!("Status lookup for {}", query.url);

    state
        .tracker
        .status_by_url(&query.url)
        .map(|execution| Json(ExecutionView::from(execution)))
        .ok_or_else(|| ApiError::NotFound(format!("No tracked execution for {}", query.url)))
}

/// POST /job/retry
/// Reprocess a stored object without a real queue event
///
/// Dispatches synchronously through the regular decode/match/submit path,
/// so the response reflects the submission outcome.
pub async fn retry_object(
    State(state): State<AppState>,
    Json(req): Json<RetryObject>,
) -> ApiResult<StatusCode> {
    tracing::info!("Manual retry for bucket '{}', key '{}'", req.bucket, req.key);

    state
        .dispatcher
        .retry_object(&req.bucket, &req.key)
        .await
        .map_err(|e| ApiError::InternalError(format!("{:#}", e)))?;

    Ok(StatusCode::ACCEPTED)
}
