//! Template API Handlers
//!
//! HTTP endpoints for managing the job-template registry.

use axum::{Json, extract::State, http::StatusCode};
use sluice_core::domain::template::JobTemplate;
use sluice_core::dto::template::RemoveTemplate;

use crate::api::AppState;
use crate::api::error::ApiResult;

/// POST /template/create
/// Register a new job template
pub async fn create_template(
    State(state): State<AppState>,
    Json(template): Json<JobTemplate>,
) -> ApiResult<StatusCode> {
    tracing::info!(
        "Adding job template '{}' for pattern '{}'",
        template.name,
        template.pattern
    );

    state.registry.add(template)?;

    Ok(StatusCode::CREATED)
}

/// POST /template/delete
/// Remove the first registered template with the given pattern text
pub async fn delete_template(
    State(state): State<AppState>,
    Json(req): Json<RemoveTemplate>,
) -> ApiResult<StatusCode> {
    tracing::info!("Removing job template with pattern '{}'", req.pattern);

    state.registry.remove(&req.pattern)?;

    Ok(StatusCode::OK)
}

/// GET /template/list
/// Snapshot of all registered templates, in insertion order
pub async fn list_templates(State(state): State<AppState>) -> ApiResult<Json<Vec<JobTemplate>>> {
    Ok(Json(state.registry.list()))
}
