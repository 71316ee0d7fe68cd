//! Admin API
//!
//! HTTP surface for mutating the template registry, looking up execution
//! status by object URL, and manually reprocessing an object.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod health;
pub mod job;
pub mod template;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::registry::TemplateRegistry;
use crate::scheduler::Dispatcher;
use crate::tracker::ExecutionTracker;

/// Shared state handed to every admin handler
#[derive(Clone)]
pub struct AppState {
    pub registry: TemplateRegistry,
    pub tracker: ExecutionTracker,
    pub dispatcher: Arc<Dispatcher>,
}

/// Create the admin API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Template endpoints
        .route("/template/create", post(template::create_template))
        .route("/template/delete", post(template::delete_template))
        .route("/template/list", get(template::list_templates))
        // Job endpoints
        .route("/job/status", get(job::job_status))
        .route("/job/retry", post(job::retry_object))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
