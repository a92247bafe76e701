//! API Module
//!
//! HTTP API layer over a [`Registry`]. Host services mount the router
//! returned by [`create_router`] in their own server.

pub mod error;
pub mod health;
pub mod job;

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, patch},
};
use tower_http::trace::TraceLayer;

use crate::info::ServiceInfoProvider;
use crate::registry::Registry;

/// Create the API router with all job endpoints
///
/// `/info` reports this crate's name and version; use
/// [`create_router_with_info`] to report the host's own.
pub fn create_router(registry: Arc<Registry>) -> Router {
    create_router_with_info(registry, ServiceInfoProvider::default())
}

/// Create the API router, reporting `info` at `/info`
pub fn create_router_with_info(registry: Arc<Registry>, info: ServiceInfoProvider) -> Router {
    Router::new()
        // Health and service info
        .route("/health", get(health::health_check))
        .route("/info", get(health::service_info))
        // Job endpoints
        .route("/jobs", get(job::list_jobs))
        .route("/jobs/{id}", get(job::get_job))
        .route("/jobs/{id}/cancel", patch(job::cancel_job))
        // Add state and middleware
        .with_state(registry)
        .layer(Extension(Arc::new(info)))
        .layer(TraceLayer::new_for_http())
}
