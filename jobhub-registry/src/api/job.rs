//! Job API Handlers
//!
//! HTTP endpoints exposing the registry's jobs.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use jobhub_core::domain::job::Job;
use jobhub_core::dto::job::JobFilter;
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::registry::Registry;

/// GET /jobs
/// List jobs matching the query filter
pub async fn list_jobs(
    State(registry): State<Arc<Registry>>,
    Query(filter): Query<JobFilter>,
) -> ApiResult<Json<Vec<Job>>> {
    tracing::debug!("Listing jobs with filter: {:?}", filter);

    let jobs = registry.list(&filter)?;
    Ok(Json(jobs))
}

/// GET /jobs/{id}
/// Get job details by ID
pub async fn get_job(
    State(registry): State<Arc<Registry>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Job>> {
    tracing::debug!("Getting job: {}", id);

    let job = registry.get(id)?;
    Ok(Json(job))
}

/// PATCH /jobs/{id}/cancel
/// Request cancellation of a job
pub async fn cancel_job(
    State(registry): State<Arc<Registry>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tracing::info!("Canceling job: {}", id);

    registry.cancel(id)?;
    Ok(StatusCode::OK)
}
