//! Health and service information endpoints

use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use jobhub_core::domain::service::ServiceInfo;
use serde_json::{Value, json};

use crate::info::ServiceInfoProvider;
use crate::registry::Registry;

/// GET /health
/// Reports liveness and the number of tracked jobs
pub async fn health_check(State(registry): State<Arc<Registry>>) -> Json<Value> {
    Json(json!({ "status": "ok", "jobs": registry.len() }))
}

/// GET /info
/// Service name, version and uptime
pub async fn service_info(
    Extension(provider): Extension<Arc<ServiceInfoProvider>>,
) -> Json<ServiceInfo> {
    Json(provider.info())
}
