//! Health check handler and response type.

use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use kendra_core::CloudProvider;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub service: String,
    /// Providers with a registered storage backend
    pub providers: Vec<CloudProvider>,
    pub default_provider: CloudProvider,
    pub timestamp: DateTime<Utc>,
}

/// Liveness plus the storage providers this instance can serve
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthCheckResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        service: state.service_name.clone(),
        providers: state.files.providers(),
        default_provider: state.files.default_provider(),
        timestamp: Utc::now(),
    })
}
