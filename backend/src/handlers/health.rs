//! Health check handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

pub const SERVICE_NAME: &str = "Crop Report API";

#[derive(Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub version: String,
    pub database: String,
    pub renderer: String,
}

/// Health check endpoint handler
///
/// Always answers 200 while the process is up; database reachability is
/// reported but does not fail the check, and the probe is bounded by
/// `database.ping_timeout_secs`.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ping_timeout = state.config.database.ping_timeout();
    let db_status = if state.crop_service().ping(ping_timeout).await {
        "connected"
    } else {
        "disconnected"
    };

    Json(HealthResponse {
        success: true,
        message: "Service is healthy".to_string(),
        timestamp: Utc::now(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status.to_string(),
        renderer: state.renderer.name().to_string(),
    })
}
