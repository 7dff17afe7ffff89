//! Route definitions for the Crop Report Service

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::api_index))
        // Health check
        .route("/health", get(handlers::health_check))
        // Report routes
        .nest("/report", report_routes())
        // Crop routes
        .nest("/crops", crop_routes())
}

/// Report routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/data", get(handlers::get_report_data))
        .route("/pdf", get(handlers::generate_pdf_report))
        .route("/excel", get(handlers::generate_excel_report))
        .route("/periode/:periode", get(handlers::get_report_by_periode))
        .route("/user/:user", get(handlers::get_report_by_user))
}

/// Crop routes
fn crop_routes() -> Router<AppState> {
    Router::new()
        .route("/type/:crop_type", get(handlers::get_crops_by_type))
        .route("/stats", get(handlers::get_crops_stats))
}
