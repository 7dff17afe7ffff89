//! API index and unmatched-route handlers

use axum::{extract::OriginalUri, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use super::health::SERVICE_NAME;

/// List the available endpoints
pub async fn api_index() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /api/health",
            "reportData": "GET /api/report/data",
            "pdfReport": "GET /api/report/pdf",
            "excelReport": "GET /api/report/excel",
            "reportByPeriode": "GET /api/report/periode/:periode",
            "reportByUser": "GET /api/report/user/:user",
            "cropsByType": "GET /api/crops/type/:cropType",
            "cropsStats": "GET /api/crops/stats"
        },
        "queryParams": {
            "periode": "Filter by periode (e.g., 08-2025)",
            "user": "Filter by creator or last updater",
            "crop_type": "Filter by crop type",
            "variety": "Filter by variety",
            "is_perennial": "Filter by perennial flag (true or false)"
        }
    }))
}

/// Fallback for unmatched routes
pub async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Endpoint not found",
            "path": uri.path(),
        })),
    )
}
