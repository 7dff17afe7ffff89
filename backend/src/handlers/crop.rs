//! Crop handlers

use axum::{extract::State, Json};
use shared::{require_non_blank, ApiResponse, Crop, CropStats};

use super::extract::ApiPath;
use crate::error::{AppError, AppResult};
use crate::AppState;

/// Get crops of one type
pub async fn get_crops_by_type(
    State(state): State<AppState>,
    ApiPath(crop_type): ApiPath<String>,
) -> AppResult<Json<ApiResponse<Vec<Crop>>>> {
    let crop_type = require_non_blank(&crop_type)
        .ok_or_else(|| AppError::Validation("Crop type parameter is required".into()))?;

    let crops = state.crop_service().get_crops_by_type(crop_type).await?;
    Ok(Json(ApiResponse::ok(
        format!("Crops retrieved successfully for type: {}", crop_type),
        crops,
    )))
}

/// Get crop statistics
pub async fn get_crops_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CropStats>>> {
    let stats = state.crop_service().get_stats().await?;
    Ok(Json(ApiResponse::ok(
        "Crops statistics retrieved successfully",
        stats,
    )))
}
