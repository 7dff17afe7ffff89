//! Error handling for the Crop Report Service
//!
//! Every error is rendered as `{success: false, message, data: null}`.
//! Store failures are business-level failures and map to 400; only faults
//! the service cannot attribute to the request map to 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ApiResponse;
use thiserror::Error;

/// Message returned for every 500 response
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Store errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Timed out: {0}")]
    Timeout(String),

    // Rendering errors (fallback construction failed)
    #[error("Render error: {0}")]
    Render(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Database(_) | AppError::Timeout(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Render(_) | AppError::Internal(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client
    pub fn client_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Timeout(msg) => msg.clone(),
            AppError::Database(e) => e.to_string(),
            AppError::Render(_) | AppError::Internal(_) | AppError::InternalError(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request failed: {}", self);
        }

        let body: ApiResponse<()> = ApiResponse::failure(self.client_message());
        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::Validation("Periode parameter is required".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "Periode parameter is required");
    }

    #[test]
    fn test_database_failure_is_business_failure() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.client_message().is_empty());
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = AppError::Internal("pool poisoned at 0xdead".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), INTERNAL_ERROR_MESSAGE);
    }
}
