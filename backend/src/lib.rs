//! Crop Report Service - Backend
//!
//! Reads crop records from PostgreSQL, reshapes them into the crop
//! recapitulation report, and serves it as JSON, PDF/HTML, or Excel/CSV.

use std::{any::Any, sync::Arc};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{
    catch_panic::{CatchPanicLayer, ResponseForPanic},
    compression::CompressionLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod models;
pub mod rendering;
pub mod routes;
pub mod services;

pub use config::Config;

use error::INTERNAL_ERROR_MESSAGE;
use rendering::ReportRenderer;
use services::{CropService, ReportService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub renderer: Arc<dyn ReportRenderer>,
}

impl AppState {
    pub fn crop_service(&self) -> CropService {
        CropService::new(self.db.clone(), self.config.database.statement_timeout())
    }

    pub fn report_service(&self) -> ReportService {
        ReportService::new(self.crop_service(), self.renderer.clone())
    }
}

/// Turns a handler panic into the standard 500 body
#[derive(Clone)]
struct PanicResponder {
    expose_details: bool,
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "unknown panic".to_string()
        };
        tracing::error!("Handler panicked: {}", detail);

        let mut body = json!({
            "success": false,
            "message": INTERNAL_ERROR_MESSAGE,
            "data": null,
        });
        if self.expose_details {
            body["error"] = json!(detail);
        }

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let panic_responder = PanicResponder {
        expose_details: state.config.is_development(),
    };

    Router::new()
        .route("/", get(root))
        .nest("/api", routes::api_routes())
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(panic_responder))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Crop Report API v1.0"
}
