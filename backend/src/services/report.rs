//! Report service: store query, envelope construction, and rendering

use std::sync::Arc;

use shared::{
    build_report, parse_periode_year, validate_report_query, CropFilter, ReportEnvelope,
    ReportQuery,
};

use crate::error::{AppError, AppResult};
use crate::rendering::{RenderedReport, ReportFormat, ReportRenderer};
use crate::services::CropService;

/// Report service
#[derive(Clone)]
pub struct ReportService {
    crops: CropService,
    renderer: Arc<dyn ReportRenderer>,
}

impl ReportService {
    pub fn new(crops: CropService, renderer: Arc<dyn ReportRenderer>) -> Self {
        Self { crops, renderer }
    }

    /// Build the envelope for the report endpoints' query parameters
    ///
    /// The periode and user are both used as filters and echoed in the header.
    pub async fn get_report_data(&self, query: &ReportQuery) -> AppResult<ReportEnvelope> {
        let filter = validate_report_query(query).map_err(AppError::Validation)?;
        let crops = self.crops.get_crops(&filter).await?;
        Ok(build_report(&crops, query.periode(), query.user()))
    }

    /// Build the envelope for crops created in the periode's year
    pub async fn get_report_by_periode(&self, periode: &str) -> AppResult<ReportEnvelope> {
        let year = parse_periode_year(periode).map_err(|e| AppError::Validation(e.to_string()))?;
        let filter = CropFilter {
            created_year: Some(year),
            ..Default::default()
        };
        let crops = self.crops.get_crops(&filter).await?;
        Ok(build_report(&crops, Some(periode), None))
    }

    /// Build the envelope for crops created or last updated by `user`
    pub async fn get_report_by_user(&self, user: &str) -> AppResult<ReportEnvelope> {
        let filter = CropFilter {
            user: Some(user.to_string()),
            ..Default::default()
        };
        let crops = self.crops.get_crops(&filter).await?;
        Ok(build_report(&crops, None, Some(user)))
    }

    /// Build the envelope and render it in the requested format
    pub async fn render_report(
        &self,
        query: &ReportQuery,
        format: ReportFormat,
    ) -> AppResult<RenderedReport> {
        let envelope = self.get_report_data(query).await?;
        let report = self.renderer.render(&envelope, format).await?;

        tracing::info!(
            "Rendered {:?} report with {} rows via {} ({})",
            format,
            envelope.datas.len(),
            self.renderer.name(),
            report.content_type
        );
        Ok(report)
    }
}
