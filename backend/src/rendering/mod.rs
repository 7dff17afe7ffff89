//! Report rendering
//!
//! Two renderers implement [`ReportRenderer`]:
//! - [`DelegatedRenderer`] hands PDF and spreadsheet output to the external
//!   rendering engine and degrades to the built-in documents per request when
//!   the engine fails or a template is missing.
//! - [`FallbackRenderer`] always produces the built-in HTML and CSV documents.
//!
//! Which one serves requests is decided once at startup by [`select_renderer`].

mod csv_fallback;
mod html_fallback;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::Utc;
use serde::Serialize;
use shared::ReportEnvelope;

use crate::config::ReportEngineConfig;
use crate::error::{AppError, AppResult};
use crate::external::ReportEngineClient;

pub use csv_fallback::render_csv;
pub use html_fallback::render_html;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

const FILE_STEM: &str = "crops-report";

/// Output format requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Pdf,
    Xlsx,
}

/// Which path produced a rendered document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderSource {
    Engine,
    Fallback,
}

/// A rendered document ready to be sent to the client
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub content: Bytes,
    pub content_type: String,
    pub file_name: String,
    pub source: RenderSource,
}

impl RenderedReport {
    fn fallback(content: impl Into<Bytes>, content_type: &str, extension: &str) -> Self {
        Self {
            content: content.into(),
            content_type: content_type.to_string(),
            file_name: format!("{}.{}", FILE_STEM, extension),
            source: RenderSource::Fallback,
        }
    }

    pub fn message(&self, format: ReportFormat) -> &'static str {
        match (format, self.source) {
            (ReportFormat::Json, _) => "Report data retrieved successfully",
            (ReportFormat::Pdf, RenderSource::Engine) => "PDF report generated successfully",
            (ReportFormat::Pdf, RenderSource::Fallback) => {
                "HTML report generated (rendering engine unavailable, using fallback)"
            }
            (ReportFormat::Xlsx, RenderSource::Engine) => "Excel report generated successfully",
            (ReportFormat::Xlsx, RenderSource::Fallback) => {
                "CSV report generated (rendering engine unavailable, using fallback)"
            }
        }
    }
}

/// Turns a report envelope into a downloadable document
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Short name used in logs and the health endpoint
    fn name(&self) -> &'static str;

    async fn render(
        &self,
        envelope: &ReportEnvelope,
        format: ReportFormat,
    ) -> AppResult<RenderedReport>;
}

/// Renders with the built-in HTML and CSV documents only
#[derive(Debug, Clone, Default)]
pub struct FallbackRenderer;

impl FallbackRenderer {
    fn render_now(&self, envelope: &ReportEnvelope, format: ReportFormat) -> AppResult<RenderedReport> {
        match format {
            ReportFormat::Json => {
                let body = serde_json::to_vec(envelope)
                    .map_err(|e| AppError::Render(format!("JSON serialization error: {}", e)))?;
                Ok(RenderedReport::fallback(body, JSON_CONTENT_TYPE, "json"))
            }
            ReportFormat::Pdf => {
                let html = render_html(envelope, Utc::now());
                Ok(RenderedReport::fallback(html, HTML_CONTENT_TYPE, "html"))
            }
            ReportFormat::Xlsx => {
                let csv = render_csv(envelope)?;
                Ok(RenderedReport::fallback(csv, CSV_CONTENT_TYPE, "csv"))
            }
        }
    }
}

#[async_trait]
impl ReportRenderer for FallbackRenderer {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn render(
        &self,
        envelope: &ReportEnvelope,
        format: ReportFormat,
    ) -> AppResult<RenderedReport> {
        self.render_now(envelope, format)
    }
}

/// Renders PDF and spreadsheet output through the external engine
#[derive(Clone)]
pub struct DelegatedRenderer {
    client: ReportEngineClient,
    pdf_template: String,
    excel_template: String,
    fallback: FallbackRenderer,
}

impl DelegatedRenderer {
    pub fn new(
        client: ReportEngineClient,
        pdf_template: impl Into<String>,
        excel_template: impl Into<String>,
    ) -> Self {
        Self {
            client,
            pdf_template: pdf_template.into(),
            excel_template: excel_template.into(),
            fallback: FallbackRenderer,
        }
    }

    fn template_for(&self, format: ReportFormat) -> Option<(&str, &'static str)> {
        match format {
            ReportFormat::Json => None,
            ReportFormat::Pdf => Some((self.pdf_template.as_str(), "pdf")),
            ReportFormat::Xlsx => Some((self.excel_template.as_str(), "xlsx")),
        }
    }
}

#[async_trait]
impl ReportRenderer for DelegatedRenderer {
    fn name(&self) -> &'static str {
        "engine"
    }

    async fn render(
        &self,
        envelope: &ReportEnvelope,
        format: ReportFormat,
    ) -> AppResult<RenderedReport> {
        let Some((template, extension)) = self.template_for(format) else {
            return self.fallback.render_now(envelope, format);
        };

        match self.client.render(template, envelope).await {
            Ok(output) => {
                tracing::debug!(
                    "Rendered {} via engine ({} bytes, {})",
                    template,
                    output.content.len(),
                    output.content_type
                );
                Ok(RenderedReport {
                    content: output.content,
                    content_type: output.content_type,
                    file_name: format!("{}.{}", FILE_STEM, extension),
                    source: RenderSource::Engine,
                })
            }
            Err(e) => {
                tracing::warn!("Engine rendering of {} failed, using fallback: {}", template, e);
                self.fallback.render_now(envelope, format)
            }
        }
    }
}

/// Probe the configured engine and pick the renderer for this process
pub async fn select_renderer(config: &ReportEngineConfig) -> Arc<dyn ReportRenderer> {
    let client = match ReportEngineClient::from_config(config) {
        Ok(Some(client)) => client,
        Ok(None) => {
            tracing::info!("No rendering engine configured, using fallback renderer");
            return Arc::new(FallbackRenderer);
        }
        Err(e) => {
            tracing::warn!("Rendering engine misconfigured, using fallback renderer: {}", e);
            return Arc::new(FallbackRenderer);
        }
    };

    match client.ping(config.probe_timeout()).await {
        Ok(()) => {
            tracing::info!("Rendering engine available at {}", client.base_url());
            Arc::new(DelegatedRenderer::new(
                client,
                config.pdf_template.clone(),
                config.excel_template.clone(),
            ))
        }
        Err(e) => {
            tracing::warn!(
                "Rendering engine at {} unavailable, using fallback renderer: {}",
                client.base_url(),
                e
            );
            Arc::new(FallbackRenderer)
        }
    }
}
