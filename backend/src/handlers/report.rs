//! Report handlers: envelope as JSON and rendered documents

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use shared::{require_non_blank, ApiResponse, ReportEnvelope, ReportQuery};

use super::extract::{ApiPath, ApiQuery};
use crate::error::{AppError, AppResult};
use crate::rendering::{RenderedReport, ReportFormat};
use crate::AppState;

/// Send a rendered document as a download
fn attachment(report: RenderedReport) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", report.file_name);
    (
        [
            (header::CONTENT_TYPE, report.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.content,
    )
        .into_response()
}

/// Get report data (JSON)
pub async fn get_report_data(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Json<ApiResponse<ReportEnvelope>>> {
    let envelope = state.report_service().get_report_data(&query).await?;
    Ok(Json(ApiResponse::ok(
        "Report data retrieved successfully",
        envelope,
    )))
}

/// Generate the PDF report (HTML when the engine is unavailable)
pub async fn generate_pdf_report(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Response> {
    let report = state
        .report_service()
        .render_report(&query, ReportFormat::Pdf)
        .await?;
    tracing::debug!("{}", report.message(ReportFormat::Pdf));
    Ok(attachment(report))
}

/// Generate the Excel report (CSV when the engine is unavailable)
pub async fn generate_excel_report(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Response> {
    let report = state
        .report_service()
        .render_report(&query, ReportFormat::Xlsx)
        .await?;
    tracing::debug!("{}", report.message(ReportFormat::Xlsx));
    Ok(attachment(report))
}

/// Get report data for a `MM-YYYY` periode
pub async fn get_report_by_periode(
    State(state): State<AppState>,
    ApiPath(periode): ApiPath<String>,
) -> AppResult<Json<ApiResponse<ReportEnvelope>>> {
    let periode = require_non_blank(&periode)
        .ok_or_else(|| AppError::Validation("Periode parameter is required".into()))?;

    let envelope = state.report_service().get_report_by_periode(periode).await?;
    Ok(Json(ApiResponse::ok(
        format!("Crops data retrieved successfully for periode: {}", periode),
        envelope,
    )))
}

/// Get report data for crops created or updated by a user
pub async fn get_report_by_user(
    State(state): State<AppState>,
    ApiPath(user): ApiPath<String>,
) -> AppResult<Json<ApiResponse<ReportEnvelope>>> {
    let user = require_non_blank(&user)
        .ok_or_else(|| AppError::Validation("User parameter is required".into()))?;

    let envelope = state.report_service().get_report_by_user(user).await?;
    Ok(Json(ApiResponse::ok(
        format!("Crops data retrieved successfully for user: {}", user),
        envelope,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    use crate::rendering::{
        RenderSource, CSV_CONTENT_TYPE, HTML_CONTENT_TYPE, PDF_CONTENT_TYPE, XLSX_CONTENT_TYPE,
    };

    fn rendered(content_type: &str, file_name: &str, source: RenderSource) -> RenderedReport {
        RenderedReport {
            content: Bytes::from_static(b"report"),
            content_type: content_type.to_string(),
            file_name: file_name.to_string(),
            source,
        }
    }

    fn headers_of(report: RenderedReport) -> (String, String) {
        let response = attachment(report);
        let header_value = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        (
            header_value(header::CONTENT_TYPE),
            header_value(header::CONTENT_DISPOSITION),
        )
    }

    #[test]
    fn test_fallback_documents_download_as_html_and_csv() {
        let (content_type, disposition) =
            headers_of(rendered(HTML_CONTENT_TYPE, "crops-report.html", RenderSource::Fallback));
        assert_eq!(content_type, HTML_CONTENT_TYPE);
        assert_eq!(disposition, "attachment; filename=\"crops-report.html\"");

        let (content_type, disposition) =
            headers_of(rendered(CSV_CONTENT_TYPE, "crops-report.csv", RenderSource::Fallback));
        assert_eq!(content_type, CSV_CONTENT_TYPE);
        assert_eq!(disposition, "attachment; filename=\"crops-report.csv\"");
    }

    #[test]
    fn test_engine_documents_keep_engine_content_type() {
        let (content_type, disposition) =
            headers_of(rendered(PDF_CONTENT_TYPE, "crops-report.pdf", RenderSource::Engine));
        assert_eq!(content_type, PDF_CONTENT_TYPE);
        assert_eq!(disposition, "attachment; filename=\"crops-report.pdf\"");

        let (content_type, disposition) =
            headers_of(rendered(XLSX_CONTENT_TYPE, "crops-report.xlsx", RenderSource::Engine));
        assert_eq!(content_type, XLSX_CONTENT_TYPE);
        assert_eq!(disposition, "attachment; filename=\"crops-report.xlsx\"");
    }
}
