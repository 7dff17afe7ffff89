//! Rendering engine delegation tests
//!
//! The engine is stood in for by a wiremock server speaking the
//! `/api/ping` and `/api/report` endpoints.

use std::time::Duration;

use crop_report::{
    config::ReportEngineConfig,
    external::{EngineError, ReportEngineClient},
    rendering::{
        select_renderer, DelegatedRenderer, RenderSource, ReportFormat, ReportRenderer,
        CSV_CONTENT_TYPE, HTML_CONTENT_TYPE, XLSX_CONTENT_TYPE,
    },
};
use serde_json::json;
use shared::{build_report, Crop, ReportEnvelope};
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn envelope() -> ReportEnvelope {
    let crops = vec![
        Crop {
            id: 1,
            name: "Kopi".to_string(),
            is_perennial: true,
            ..Default::default()
        },
        Crop {
            id: 2,
            name: "Sawi".to_string(),
            ..Default::default()
        },
    ];
    build_report(&crops, Some("08-2025"), Some("tester"))
}

fn delegated(server: &MockServer) -> DelegatedRenderer {
    DelegatedRenderer::new(
        ReportEngineClient::with_base_url(server.uri()),
        "crops-report-pdf",
        "crops-report-excel",
    )
}

#[tokio::test]
async fn test_engine_pdf_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/report"))
        .and(body_partial_json(json!({
            "template": { "name": "crops-report-pdf" },
            "data": { "code": "KNRKKP008", "user": "tester" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.7 test".to_vec(), "application/pdf"))
        .expect(1)
        .mount(&server)
        .await;

    let report = delegated(&server)
        .render(&envelope(), ReportFormat::Pdf)
        .await
        .unwrap();

    assert_eq!(report.source, RenderSource::Engine);
    assert_eq!(report.content_type, "application/pdf");
    assert_eq!(report.file_name, "crops-report.pdf");
    assert_eq!(&report.content[..], b"%PDF-1.7 test");
}

#[tokio::test]
async fn test_engine_xlsx_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/report"))
        .and(body_partial_json(json!({ "template": { "name": "crops-report-excel" } })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"PK\x03\x04".to_vec(), XLSX_CONTENT_TYPE))
        .mount(&server)
        .await;

    let report = delegated(&server)
        .render(&envelope(), ReportFormat::Xlsx)
        .await
        .unwrap();

    assert_eq!(report.source, RenderSource::Engine);
    assert_eq!(report.content_type, XLSX_CONTENT_TYPE);
    assert_eq!(report.file_name, "crops-report.xlsx");
}

#[tokio::test]
async fn test_missing_template_falls_back_to_html() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/report"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Unable to find specified template"))
        .mount(&server)
        .await;

    let report = delegated(&server)
        .render(&envelope(), ReportFormat::Pdf)
        .await
        .unwrap();

    assert_eq!(report.source, RenderSource::Fallback);
    assert_eq!(report.content_type, HTML_CONTENT_TYPE);
    let html = std::str::from_utf8(&report.content).unwrap();
    assert!(html.contains("Kopi"));
    assert!(html.contains("Total Tanaman: 2"));
}

#[tokio::test]
async fn test_engine_error_falls_back_to_csv() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/report"))
        .respond_with(ResponseTemplate::new(500).set_body_string("chrome crashed"))
        .mount(&server)
        .await;

    let report = delegated(&server)
        .render(&envelope(), ReportFormat::Xlsx)
        .await
        .unwrap();

    assert_eq!(report.source, RenderSource::Fallback);
    assert_eq!(report.content_type, CSV_CONTENT_TYPE);
    assert_eq!(std::str::from_utf8(&report.content).unwrap().lines().count(), 3);
}

#[tokio::test]
async fn test_json_never_calls_engine() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = delegated(&server)
        .render(&envelope(), ReportFormat::Json)
        .await
        .unwrap();

    assert_eq!(report.source, RenderSource::Fallback);
    let parsed: ReportEnvelope = serde_json::from_slice(&report.content).unwrap();
    assert_eq!(parsed, envelope());
}

#[tokio::test]
async fn test_client_classifies_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/report"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ReportEngineClient::with_base_url(server.uri());
    let err = client.render("missing", &json!({})).await.unwrap_err();

    assert!(matches!(err, EngineError::TemplateNotFound(name) if name == "missing"));
}

#[tokio::test]
async fn test_probe_selects_engine_when_reachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = ReportEngineConfig {
        url: Some(server.uri()),
        ..Default::default()
    };
    let renderer = select_renderer(&config).await;

    assert_eq!(renderer.name(), "engine");
}

#[tokio::test]
async fn test_probe_selects_fallback_when_unreachable() {
    let config = ReportEngineConfig {
        url: Some("http://127.0.0.1:1".to_string()),
        probe_timeout_secs: 1,
        ..Default::default()
    };
    let renderer = select_renderer(&config).await;

    assert_eq!(renderer.name(), "fallback");
}

#[tokio::test]
async fn test_probe_selects_fallback_when_ping_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ReportEngineClient::with_base_url(server.uri());
    let err = client.ping(Duration::from_secs(1)).await.unwrap_err();
    assert!(matches!(err, EngineError::Status { status: 503, .. }));

    let config = ReportEngineConfig {
        url: Some(server.uri()),
        ..Default::default()
    };
    assert_eq!(select_renderer(&config).await.name(), "fallback");
}
