//! Report rendering engine client
//!
//! Talks to a jsreport-compatible server: templates are looked up by name and
//! rendered against arbitrary JSON data. Template authoring and storage are
//! the engine's business; this client only pings and renders.

use axum::body::Bytes;
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::config::ReportEngineConfig;

/// Errors raised while talking to the rendering engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Engine returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Engine request timed out")]
    Timeout,

    #[error("Engine request failed: {0}")]
    Transport(String),

    #[error("Invalid engine configuration: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            EngineError::Timeout
        } else {
            EngineError::Transport(e.to_string())
        }
    }
}

/// A document produced by the engine
#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub content: Bytes,
    pub content_type: String,
}

/// Render request body
#[derive(Debug, Serialize)]
struct RenderRequest<'a, T: Serialize> {
    template: TemplateRef<'a>,
    data: &'a T,
}

#[derive(Debug, Serialize)]
struct TemplateRef<'a> {
    name: &'a str,
}

/// Client for the rendering engine HTTP API
#[derive(Clone)]
pub struct ReportEngineClient {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl ReportEngineClient {
    /// Build a client from configuration; `None` when no engine URL is configured
    pub fn from_config(config: &ReportEngineConfig) -> Result<Option<Self>, EngineError> {
        let Some(url) = config.url.as_deref().filter(|u| !u.trim().is_empty()) else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| EngineError::Configuration(e.to_string()))?;

        Ok(Some(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        }))
    }

    /// Create a client against an explicit base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: None,
            password: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(username, self.password.as_deref()),
            None => request,
        }
    }

    /// Check that the engine is up and answering
    pub async fn ping(&self, timeout: std::time::Duration) -> Result<(), EngineError> {
        let url = format!("{}/api/ping", self.base_url);

        let response = self
            .authorize(self.client.get(&url))
            .timeout(timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Status { status, body });
        }

        Ok(())
    }

    /// Render the named template against `data`
    pub async fn render<T: Serialize>(
        &self,
        template_name: &str,
        data: &T,
    ) -> Result<EngineOutput, EngineError> {
        let url = format!("{}/api/report", self.base_url);
        let body = RenderRequest {
            template: TemplateRef {
                name: template_name,
            },
            data,
        };

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if status == StatusCode::NOT_FOUND
                || text.contains("Unable to find specified template")
            {
                return Err(EngineError::TemplateNotFound(template_name.to_string()));
            }
            return Err(EngineError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let content = response.bytes().await?;

        Ok(EngineOutput {
            content,
            content_type,
        })
    }
}
