//! Common types used across the service

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Standard JSON body shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Query parameters accepted by the report endpoints
///
/// Values arrive as raw strings; blank values are treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReportQuery {
    #[validate(length(max = 7))]
    pub periode: Option<String>,
    #[validate(length(max = 255))]
    pub user: Option<String>,
    #[validate(length(max = 255))]
    pub crop_type: Option<String>,
    #[validate(length(max = 255))]
    pub variety: Option<String>,
    pub is_perennial: Option<String>,
}

impl ReportQuery {
    /// Periode to echo in the report header, if the caller supplied one
    pub fn periode(&self) -> Option<&str> {
        non_blank(&self.periode)
    }

    /// User to echo in the report header, if the caller supplied one
    pub fn user(&self) -> Option<&str> {
        non_blank(&self.user)
    }

    pub fn crop_type(&self) -> Option<&str> {
        non_blank(&self.crop_type)
    }

    pub fn variety(&self) -> Option<&str> {
        non_blank(&self.variety)
    }

    pub fn is_perennial(&self) -> Option<&str> {
        non_blank(&self.is_perennial)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
