//! Validation utilities for request parameters
//!
//! Every function here is pure; callers translate the returned messages into
//! client-facing validation errors.

use validator::Validate;

use crate::models::CropFilter;
use crate::types::ReportQuery;

// ============================================================================
// Periode
// ============================================================================

/// Extract the year from a `MM-YYYY` periode such as `08-2025`
pub fn parse_periode_year(periode: &str) -> Result<i32, &'static str> {
    let (month, year) = periode
        .trim()
        .split_once('-')
        .ok_or("Periode must use the MM-YYYY format")?;

    if month.len() != 2 || !month.chars().all(|c| c.is_ascii_digit()) {
        return Err("Periode month must be two digits");
    }
    let month: u32 = month.parse().map_err(|_| "Periode month must be two digits")?;
    if !(1..=12).contains(&month) {
        return Err("Periode month must be between 01 and 12");
    }

    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err("Periode year must be four digits");
    }
    year.parse().map_err(|_| "Periode year must be four digits")
}

// ============================================================================
// General Validations
// ============================================================================

/// Parse a boolean query flag (`true`/`false`/`1`/`0`, case-insensitive)
pub fn parse_bool_flag(value: &str) -> Result<bool, &'static str> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err("is_perennial must be true or false"),
    }
}

/// Require a path parameter that is not empty or whitespace
pub fn require_non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Validate report query parameters and convert them into store predicates
pub fn validate_report_query(query: &ReportQuery) -> Result<CropFilter, String> {
    query.validate().map_err(|e| e.to_string())?;

    let created_year = query
        .periode()
        .map(parse_periode_year)
        .transpose()
        .map_err(str::to_string)?;
    let is_perennial = query
        .is_perennial()
        .map(parse_bool_flag)
        .transpose()
        .map_err(str::to_string)?;

    Ok(CropFilter {
        crop_type: query.crop_type().map(str::to_string),
        variety: query.variety().map(str::to_string),
        is_perennial,
        created_year,
        user: query.user().map(str::to_string),
    })
}
