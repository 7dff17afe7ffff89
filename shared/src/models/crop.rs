//! Crop models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A crop record as stored in the `crops` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub id: i32,
    pub name: String,
    pub crop_type: Option<String>,
    pub variety: Option<String>,
    pub botanical_name: Option<String>,

    // Cultivation
    pub start_method: Option<String>,
    /// Germination rate in percent
    pub germination_rate: Option<Decimal>,
    pub seed_per_cell: Option<i32>,
    pub light_profile: Option<String>,
    pub soil_condition: Option<String>,
    pub days_to_emerge: Option<i32>,
    pub plant_spacing: Option<Decimal>,
    pub row_spacing: Option<Decimal>,
    pub planting_depth: Option<Decimal>,
    pub average_height: Option<Decimal>,
    pub days_to_flower: Option<i32>,
    pub days_to_maturity: Option<i32>,

    // Harvest
    /// Harvest window in days
    pub harvest_window: Option<i32>,
    /// Expected loss in percent
    pub loss_rate: Option<Decimal>,
    pub harvest_unit: Option<String>,
    pub estimated_revenue: Option<Decimal>,
    pub expected_yield: Option<Decimal>,

    pub planting_details: Option<String>,
    pub pruning_details: Option<String>,
    pub is_perennial: bool,
    pub auto_create_tasks: bool,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// Aggregate statistics over the whole `crops` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropStats {
    pub total_crops: i64,
    pub perennial_crops: i64,
    pub annual_crops: i64,
    /// Average of `expected_yield`, `None` when no crop has a yield
    pub avg_yield: Option<Decimal>,
    /// Sum of `estimated_revenue`, `None` when no crop has a revenue
    pub total_revenue: Option<Decimal>,
}

/// Optional predicates applied when selecting crops for a report
///
/// All present predicates are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CropFilter {
    pub crop_type: Option<String>,
    pub variety: Option<String>,
    pub is_perennial: Option<bool>,
    /// Creation year, derived from a `MM-YYYY` periode
    pub created_year: Option<i32>,
    /// Matches either `created_by` or `updated_by`
    pub user: Option<String>,
}

impl CropFilter {
    pub fn is_empty(&self) -> bool {
        self.crop_type.is_none()
            && self.variety.is_none()
            && self.is_perennial.is_none()
            && self.created_year.is_none()
            && self.user.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_is_empty() {
        assert!(CropFilter::default().is_empty());
    }

    #[test]
    fn test_filter_with_year_is_not_empty() {
        let filter = CropFilter {
            created_year: Some(2025),
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_crop_serializes_decimals_as_strings() {
        let crop = Crop {
            id: 7,
            name: "Tomat".to_string(),
            germination_rate: Some(Decimal::new(8550, 2)),
            ..Default::default()
        };
        let json = serde_json::to_value(&crop).unwrap();
        assert_eq!(json["germination_rate"], "85.50");
        assert_eq!(json["variety"], serde_json::Value::Null);
    }
}
