//! Crop data access
//!
//! Read-only queries against the `crops` table. Every round trip is bounded
//! by the configured statement timeout, and failures come back as
//! [`AppError::Database`] or [`AppError::Timeout`] carrying the driver message.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::{AppError, AppResult};
use crate::models::{Crop, CropFilter, CropStats};

/// Columns selected for every crop query, in `CropRow` order
const CROP_COLUMNS: &str = r#"
    id, name, crop_type, variety, start_method, germination_rate, seed_per_cell,
    light_profile, soil_condition, days_to_emerge, plant_spacing, row_spacing,
    planting_depth, average_height, days_to_flower, days_to_maturity, harvest_window,
    loss_rate, harvest_unit, estimated_revenue, expected_yield, planting_details,
    pruning_details, botanical_name, is_perennial, auto_create_tasks,
    created_at, updated_at, created_by, updated_by
"#;

const CROP_ORDER: &str = " ORDER BY name ASC, id ASC";

/// Crop service for reading crop records
#[derive(Clone)]
pub struct CropService {
    db: PgPool,
    statement_timeout: Duration,
}

/// Database row for a crop
#[derive(Debug, Clone, sqlx::FromRow)]
struct CropRow {
    pub id: i32,
    pub name: String,
    pub crop_type: Option<String>,
    pub variety: Option<String>,
    pub start_method: Option<String>,
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
    pub harvest_window: Option<i32>,
    pub loss_rate: Option<Decimal>,
    pub harvest_unit: Option<String>,
    pub estimated_revenue: Option<Decimal>,
    pub expected_yield: Option<Decimal>,
    pub planting_details: Option<String>,
    pub pruning_details: Option<String>,
    pub botanical_name: Option<String>,
    pub is_perennial: bool,
    pub auto_create_tasks: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

impl From<CropRow> for Crop {
    fn from(row: CropRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            crop_type: row.crop_type,
            variety: row.variety,
            botanical_name: row.botanical_name,
            start_method: row.start_method,
            germination_rate: row.germination_rate,
            seed_per_cell: row.seed_per_cell,
            light_profile: row.light_profile,
            soil_condition: row.soil_condition,
            days_to_emerge: row.days_to_emerge,
            plant_spacing: row.plant_spacing,
            row_spacing: row.row_spacing,
            planting_depth: row.planting_depth,
            average_height: row.average_height,
            days_to_flower: row.days_to_flower,
            days_to_maturity: row.days_to_maturity,
            harvest_window: row.harvest_window,
            loss_rate: row.loss_rate,
            harvest_unit: row.harvest_unit,
            estimated_revenue: row.estimated_revenue,
            expected_yield: row.expected_yield,
            planting_details: row.planting_details,
            pruning_details: row.pruning_details,
            is_perennial: row.is_perennial,
            auto_create_tasks: row.auto_create_tasks,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
        }
    }
}

/// Database row for table-wide statistics
#[derive(Debug, Clone, sqlx::FromRow)]
struct CropStatsRow {
    pub total_crops: i64,
    pub perennial_crops: i64,
    pub annual_crops: i64,
    pub avg_yield: Option<Decimal>,
    pub total_revenue: Option<Decimal>,
}

impl From<CropStatsRow> for CropStats {
    fn from(row: CropStatsRow) -> Self {
        Self {
            total_crops: row.total_crops,
            perennial_crops: row.perennial_crops,
            annual_crops: row.annual_crops,
            avg_yield: row.avg_yield,
            total_revenue: row.total_revenue,
        }
    }
}

/// Append `WHERE` before the first predicate and `AND` before the rest
fn push_predicate<'q, 'b>(
    qb: &'b mut QueryBuilder<'q, Postgres>,
    has_where: &mut bool,
) -> &'b mut QueryBuilder<'q, Postgres> {
    qb.push(if *has_where { " AND " } else { " WHERE " });
    *has_where = true;
    qb
}

/// Build the filtered crop SELECT; every value is a bound parameter
fn crop_query(filter: &CropFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM crops", CROP_COLUMNS));
    let mut has_where = false;

    if let Some(crop_type) = &filter.crop_type {
        push_predicate(&mut qb, &mut has_where)
            .push("crop_type = ")
            .push_bind(crop_type.clone());
    }
    if let Some(variety) = &filter.variety {
        push_predicate(&mut qb, &mut has_where)
            .push("variety = ")
            .push_bind(variety.clone());
    }
    if let Some(is_perennial) = filter.is_perennial {
        push_predicate(&mut qb, &mut has_where)
            .push("is_perennial = ")
            .push_bind(is_perennial);
    }
    if let Some(year) = filter.created_year {
        push_predicate(&mut qb, &mut has_where)
            .push("EXTRACT(YEAR FROM created_at)::int = ")
            .push_bind(year);
    }
    if let Some(user) = &filter.user {
        push_predicate(&mut qb, &mut has_where)
            .push("(created_by = ")
            .push_bind(user.clone())
            .push(" OR updated_by = ")
            .push_bind(user.clone())
            .push(")");
    }

    qb.push(CROP_ORDER);
    qb
}

impl CropService {
    /// Create a new CropService instance
    pub fn new(db: PgPool, statement_timeout: Duration) -> Self {
        Self {
            db,
            statement_timeout,
        }
    }

    /// Run a query future under the statement timeout
    async fn bounded<T, F>(&self, what: &str, query: F) -> AppResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.statement_timeout, query).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::error!("Database error while {}: {}", what, e);
                Err(AppError::Database(e))
            }
            Err(_) => {
                tracing::error!(
                    "Database query timed out after {:?} while {}",
                    self.statement_timeout,
                    what
                );
                Err(AppError::Timeout(format!(
                    "Database query timed out while {}",
                    what
                )))
            }
        }
    }

    /// Get crops matching every predicate in the filter, ordered by name
    pub async fn get_crops(&self, filter: &CropFilter) -> AppResult<Vec<Crop>> {
        let mut qb = crop_query(filter);
        let rows = self
            .bounded(
                "fetching crops",
                qb.build_query_as::<CropRow>().fetch_all(&self.db),
            )
            .await?;

        tracing::debug!("Fetched {} crops with filter {:?}", rows.len(), filter);
        Ok(rows.into_iter().map(Crop::from).collect())
    }

    /// Get all crops of one type, ordered by name
    pub async fn get_crops_by_type(&self, crop_type: &str) -> AppResult<Vec<Crop>> {
        let filter = CropFilter {
            crop_type: Some(crop_type.to_string()),
            ..Default::default()
        };
        self.get_crops(&filter).await
    }

    /// Get table-wide crop statistics
    pub async fn get_stats(&self) -> AppResult<CropStats> {
        let row = self
            .bounded(
                "computing crop statistics",
                sqlx::query_as::<_, CropStatsRow>(
                    r#"
                    SELECT
                        COUNT(*) AS total_crops,
                        COUNT(*) FILTER (WHERE is_perennial) AS perennial_crops,
                        COUNT(*) FILTER (WHERE NOT is_perennial) AS annual_crops,
                        AVG(expected_yield) AS avg_yield,
                        SUM(estimated_revenue) AS total_revenue
                    FROM crops
                    "#,
                )
                .fetch_one(&self.db),
            )
            .await?;

        Ok(row.into())
    }

    /// Check database connectivity, giving up after `timeout`
    pub async fn ping(&self, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, sqlx::query("SELECT 1").execute(&self.db)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::warn!("Database ping failed: {}", e);
                false
            }
            Err(_) => {
                tracing::warn!("Database ping timed out after {:?}", timeout);
                false
            }
        }
    }
}
