//! Garden plan models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A season's crop plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct GardenPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub year: i32,
    /// Container size used to derive plants per container
    pub container_volume_gallons: i32,
    pub created_at: DateTime<Utc>,
}

/// One variety within a plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PlanItem {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub seed_id: Uuid,
    pub num_containers: i32,
    /// Taken from the capacity table when not set
    pub plants_per_container: Option<i32>,
    pub is_direct_sow: bool,
}

/// Computed requirements for a plan item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanItemResult {
    pub plan_item_id: Uuid,
    pub seed_id: Uuid,
    pub variety_name: String,
    pub plants_per_container: i32,
    pub total_plants: i32,
    pub seeds_to_start: i32,
    pub seed_start_date: NaiveDate,
    /// Seeds missing from inventory to cover `seeds_to_start`
    pub seed_shortfall: i32,
}

/// Totals across all items of a plan
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanSummary {
    pub total_containers: i32,
    pub total_plants: i32,
    pub total_seeds_to_start: i32,
    pub items_short_of_seed: usize,
    pub earliest_seed_start: Option<NaiveDate>,
}
