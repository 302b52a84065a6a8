//! Database models for the Garden Tracker
//!
//! Re-exports the shared domain records (which map straight onto table rows)
//! and adds joined views used only by the API

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

pub use shared::models::*;

/// Seedling batch joined with its seed lot's names
#[derive(Debug, Clone, Serialize)]
pub struct SeedlingView {
    #[serde(flatten)]
    pub batch: SeedlingBatch,
    pub variety_name: String,
    pub plant_type: String,
    pub days_since_sown: i64,
    pub days_since_germination: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_to_germinate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_transplant: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_since_potted_up: Option<i64>,
    pub ready_for_pot_up: bool,
}

/// Plant joined with its seed lot and container names
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PlantSummaryRow {
    pub id: Uuid,
    pub plant_name: Option<String>,
    pub variety_name: String,
    pub plant_type: String,
    pub container_name: Option<String>,
    pub transplant_date: NaiveDate,
    pub expected_harvest_date: Option<NaiveDate>,
    pub status: PlantStatus,
}
