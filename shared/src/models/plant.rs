//! Plant models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::days_since;

/// A single plant growing in the garden
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PlantRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub seed_id: Uuid,
    pub seedling_id: Option<Uuid>,
    pub container_id: Option<Uuid>,
    /// Custom name for this specific plant
    pub plant_name: Option<String>,
    pub transplant_date: NaiveDate,
    pub expected_harvest_date: Option<NaiveDate>,
    pub first_harvest_date: Option<NaiveDate>,
    pub last_harvest_date: Option<NaiveDate>,
    pub status: PlantStatus,
    /// 1-10 scale
    pub health_rating: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "VARCHAR", rename_all = "snake_case")
)]
pub enum PlantStatus {
    #[default]
    Growing,
    Flowering,
    Producing,
    Dormant,
    Dead,
}

impl PlantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantStatus::Growing => "growing",
            PlantStatus::Flowering => "flowering",
            PlantStatus::Producing => "producing",
            PlantStatus::Dormant => "dormant",
            PlantStatus::Dead => "dead",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "growing" => Some(PlantStatus::Growing),
            "flowering" => Some(PlantStatus::Flowering),
            "producing" => Some(PlantStatus::Producing),
            "dormant" => Some(PlantStatus::Dormant),
            "dead" => Some(PlantStatus::Dead),
            _ => None,
        }
    }

    /// Growing, flowering or producing
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PlantStatus::Growing | PlantStatus::Flowering | PlantStatus::Producing
        )
    }

    pub fn is_terminal(&self) -> bool {
        *self == PlantStatus::Dead
    }

    /// Any living plant keeps its spot in the container
    pub fn occupies_container(&self) -> bool {
        !self.is_terminal()
    }

    pub const ACTIVE: [PlantStatus; 3] = [
        PlantStatus::Growing,
        PlantStatus::Flowering,
        PlantStatus::Producing,
    ];
}

impl std::fmt::Display for PlantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PlantRecord {
    pub fn days_since_transplant(&self, today: NaiveDate) -> i64 {
        days_since(self.transplant_date, today)
    }
}

/// Growth observation for a plant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProgressLog {
    pub id: Uuid,
    pub plant_id: Uuid,
    pub log_date: NaiveDate,
    pub height_inches: Option<Decimal>,
    /// seedling, vegetative, flowering, fruiting
    pub growth_stage: Option<String>,
    pub observations: Option<String>,
    /// Pests, diseases, deficiencies
    pub issues: Option<String>,
    /// Fertilized, pruned, ...
    pub actions_taken: Option<String>,
    pub created_at: DateTime<Utc>,
}
