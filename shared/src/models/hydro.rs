//! Hydroponic system models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A hydroponic system feeding one or more hydro bags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct HydroSystem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// dwc, nft, kratky, drip, ...
    pub system_type: String,
    pub reservoir_gallons: Decimal,
    pub location: Option<String>,
    pub status: HydroSystemStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "VARCHAR", rename_all = "snake_case")
)]
pub enum HydroSystemStatus {
    #[default]
    Active,
    Maintenance,
    Offline,
}

impl HydroSystemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HydroSystemStatus::Active => "active",
            HydroSystemStatus::Maintenance => "maintenance",
            HydroSystemStatus::Offline => "offline",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(HydroSystemStatus::Active),
            "maintenance" => Some(HydroSystemStatus::Maintenance),
            "offline" => Some(HydroSystemStatus::Offline),
            _ => None,
        }
    }

    /// New plants may only go into a running system
    pub fn accepts_plants(&self) -> bool {
        *self == HydroSystemStatus::Active
    }
}

impl std::fmt::Display for HydroSystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// EC/pH reading of a nutrient solution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct NutrientReading {
    pub id: Uuid,
    pub system_id: Uuid,
    pub reading_date: NaiveDate,
    /// Electrical conductivity in mS/cm
    pub ec: Option<Decimal>,
    pub ph: Option<Decimal>,
    pub water_temp_f: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
