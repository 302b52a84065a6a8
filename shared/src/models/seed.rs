//! Seed inventory models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weeks from sowing to transplant when a seed lot does not say otherwise
pub const DEFAULT_WEEKS_TO_TRANSPLANT: i32 = 6;

/// A lot of seeds of one variety held in inventory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SeedLot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub variety_name: String,
    /// Plant type (tomato, pepper, herb, ...)
    pub plant_type: String,
    /// Seeds on hand, never negative
    pub quantity: i32,
    pub purchase_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    /// Germination rate as a percentage (0-100)
    pub germination_rate: Option<Decimal>,
    pub supplier: Option<String>,
    /// Days from transplant to first harvest
    pub days_to_maturity: Option<i32>,
    /// Weeks from sowing to transplant
    pub weeks_to_transplant: i32,
    pub size_category: SizeCategory,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Mature plant size, drives container capacity and spacing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "VARCHAR", rename_all = "lowercase")
)]
pub enum SizeCategory {
    Compact,
    #[default]
    Medium,
    Large,
}

impl SizeCategory {
    pub const ALL: [SizeCategory; 3] = [
        SizeCategory::Compact,
        SizeCategory::Medium,
        SizeCategory::Large,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeCategory::Compact => "compact",
            SizeCategory::Medium => "medium",
            SizeCategory::Large => "large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "compact" => Some(SizeCategory::Compact),
            "medium" => Some(SizeCategory::Medium),
            "large" => Some(SizeCategory::Large),
            _ => None,
        }
    }

    /// Parse a stored category, treating anything unrecognized as medium
    pub fn from_str_lossy(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }
}

impl std::fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SeedLot {
    pub fn has_stock(&self) -> bool {
        self.quantity > 0
    }
}
