//! Harvest models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::HarvestUnit;

/// A harvest taken from one plant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct HarvestEvent {
    pub id: Uuid,
    pub plant_id: Uuid,
    pub harvest_date: NaiveDate,
    /// Weight or count, depending on `unit`
    pub amount: Decimal,
    pub unit: HarvestUnit,
    /// 1-10 scale
    pub quality_rating: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Yield totals for a set of harvests
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct YieldTotals {
    pub total_yield: Decimal,
    pub harvest_count: usize,
}

impl YieldTotals {
    pub fn from_harvests<'a>(harvests: impl IntoIterator<Item = &'a HarvestEvent>) -> Self {
        harvests
            .into_iter()
            .fold(YieldTotals::default(), |mut acc, harvest| {
                acc.total_yield += harvest.amount;
                acc.harvest_count += 1;
                acc
            })
    }

    /// Average yield across `plant_count` plants, zero when there are none
    pub fn average_per_plant(&self, plant_count: usize) -> Decimal {
        if plant_count == 0 {
            Decimal::ZERO
        } else {
            self.total_yield / Decimal::from(plant_count)
        }
    }
}
