//! Common types used across the tracker

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date range for queries, inclusive on both ends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Range of `days` days beginning at `start` (so `days = 14` covers start..start+13)
    pub fn starting_at(start: NaiveDate, days: u32) -> Option<Self> {
        if days == 0 {
            return None;
        }
        let end = start + chrono::Duration::days(i64::from(days) - 1);
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Units a harvest amount can be recorded in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "VARCHAR", rename_all = "lowercase")
)]
pub enum HarvestUnit {
    #[default]
    Oz,
    Lbs,
    Count,
}

impl HarvestUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarvestUnit::Oz => "oz",
            HarvestUnit::Lbs => "lbs",
            HarvestUnit::Count => "count",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "oz" => Some(HarvestUnit::Oz),
            "lbs" => Some(HarvestUnit::Lbs),
            "count" => Some(HarvestUnit::Count),
            _ => None,
        }
    }
}
