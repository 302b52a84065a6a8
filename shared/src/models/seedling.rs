//! Seedling batch models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::{days_between, days_since, days_until};

/// A batch of seeds sown together and tracked until transplant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SeedlingBatch {
    pub id: Uuid,
    pub user_id: Uuid,
    pub seed_id: Uuid,
    pub sown_date: NaiveDate,
    /// Absent until the batch has sprouted
    pub germination_date: Option<NaiveDate>,
    pub quantity_started: i32,
    pub quantity_viable: Option<i32>,
    pub expected_transplant_date: Option<NaiveDate>,
    pub actual_transplant_date: Option<NaiveDate>,
    pub potted_up_date: Option<NaiveDate>,
    /// e.g. "3 inch", "4 inch"
    pub pot_size: Option<String>,
    pub quantity_potted_up: Option<i32>,
    /// Indoor location while growing
    pub location: Option<String>,
    pub status: SeedlingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A batch about to be inserted, produced by the ledger at sowing time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSeedlingBatch {
    pub seed_id: Uuid,
    pub sown_date: NaiveDate,
    pub germination_date: Option<NaiveDate>,
    pub quantity_started: i32,
    pub quantity_viable: i32,
    pub expected_transplant_date: NaiveDate,
    pub location: Option<String>,
    pub status: SeedlingStatus,
    pub notes: Option<String>,
}

/// Lifecycle of a seedling batch
///
/// `germinating → growing → potted_up → ready → transplanted`, with `failed`
/// reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "VARCHAR", rename_all = "snake_case")
)]
pub enum SeedlingStatus {
    Germinating,
    Growing,
    PottedUp,
    Ready,
    Transplanted,
    Failed,
}

impl SeedlingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedlingStatus::Germinating => "germinating",
            SeedlingStatus::Growing => "growing",
            SeedlingStatus::PottedUp => "potted_up",
            SeedlingStatus::Ready => "ready",
            SeedlingStatus::Transplanted => "transplanted",
            SeedlingStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "germinating" => Some(SeedlingStatus::Germinating),
            "growing" => Some(SeedlingStatus::Growing),
            "potted_up" => Some(SeedlingStatus::PottedUp),
            "ready" => Some(SeedlingStatus::Ready),
            "transplanted" => Some(SeedlingStatus::Transplanted),
            "failed" => Some(SeedlingStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SeedlingStatus::Transplanted | SeedlingStatus::Failed)
    }

    /// Statuses shown in active seedling lists
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Batches that can be moved into the garden
    pub fn is_transplantable(&self) -> bool {
        matches!(self, SeedlingStatus::Ready | SeedlingStatus::PottedUp)
    }

    fn rank(&self) -> Option<u8> {
        match self {
            SeedlingStatus::Germinating => Some(0),
            SeedlingStatus::Growing => Some(1),
            SeedlingStatus::PottedUp => Some(2),
            SeedlingStatus::Ready => Some(3),
            SeedlingStatus::Transplanted => Some(4),
            SeedlingStatus::Failed => None,
        }
    }

    /// Whether a batch in this status may move to `next`
    ///
    /// Forward moves along the chain may skip steps; staying put is allowed
    /// for non-terminal statuses; terminal statuses never move.
    pub fn can_transition_to(&self, next: SeedlingStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), next.rank()) {
            (_, None) => true,
            (Some(from), Some(to)) => to >= from,
            (None, Some(_)) => false,
        }
    }
}

impl std::fmt::Display for SeedlingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SeedlingBatch {
    pub fn days_since_sown(&self, today: NaiveDate) -> i64 {
        days_since(self.sown_date, today)
    }

    /// Zero when the batch has not germinated yet
    pub fn days_since_germination(&self, today: NaiveDate) -> i64 {
        self.germination_date
            .map(|date| days_since(date, today))
            .unwrap_or(0)
    }

    pub fn days_to_germinate(&self) -> Option<i64> {
        self.germination_date
            .map(|date| days_between(self.sown_date, date))
    }

    pub fn days_until_transplant(&self, today: NaiveDate) -> Option<i64> {
        self.expected_transplant_date
            .map(|date| days_until(date, today))
    }

    pub fn days_since_potted_up(&self, today: NaiveDate) -> Option<i64> {
        self.potted_up_date.map(|date| days_since(date, today))
    }

    /// Seedlings that can still be transplanted out of this batch
    pub fn available_quantity(&self) -> i32 {
        match self.quantity_potted_up {
            Some(potted) if potted != 0 => potted,
            _ => self.quantity_viable.unwrap_or(0),
        }
    }
}
