//! Date rules for seed starting, transplanting and harvest estimates
//!
//! All offsets are whole weeks or whole days. Nothing here reads the clock;
//! callers pass "today" in explicitly.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{GardenError, GardenResult};
use crate::models::SeedLot;

/// Weeks after last frost that seed lots are projected to be transplanted
pub const DEFAULT_TRANSPLANT_OFFSET_WEEKS: i32 = 2;

/// `transplant_target − weeks_to_transplant` weeks
pub fn seed_start_date(transplant_target: NaiveDate, weeks_to_transplant: i32) -> NaiveDate {
    transplant_target - Duration::weeks(i64::from(weeks_to_transplant))
}

/// `transplant_date + days_to_maturity` days
///
/// Nothing when maturity is unknown or the date falls outside the calendar.
pub fn harvest_estimate(transplant_date: NaiveDate, days_to_maturity: Option<i32>) -> Option<NaiveDate> {
    days_to_maturity.and_then(|days| transplant_date.checked_add_signed(Duration::days(i64::from(days))))
}

/// `last_frost + offset_weeks` weeks; a negative offset lands before last frost
pub fn transplant_target(last_frost: NaiveDate, offset_weeks: i32) -> NaiveDate {
    last_frost + Duration::weeks(i64::from(offset_weeks))
}

/// When a batch sown on `sown_date` should be ready to go out
pub fn expected_transplant_date(sown_date: NaiveDate, weeks_to_transplant: i32) -> NaiveDate {
    sown_date + Duration::weeks(i64::from(weeks_to_transplant))
}

/// Signed day count from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn days_since(date: NaiveDate, today: NaiveDate) -> i64 {
    days_between(date, today)
}

pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    days_between(today, date)
}

/// Succession sowings every `interval_weeks` after `first_start`, strictly before `until`
pub fn succession_dates(first_start: NaiveDate, interval_weeks: i32, until: NaiveDate) -> Vec<NaiveDate> {
    if interval_weeks <= 0 {
        return Vec::new();
    }
    let step = Duration::weeks(i64::from(interval_weeks));
    std::iter::successors(Some(first_start + step), |date| Some(*date + step))
        .take_while(|date| *date < until)
        .collect()
}

/// Derived dates for one seed lot against a transplant target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedSchedule {
    pub seed_start_date: NaiveDate,
    pub transplant_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harvest_date: Option<NaiveDate>,
}

pub fn compute_seed_schedule(seed: &SeedLot, transplant_target: NaiveDate) -> SeedSchedule {
    SeedSchedule {
        seed_start_date: seed_start_date(transplant_target, seed.weeks_to_transplant),
        transplant_date: transplant_target,
        harvest_date: harvest_estimate(transplant_target, seed.days_to_maturity),
    }
}

/// A month and day without a year, e.g. a frost date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    /// Parse an `MM-DD` string
    pub fn parse(value: &str) -> GardenResult<Self> {
        let invalid = || GardenError::validation("frost_date", format!("expected MM-DD, got '{}'", value));

        let (month, day) = value.trim().split_once('-').ok_or_else(invalid)?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let day: u32 = day.parse().map_err(|_| invalid())?;

        // 2000 is a leap year so 02-29 is accepted here and checked per year later
        NaiveDate::from_ymd_opt(2000, month, day).ok_or_else(invalid)?;
        Ok(Self { month, day })
    }

    pub fn in_year(&self, year: i32) -> GardenResult<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).ok_or_else(|| {
            GardenError::validation(
                "frost_date",
                format!("{:02}-{:02} does not exist in {}", self.month, self.day, year),
            )
        })
    }
}

/// Configured last/first frost dates, resolved per calendar year
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrostDates {
    pub last_frost: MonthDay,
    pub first_frost: MonthDay,
}

/// Frost dates of one season
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonFrostDates {
    pub year: i32,
    pub last_frost: NaiveDate,
    pub first_frost: NaiveDate,
}

impl Default for FrostDates {
    /// April 15 / October 15
    fn default() -> Self {
        Self {
            last_frost: MonthDay { month: 4, day: 15 },
            first_frost: MonthDay { month: 10, day: 15 },
        }
    }
}

impl FrostDates {
    pub fn parse(last_frost: &str, first_frost: &str) -> GardenResult<Self> {
        Ok(Self {
            last_frost: MonthDay::parse(last_frost)?,
            first_frost: MonthDay::parse(first_frost)?,
        })
    }

    pub fn for_year(&self, year: i32) -> GardenResult<SeasonFrostDates> {
        Ok(SeasonFrostDates {
            year,
            last_frost: self.last_frost.in_year(year)?,
            first_frost: self.first_frost.in_year(year)?,
        })
    }

    pub fn for_date(&self, date: NaiveDate) -> GardenResult<SeasonFrostDates> {
        self.for_year(date.year())
    }
}
