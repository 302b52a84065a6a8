//! Planting template models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule;

/// Pre-defined planting schedule for a plant type, relative to last frost
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PlantingTemplate {
    pub id: Uuid,
    pub plant_type: String,
    pub variety_name: Option<String>,
    /// When to start seeds indoors
    pub weeks_before_last_frost: Option<i32>,
    /// When to transplant outdoors (negative = before last frost)
    pub weeks_after_last_frost: Option<i32>,
    /// How often to start new seeds for continuous harvest
    pub succession_planting_weeks: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Dates a template resolves to for one season
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateSchedule {
    pub plant_type: String,
    pub variety_name: Option<String>,
    pub seed_start_date: NaiveDate,
    pub transplant_date: NaiveDate,
    pub succession_starts: Vec<NaiveDate>,
}

impl PlantingTemplate {
    /// The sign of `weeks_before_last_frost` is ignored; seeds always start before frost
    pub fn seed_start_date(&self, last_frost: NaiveDate) -> NaiveDate {
        let weeks = self.weeks_before_last_frost.unwrap_or(0).saturating_abs();
        schedule::seed_start_date(last_frost, weeks)
    }

    pub fn transplant_date(&self, last_frost: NaiveDate) -> NaiveDate {
        schedule::transplant_target(last_frost, self.weeks_after_last_frost.unwrap_or(0))
    }

    /// Resolve the template against a season's frost dates
    pub fn resolve(&self, last_frost: NaiveDate, first_frost: NaiveDate) -> TemplateSchedule {
        let seed_start_date = self.seed_start_date(last_frost);
        let succession_starts = self
            .succession_planting_weeks
            .map(|interval| schedule::succession_dates(seed_start_date, interval, first_frost))
            .unwrap_or_default();

        TemplateSchedule {
            plant_type: self.plant_type.clone(),
            variety_name: self.variety_name.clone(),
            seed_start_date,
            transplant_date: self.transplant_date(last_frost),
            succession_starts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lettuce(before: Option<i32>, after: Option<i32>, succession: Option<i32>) -> PlantingTemplate {
        PlantingTemplate {
            id: Uuid::nil(),
            plant_type: "lettuce".to_string(),
            variety_name: None,
            weeks_before_last_frost: before,
            weeks_after_last_frost: after,
            succession_planting_weeks: succession,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolve_with_succession() {
        let schedule = lettuce(Some(4), Some(-2), Some(3)).resolve(date(2024, 4, 15), date(2024, 10, 15));
        assert_eq!(schedule.seed_start_date, date(2024, 3, 18));
        assert_eq!(schedule.transplant_date, date(2024, 4, 1));
        assert_eq!(schedule.succession_starts.len(), 10);
        assert_eq!(schedule.succession_starts.first(), Some(&date(2024, 4, 8)));
        assert_eq!(schedule.succession_starts.last(), Some(&date(2024, 10, 14)));
    }

    #[test]
    fn test_negative_weeks_before_frost_still_start_early() {
        let template = lettuce(Some(-4), None, None);
        assert_eq!(template.seed_start_date(date(2024, 4, 15)), date(2024, 3, 18));
        assert_eq!(template.transplant_date(date(2024, 4, 15)), date(2024, 4, 15));
    }

    #[test]
    fn test_schedule_serializes_plain_dates() {
        let schedule = lettuce(Some(4), Some(-2), None).resolve(date(2024, 4, 15), date(2024, 10, 15));
        let json = serde_json::to_value(&schedule).unwrap();
        assert_eq!(json["seed_start_date"], "2024-03-18");
        assert_eq!(json["transplant_date"], "2024-04-01");
        assert_eq!(json["succession_starts"], serde_json::json!([]));
    }
}
