//! Schedule date rule tests
//!
//! Tests for seed-start, transplant and harvest dates including:
//! - Property 3: Seed Start Offset
//! - Property 4: Harvest Estimate Offset
//! - Property 5: Frost Date Resolution

use chrono::{Datelike, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::schedule::{
    compute_seed_schedule, days_since, days_until, expected_transplant_date, harvest_estimate,
    seed_start_date, transplant_target, FrostDates, MonthDay, DEFAULT_TRANSPLANT_OFFSET_WEEKS,
};
use shared::validation::{validate_days_to_maturity, MAX_DAYS_TO_MATURITY};
use shared::{SeedLot, SizeCategory};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tomato(weeks_to_transplant: i32, days_to_maturity: Option<i32>) -> SeedLot {
    SeedLot {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        variety_name: "Sungold".to_string(),
        plant_type: "tomato".to_string(),
        quantity: 25,
        purchase_date: None,
        expiration_date: None,
        germination_rate: Some(Decimal::new(85, 0)),
        supplier: Some("Johnny's".to_string()),
        days_to_maturity,
        weeks_to_transplant,
        size_category: SizeCategory::Medium,
        notes: None,
        created_at: Utc::now(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Last frost April 15, six weeks to transplant, 78 days to maturity
    #[test]
    fn test_season_schedule_for_a_tomato() {
        let frost = FrostDates::default().for_year(2024).unwrap();
        let target = transplant_target(frost.last_frost, DEFAULT_TRANSPLANT_OFFSET_WEEKS);
        assert_eq!(target, date(2024, 4, 29));

        let schedule = compute_seed_schedule(&tomato(6, Some(78)), target);
        assert_eq!(schedule.seed_start_date, date(2024, 3, 18));
        assert_eq!(schedule.transplant_date, date(2024, 4, 29));
        assert_eq!(schedule.harvest_date, Some(date(2024, 7, 16)));
    }

    #[test]
    fn test_schedule_without_maturity_has_no_harvest() {
        let schedule = compute_seed_schedule(&tomato(6, None), date(2024, 4, 29));
        assert_eq!(schedule.harvest_date, None);
    }

    #[test]
    fn test_out_of_range_maturity_rejected() {
        assert!(validate_days_to_maturity(MAX_DAYS_TO_MATURITY).is_ok());
        assert!(validate_days_to_maturity(i32::MAX).is_err());
    }

    /// A stored maturity past the end of the calendar yields no harvest date
    #[test]
    fn test_unrepresentable_harvest_date_is_absent() {
        let schedule = compute_seed_schedule(&tomato(6, Some(i32::MAX)), date(2024, 4, 29));
        assert_eq!(schedule.seed_start_date, date(2024, 3, 18));
        assert_eq!(schedule.harvest_date, None);
    }

    /// Schedule JSON as returned by the seed schedule endpoint
    #[test]
    fn test_schedule_json_shape() {
        let schedule = compute_seed_schedule(&tomato(6, Some(78)), date(2024, 4, 29));
        let json = serde_json::to_value(schedule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "seed_start_date": "2024-03-18",
                "transplant_date": "2024-04-29",
                "harvest_date": "2024-07-16"
            })
        );

        let without = serde_json::to_value(compute_seed_schedule(&tomato(6, None), date(2024, 4, 29))).unwrap();
        assert!(without.get("harvest_date").is_none());
    }

    /// Direct-sown crops start on the transplant date itself
    #[test]
    fn test_zero_weeks_to_transplant() {
        assert_eq!(seed_start_date(date(2024, 5, 1), 0), date(2024, 5, 1));
    }

    #[test]
    fn test_expected_transplant_from_sowing() {
        assert_eq!(expected_transplant_date(date(2024, 3, 1), 6), date(2024, 4, 12));
    }

    #[test]
    fn test_day_counts_are_signed() {
        let today = date(2024, 6, 10);
        assert_eq!(days_until(date(2024, 6, 20), today), 10);
        assert_eq!(days_until(date(2024, 6, 1), today), -9);
        assert_eq!(days_since(date(2024, 6, 1), today), 9);
    }

    #[test]
    fn test_frost_dates_from_config_strings() {
        let frost = FrostDates::parse("05-01", "09-30").unwrap();
        let season = frost.for_date(date(2025, 7, 4)).unwrap();
        assert_eq!(season.year, 2025);
        assert_eq!(season.last_frost, date(2025, 5, 1));
        assert_eq!(season.first_frost, date(2025, 9, 30));
    }

    #[test]
    fn test_malformed_frost_dates_rejected() {
        assert!(FrostDates::parse("April 15", "10-15").is_err());
        assert!(FrostDates::parse("04-15", "10-32").is_err());
        assert!(MonthDay::parse("00-10").is_err());
    }

    #[test]
    fn test_leap_day_frost_only_resolves_in_leap_years() {
        let frost = FrostDates::parse("02-29", "10-15").unwrap();
        assert!(frost.for_year(2028).is_ok());
        assert!(frost.for_year(2027).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn target_strategy() -> impl Strategy<Value = NaiveDate> {
        (2000i32..2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| date(y, m, d))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property 3: Seed Start Offset
        /// The seed start date is exactly 7 × weeks days before the target
        #[test]
        fn prop_seed_start_offset(
            target in target_strategy(),
            weeks in 0i32..=52
        ) {
            let start = seed_start_date(target, weeks);
            prop_assert_eq!((target - start).num_days(), i64::from(weeks) * 7);
            prop_assert!(start <= target);
        }

        /// Property 3: Starting on the computed date and waiting the same
        /// number of weeks lands back on the target
        #[test]
        fn prop_start_and_transplant_are_inverse(
            target in target_strategy(),
            weeks in 0i32..=52
        ) {
            let start = seed_start_date(target, weeks);
            prop_assert_eq!(expected_transplant_date(start, weeks), target);
        }

        /// Property 4: Harvest Estimate Offset
        #[test]
        fn prop_harvest_estimate_offset(
            transplant in target_strategy(),
            days in 0i32..=365
        ) {
            let harvest = harvest_estimate(transplant, Some(days)).unwrap();
            prop_assert_eq!(days_until(harvest, transplant), i64::from(days));
        }

        /// Property 5: Frost Date Resolution
        /// Any valid non-leap month/day resolves in every year, keeping the year
        #[test]
        fn prop_frost_dates_resolve_in_any_year(
            year in 1990i32..2100,
            month in 1u32..=12,
            day in 1u32..=28
        ) {
            let text = format!("{:02}-{:02}", month, day);
            let frost = FrostDates::parse(&text, &text).unwrap();
            let season = frost.for_year(year).unwrap();
            prop_assert_eq!(season.last_frost.year(), year);
            prop_assert_eq!(season.last_frost.month(), month);
            prop_assert_eq!(season.last_frost.day(), day);
        }
    }
}
