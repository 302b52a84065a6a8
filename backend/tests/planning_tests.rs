//! Crop plan allocation tests
//!
//! Tests for seeds-to-start arithmetic and plan computation including:
//! - Property 13: Seeds Cover Germination Loss
//! - Property 14: Plan Summary Totals

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::planning::{compute_plan_item, seeds_to_start, summarize_plan, total_plants_needed};
use shared::{GardenError, PlanItem, SeedLot, SizeCategory};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Helper to create a Decimal percentage
fn pct(value: i64) -> Decimal {
    Decimal::new(value, 0)
}

fn seed_lot(size: SizeCategory, rate: Option<Decimal>, quantity: i32) -> SeedLot {
    SeedLot {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        variety_name: "Lacinato Kale".to_string(),
        plant_type: "kale".to_string(),
        quantity,
        purchase_date: None,
        expiration_date: None,
        germination_rate: rate,
        supplier: None,
        days_to_maturity: Some(60),
        weeks_to_transplant: 5,
        size_category: size,
        notes: None,
        created_at: Utc::now(),
    }
}

fn plan_item(seed: &SeedLot, num_containers: i32, plants_per_container: Option<i32>, is_direct_sow: bool) -> PlanItem {
    PlanItem {
        id: Uuid::new_v4(),
        plan_id: Uuid::new_v4(),
        seed_id: seed.id,
        num_containers,
        plants_per_container,
        is_direct_sow,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_seeds_to_start_rounds_up() {
        assert_eq!(seeds_to_start(10, Some(pct(80))), 13);
        assert_eq!(seeds_to_start(10, Some(pct(100))), 10);
        assert_eq!(seeds_to_start(9, Some(Decimal::new(755, 1))), 12);
    }

    #[test]
    fn test_unknown_rate_doubles() {
        assert_eq!(seeds_to_start(10, None), 20);
        assert_eq!(seeds_to_start(10, Some(Decimal::ZERO)), 20);
        assert_eq!(seeds_to_start(0, None), 0);
    }

    /// Ten 10-gallon bags of a medium variety with 80% germination
    #[test]
    fn test_plan_item_from_capacity_table() {
        let seed = seed_lot(SizeCategory::Medium, Some(pct(80)), 20);
        let item = plan_item(&seed, 10, None, false);
        let result = compute_plan_item(&item, &seed, 10, date(2024, 4, 15)).unwrap();

        assert_eq!(result.plants_per_container, 2);
        assert_eq!(result.total_plants, 20);
        assert_eq!(result.seeds_to_start, 25);
        assert_eq!(result.seed_shortfall, 5);
        assert_eq!(result.seed_start_date, date(2024, 3, 11));
    }

    #[test]
    fn test_direct_sow_starts_after_last_frost() {
        let seed = seed_lot(SizeCategory::Compact, Some(pct(90)), 100);
        let item = plan_item(&seed, 4, Some(6), true);
        let result = compute_plan_item(&item, &seed, 5, date(2024, 4, 15)).unwrap();

        assert_eq!(result.plants_per_container, 6);
        assert_eq!(result.total_plants, 24);
        assert_eq!(result.seeds_to_start, 27);
        assert_eq!(result.seed_shortfall, 0);
        assert_eq!(result.seed_start_date, date(2024, 4, 29));
    }

    #[test]
    fn test_mismatched_seed_rejected() {
        let seed = seed_lot(SizeCategory::Large, None, 5);
        let other = seed_lot(SizeCategory::Large, None, 5);
        let item = plan_item(&other, 1, None, false);
        assert!(matches!(
            compute_plan_item(&item, &seed, 20, date(2024, 4, 15)),
            Err(GardenError::Validation { .. })
        ));
    }

    #[test]
    fn test_summary_totals() {
        let kale = seed_lot(SizeCategory::Medium, Some(pct(80)), 0);
        let basil = seed_lot(SizeCategory::Compact, None, 100);
        let items = vec![plan_item(&kale, 2, Some(1), false), plan_item(&basil, 3, Some(2), true)];
        let results = vec![
            compute_plan_item(&items[0], &kale, 5, date(2024, 4, 15)).unwrap(),
            compute_plan_item(&items[1], &basil, 5, date(2024, 4, 15)).unwrap(),
        ];

        let summary = summarize_plan(&items, &results).unwrap();
        assert_eq!(summary.total_containers, 5);
        assert_eq!(summary.total_plants, 8);
        assert_eq!(summary.total_seeds_to_start, 3 + 12);
        assert_eq!(summary.items_short_of_seed, 1);
        assert_eq!(summary.earliest_seed_start, Some(date(2024, 3, 11)));
    }

    /// A hundred thousand bags of a hundred thousand plants each does not fit in i32
    #[test]
    fn test_oversized_plan_item_rejected() {
        let seed = seed_lot(SizeCategory::Medium, Some(pct(80)), 20);
        let item = plan_item(&seed, 100_000, Some(100_000), false);
        assert!(matches!(
            compute_plan_item(&item, &seed, 5, date(2024, 4, 15)),
            Err(GardenError::Validation { .. })
        ));
    }

    #[test]
    fn test_unknown_rate_saturates() {
        assert_eq!(seeds_to_start(i32::MAX, None), i32::MAX);
        assert_eq!(seeds_to_start(i32::MAX, Some(Decimal::new(1, 1))), i32::MAX);
    }

    #[test]
    fn test_summary_totals_overflow_rejected() {
        let seed = seed_lot(SizeCategory::Medium, None, 0);
        let items = vec![plan_item(&seed, 1, Some(1), false), plan_item(&seed, 1, Some(1), false)];
        let mut results: Vec<_> = items
            .iter()
            .map(|item| compute_plan_item(item, &seed, 5, date(2024, 4, 15)).unwrap())
            .collect();
        for result in &mut results {
            result.seeds_to_start = i32::MAX;
        }
        assert!(matches!(
            summarize_plan(&items, &results),
            Err(GardenError::Validation { .. })
        ));
    }

    #[test]
    fn test_empty_plan_summary() {
        let summary = summarize_plan(&[], &[]).unwrap();
        assert_eq!(summary.total_plants, 0);
        assert_eq!(summary.earliest_seed_start, None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn rate_strategy() -> impl Strategy<Value = Decimal> {
        // 0.1% to 100.0% in tenths
        (1i64..=1000).prop_map(|tenths| Decimal::new(tenths, 1))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property 13: Seeds Cover Germination Loss
        /// Expected survivors from the seeds started reach the target, and one
        /// seed fewer would not
        #[test]
        fn prop_seeds_cover_germination_loss(
            total in 1i32..500,
            rate in rate_strategy()
        ) {
            let seeds = seeds_to_start(total, Some(rate));
            let survivors = Decimal::from(seeds) * rate / Decimal::ONE_HUNDRED;
            let fewer = Decimal::from(seeds - 1) * rate / Decimal::ONE_HUNDRED;

            prop_assert!(seeds >= total);
            prop_assert!(survivors >= Decimal::from(total));
            prop_assert!(fewer < Decimal::from(total));
        }

        /// Property 14: Plan Summary Totals
        #[test]
        fn prop_plan_totals_add_up(
            containers in prop::collection::vec((0i32..20, proptest::option::of(0i32..6)), 1..8),
            volume in 1i32..30
        ) {
            let seed = seed_lot(SizeCategory::Medium, Some(pct(75)), 50);
            let items: Vec<PlanItem> = containers
                .iter()
                .map(|(n, per)| plan_item(&seed, *n, *per, false))
                .collect();
            let results: Vec<_> = items
                .iter()
                .map(|item| compute_plan_item(item, &seed, volume, date(2025, 4, 20)).unwrap())
                .collect();

            for (item, result) in items.iter().zip(&results) {
                prop_assert_eq!(
                    result.total_plants,
                    total_plants_needed(item.num_containers, result.plants_per_container).unwrap()
                );
                prop_assert!(result.seeds_to_start >= result.total_plants);
                prop_assert!(result.seed_shortfall >= 0);
            }

            let summary = summarize_plan(&items, &results).unwrap();
            prop_assert_eq!(summary.total_containers, containers.iter().map(|(n, _)| n).sum::<i32>());
            prop_assert_eq!(summary.total_plants, results.iter().map(|r| r.total_plants).sum::<i32>());
        }
    }
}
