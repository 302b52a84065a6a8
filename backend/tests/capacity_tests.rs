//! Container capacity tests
//!
//! Tests for the capacity lookup table including:
//! - Property 1: Capacity Table Lookup
//! - Property 2: Available Space Floor

use proptest::prelude::*;
use shared::capacity::{
    available_space, capacity_by_category, capacity_for, capacity_for_category, is_full, recommend,
    spacing_inches, CAPACITY_VOLUMES,
};
use shared::SizeCategory;

/// Rows of the capacity table, indexed like `CAPACITY_VOLUMES`
fn expected_row(size: SizeCategory) -> [i32; 9] {
    match size {
        SizeCategory::Compact => [1, 2, 3, 5, 7, 10, 15, 20, 25],
        SizeCategory::Medium => [0, 0, 1, 1, 2, 2, 3, 4, 5],
        SizeCategory::Large => [0, 0, 0, 0, 1, 1, 1, 2, 2],
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Every tabulated volume returns its own row entry
    #[test]
    fn test_table_keys_match_exactly() {
        for size in SizeCategory::ALL {
            let row = expected_row(size);
            for (index, volume) in CAPACITY_VOLUMES.iter().enumerate() {
                assert_eq!(
                    capacity_for(*volume, size),
                    row[index],
                    "{} gal, {}",
                    volume,
                    size
                );
            }
        }
    }

    #[test]
    fn test_five_gallon_bag() {
        let breakdown = capacity_by_category(5);
        assert_eq!(breakdown.compact, 5);
        assert_eq!(breakdown.medium, 1);
        assert_eq!(breakdown.large, 0);
    }

    #[test]
    fn test_unknown_category_uses_medium_row() {
        assert_eq!(capacity_for_category(20, "enormous"), 4);
        assert_eq!(capacity_for_category(20, "medium"), 4);
    }

    #[test]
    fn test_full_container() {
        assert!(is_full(2, 2));
        assert!(is_full(2, 3));
        assert!(!is_full(2, 1));
        // A zero-capacity bag is always full
        assert!(is_full(0, 0));
    }

    #[test]
    fn test_spacing_by_category() {
        assert_eq!(spacing_inches(SizeCategory::Compact), 6);
        assert_eq!(spacing_inches(SizeCategory::Medium), 15);
        assert_eq!(spacing_inches(SizeCategory::Large), 30);
    }

    #[test]
    fn test_recommendation_sentence() {
        let rec = recommend("Patio bag", 10, "Sungold", SizeCategory::Medium, 1);
        assert_eq!(rec.max_capacity, 2);
        assert_eq!(rec.available_space, 1);
        assert_eq!(rec.spacing_inches, 15);
        assert_eq!(
            rec.recommendation,
            "This 10gal bag can hold 2 medium plant(s). 1 space(s) available."
        );
    }

    #[test]
    fn test_overfull_recommendation_reports_no_space() {
        let rec = recommend("Deck bag", 3, "Brandywine", SizeCategory::Large, 2);
        assert_eq!(rec.max_capacity, 0);
        assert_eq!(rec.available_space, 0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn size_strategy() -> impl Strategy<Value = SizeCategory> {
        prop_oneof![
            Just(SizeCategory::Compact),
            Just(SizeCategory::Medium),
            Just(SizeCategory::Large),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property 1: Capacity Table Lookup
        /// A volume uses the row of the smallest key at or above it
        #[test]
        fn prop_volume_rounds_up_to_next_key(
            volume in 0i32..=25,
            size in size_strategy()
        ) {
            let index = CAPACITY_VOLUMES
                .iter()
                .position(|key| volume <= *key)
                .unwrap();
            prop_assert_eq!(capacity_for(volume, size), expected_row(size)[index]);
        }

        /// Property 1: Volumes past the largest key clamp to the last row entry
        #[test]
        fn prop_large_volumes_clamp(
            volume in 26i32..10_000,
            size in size_strategy()
        ) {
            prop_assert_eq!(capacity_for(volume, size), expected_row(size)[8]);
        }

        /// Property 1: Bigger bags never hold fewer plants
        #[test]
        fn prop_capacity_is_monotonic(
            volume in 0i32..100,
            extra in 0i32..100,
            size in size_strategy()
        ) {
            prop_assert!(capacity_for(volume + extra, size) >= capacity_for(volume, size));
        }

        /// Property 2: Available space is never negative and never exceeds capacity
        #[test]
        fn prop_available_space_floor(
            max_plants in 0i32..50,
            current in 0i32..100
        ) {
            let space = available_space(max_plants, current);
            prop_assert!(space >= 0);
            prop_assert!(space <= max_plants);
            prop_assert_eq!(space == 0, is_full(max_plants, current) || max_plants == current);
        }
    }
}
