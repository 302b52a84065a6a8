//! Container capacity lookup
//!
//! How many plants of a size category fit in a container of a given volume.
//! Volumes between table keys round up to the next known bag size; volumes
//! past the largest key use the largest key's row.

use serde::{Deserialize, Serialize};

use crate::models::SizeCategory;

/// Tabulated bag sizes in gallons, ascending
pub const CAPACITY_VOLUMES: [i32; 9] = [1, 2, 3, 5, 7, 10, 15, 20, 25];

const COMPACT_CAPACITY: [i32; 9] = [1, 2, 3, 5, 7, 10, 15, 20, 25];
const MEDIUM_CAPACITY: [i32; 9] = [0, 0, 1, 1, 2, 2, 3, 4, 5];
const LARGE_CAPACITY: [i32; 9] = [0, 0, 0, 0, 1, 1, 1, 2, 2];

fn capacity_row(size: SizeCategory) -> &'static [i32; 9] {
    match size {
        SizeCategory::Compact => &COMPACT_CAPACITY,
        SizeCategory::Medium => &MEDIUM_CAPACITY,
        SizeCategory::Large => &LARGE_CAPACITY,
    }
}

/// Maximum plant count for `size` plants in a `volume_gallons` container
pub fn capacity_for(volume_gallons: i32, size: SizeCategory) -> i32 {
    let index = CAPACITY_VOLUMES
        .iter()
        .position(|&key| volume_gallons <= key)
        .unwrap_or(CAPACITY_VOLUMES.len() - 1);
    capacity_row(size)[index]
}

/// Same as [`capacity_for`] for a stored category string
pub fn capacity_for_category(volume_gallons: i32, category: &str) -> i32 {
    capacity_for(volume_gallons, SizeCategory::from_str_lossy(category))
}

/// Free slots, floored at zero for display
pub fn available_space(max_plants: i32, current_plants: i32) -> i32 {
    (max_plants - current_plants).max(0)
}

pub fn is_full(max_plants: i32, current_plants: i32) -> bool {
    current_plants >= max_plants
}

/// Recommended in-ground spacing for a size category
pub fn spacing_inches(size: SizeCategory) -> i32 {
    match size {
        SizeCategory::Compact => 6,
        SizeCategory::Medium => 15,
        SizeCategory::Large => 30,
    }
}

/// Capacity of one container volume for every size category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapacityBreakdown {
    pub compact: i32,
    pub medium: i32,
    pub large: i32,
}

pub fn capacity_by_category(volume_gallons: i32) -> CapacityBreakdown {
    CapacityBreakdown {
        compact: capacity_for(volume_gallons, SizeCategory::Compact),
        medium: capacity_for(volume_gallons, SizeCategory::Medium),
        large: capacity_for(volume_gallons, SizeCategory::Large),
    }
}

/// Capacity advice for placing a variety into a container
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapacityRecommendation {
    pub container_name: String,
    pub volume_gallons: i32,
    pub variety_name: String,
    pub size_category: SizeCategory,
    pub max_capacity: i32,
    pub current_plants: i32,
    pub available_space: i32,
    pub spacing_inches: i32,
    pub recommendation: String,
}

pub fn recommend(
    container_name: &str,
    volume_gallons: i32,
    variety_name: &str,
    size: SizeCategory,
    current_plants: i32,
) -> CapacityRecommendation {
    let max_capacity = capacity_for(volume_gallons, size);
    let available = available_space(max_capacity, current_plants);

    CapacityRecommendation {
        container_name: container_name.to_string(),
        volume_gallons,
        variety_name: variety_name.to_string(),
        size_category: size,
        max_capacity,
        current_plants,
        available_space: available,
        spacing_inches: spacing_inches(size),
        recommendation: format!(
            "This {}gal bag can hold {} {} plant(s). {} space(s) available.",
            volume_gallons, max_capacity, size, available
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_rounds_up_to_next_bag_size() {
        assert_eq!(capacity_for(4, SizeCategory::Compact), 5);
        assert_eq!(capacity_for(6, SizeCategory::Medium), 2);
        assert_eq!(capacity_for(11, SizeCategory::Large), 1);
        assert_eq!(capacity_for(0, SizeCategory::Compact), 1);
    }

    #[test]
    fn test_volume_past_largest_key_is_clamped() {
        assert_eq!(capacity_for(26, SizeCategory::Compact), 25);
        assert_eq!(capacity_for(100, SizeCategory::Medium), 5);
        assert_eq!(capacity_for(500, SizeCategory::Large), 2);
    }

    #[test]
    fn test_unknown_category_uses_medium_row() {
        assert_eq!(capacity_for_category(20, "gigantic"), 4);
    }

    #[test]
    fn test_available_space_floors_at_zero() {
        assert_eq!(available_space(2, 5), 0);
        assert_eq!(available_space(5, 2), 3);
        assert!(is_full(2, 2));
        assert!(!is_full(3, 2));
    }

    #[test]
    fn test_recommendation_sentence() {
        let rec = recommend("Deck-Large-1", 10, "San Marzano", SizeCategory::Medium, 1);
        assert_eq!(rec.max_capacity, 2);
        assert_eq!(rec.available_space, 1);
        assert_eq!(
            rec.recommendation,
            "This 10gal bag can hold 2 medium plant(s). 1 space(s) available."
        );
    }
}
