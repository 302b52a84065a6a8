//! Crop plan allocation: plants needed, seeds to start and when to start them

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::capacity::capacity_for;
use crate::error::{GardenError, GardenResult};
use crate::models::{PlanItem, PlanItemResult, PlanSummary, SeedLot};
use crate::schedule;

/// Weeks after last frost that direct-sown crops go in
pub const DIRECT_SOW_OFFSET_WEEKS: i32 = 2;

/// Multiplier applied when a lot has no usable germination rate
pub const UNKNOWN_GERMINATION_MULTIPLIER: i32 = 2;

pub fn total_plants_needed(num_containers: i32, plants_per_container: i32) -> GardenResult<i32> {
    num_containers
        .checked_mul(plants_per_container)
        .ok_or_else(|| GardenError::validation("num_containers", "Plan item needs too many plants"))
}

/// Seeds to sow so that, after germination loss, `total_plants` survive
///
/// `ceil(total / (rate / 100))` when the rate is known and positive, otherwise
/// twice the plant count. Saturates at `i32::MAX`.
pub fn seeds_to_start(total_plants: i32, germination_rate: Option<Decimal>) -> i32 {
    match germination_rate {
        Some(rate) if rate > Decimal::ZERO => {
            let needed = (Decimal::from(total_plants) * Decimal::ONE_HUNDRED / rate).ceil();
            needed.to_i32().unwrap_or(i32::MAX)
        }
        _ => total_plants.saturating_mul(UNKNOWN_GERMINATION_MULTIPLIER),
    }
}

pub fn plan_seed_start_date(is_direct_sow: bool, last_frost: NaiveDate, weeks_to_transplant: i32) -> NaiveDate {
    if is_direct_sow {
        schedule::transplant_target(last_frost, DIRECT_SOW_OFFSET_WEEKS)
    } else {
        schedule::seed_start_date(last_frost, weeks_to_transplant)
    }
}

/// Work out one plan item against the seed lot it draws from
pub fn compute_plan_item(
    item: &PlanItem,
    seed: &SeedLot,
    container_volume_gallons: i32,
    last_frost: NaiveDate,
) -> GardenResult<PlanItemResult> {
    if item.seed_id != seed.id {
        return Err(GardenError::validation("seed_id", "Plan item does not reference this seed lot"));
    }
    if item.num_containers < 0 {
        return Err(GardenError::validation("num_containers", "Number of containers cannot be negative"));
    }
    if matches!(item.plants_per_container, Some(n) if n < 0) {
        return Err(GardenError::validation(
            "plants_per_container",
            "Plants per container cannot be negative",
        ));
    }

    let plants_per_container = item
        .plants_per_container
        .unwrap_or_else(|| capacity_for(container_volume_gallons, seed.size_category));
    let total_plants = total_plants_needed(item.num_containers, plants_per_container)?;
    let seeds = seeds_to_start(total_plants, seed.germination_rate);

    Ok(PlanItemResult {
        plan_item_id: item.id,
        seed_id: seed.id,
        variety_name: seed.variety_name.clone(),
        plants_per_container,
        total_plants,
        seeds_to_start: seeds,
        seed_start_date: plan_seed_start_date(item.is_direct_sow, last_frost, seed.weeks_to_transplant),
        seed_shortfall: seeds.saturating_sub(seed.quantity).max(0),
    })
}

fn checked_total(field: &str, mut values: impl Iterator<Item = i32>) -> GardenResult<i32> {
    values
        .try_fold(0i32, |acc, value| acc.checked_add(value))
        .ok_or_else(|| GardenError::validation(field, "Plan totals are too large"))
}

pub fn summarize_plan(items: &[PlanItem], results: &[PlanItemResult]) -> GardenResult<PlanSummary> {
    Ok(PlanSummary {
        total_containers: checked_total("num_containers", items.iter().map(|item| item.num_containers))?,
        total_plants: checked_total("total_plants", results.iter().map(|r| r.total_plants))?,
        total_seeds_to_start: checked_total("seeds_to_start", results.iter().map(|r| r.seeds_to_start))?,
        items_short_of_seed: results.iter().filter(|r| r.seed_shortfall > 0).count(),
        earliest_seed_start: results.iter().map(|r| r.seed_start_date).min(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SizeCategory;
    use chrono::Utc;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed(rate: Option<i64>, quantity: i32) -> SeedLot {
        SeedLot {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            variety_name: "Cherokee Purple".to_string(),
            plant_type: "tomato".to_string(),
            quantity,
            purchase_date: None,
            expiration_date: None,
            germination_rate: rate.map(Decimal::from),
            supplier: None,
            days_to_maturity: Some(80),
            weeks_to_transplant: 6,
            size_category: SizeCategory::Medium,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn item(seed: &SeedLot, containers: i32, per: Option<i32>, direct: bool) -> PlanItem {
        PlanItem {
            id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            seed_id: seed.id,
            num_containers: containers,
            plants_per_container: per,
            is_direct_sow: direct,
        }
    }

    #[test]
    fn test_seeds_to_start_with_and_without_rate() {
        assert_eq!(seeds_to_start(10, Some(Decimal::from(80))), 13);
        assert_eq!(seeds_to_start(10, None), 20);
        assert_eq!(seeds_to_start(10, Some(Decimal::ZERO)), 20);
        assert_eq!(seeds_to_start(10, Some(Decimal::from(100))), 10);
    }

    #[test]
    fn test_default_plants_per_container_from_capacity() {
        let lot = seed(Some(80), 50);
        let result = compute_plan_item(&item(&lot, 5, None, false), &lot, 10, date(2024, 4, 15)).unwrap();
        assert_eq!(result.plants_per_container, 2);
        assert_eq!(result.total_plants, 10);
        assert_eq!(result.seeds_to_start, 13);
        assert_eq!(result.seed_start_date, date(2024, 3, 4));
        assert_eq!(result.seed_shortfall, 0);
    }

    #[test]
    fn test_direct_sow_starts_after_frost() {
        let lot = seed(None, 5);
        let result = compute_plan_item(&item(&lot, 2, Some(3), true), &lot, 5, date(2024, 4, 15)).unwrap();
        assert_eq!(result.seed_start_date, date(2024, 4, 29));
        assert_eq!(result.seeds_to_start, 12);
        assert_eq!(result.seed_shortfall, 7);
    }

    #[test]
    fn test_mismatched_seed_rejected() {
        let lot = seed(None, 5);
        let other = seed(None, 5);
        assert!(compute_plan_item(&item(&other, 1, None, false), &lot, 5, date(2024, 4, 15)).is_err());
    }

    #[test]
    fn test_summary_totals() {
        let a = seed(Some(80), 0);
        let b = seed(None, 100);
        let items = vec![item(&a, 5, Some(2), false), item(&b, 1, Some(1), true)];
        let frost = date(2024, 4, 15);
        let results = vec![
            compute_plan_item(&items[0], &a, 10, frost).unwrap(),
            compute_plan_item(&items[1], &b, 10, frost).unwrap(),
        ];
        let summary = summarize_plan(&items, &results).unwrap();
        assert_eq!(summary.total_containers, 6);
        assert_eq!(summary.total_plants, 11);
        assert_eq!(summary.total_seeds_to_start, 15);
        assert_eq!(summary.items_short_of_seed, 1);
        assert_eq!(summary.earliest_seed_start, Some(date(2024, 3, 4)));
    }
}
