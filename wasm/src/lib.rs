//! WebAssembly module for the Garden Tracker
//!
//! Provides client-side computation for:
//! - Container capacity and spacing lookups
//! - Seed start, transplant and harvest dates
//! - Seeds-to-start arithmetic for crop plans
//! - Form validation before anything is sent to the server

use chrono::NaiveDate;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{capacity, planning, schedule};

fn parse_day(value: &str) -> Result<NaiveDate, JsValue> {
    parse_date(value).map_err(|e| JsValue::from_str(&format!("{}: '{}'", e, value)))
}

fn rate_from_f64(rate: Option<f64>) -> Option<Decimal> {
    rate.and_then(|r| Decimal::try_from(r).ok())
}

/// Current date from the browser clock
fn browser_today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
}

/// Maximum plants of a size category ("compact", "medium", "large") in a container
#[wasm_bindgen]
pub fn container_capacity(volume_gallons: i32, size_category: &str) -> i32 {
    capacity::capacity_for_category(volume_gallons, size_category)
}

/// Free slots in a container, never negative
#[wasm_bindgen]
pub fn container_available_space(max_plants: i32, current_plants: i32) -> i32 {
    capacity::available_space(max_plants, current_plants)
}

/// Recommended spacing in inches for a size category
#[wasm_bindgen]
pub fn recommended_spacing(size_category: &str) -> i32 {
    capacity::spacing_inches(SizeCategory::from_str_lossy(size_category))
}

/// Seeds to sow for `total_plants` survivors at a germination rate (percent)
#[wasm_bindgen]
pub fn seeds_to_start(total_plants: i32, germination_rate: Option<f64>) -> i32 {
    planning::seeds_to_start(total_plants, rate_from_f64(germination_rate))
}

/// Seed start date (YYYY-MM-DD) for a transplant target and weeks to transplant
#[wasm_bindgen]
pub fn seed_start_date(transplant_target: &str, weeks_to_transplant: i32) -> Result<String, JsValue> {
    let target = parse_day(transplant_target)?;
    validate_weeks_to_transplant(weeks_to_transplant).map_err(JsValue::from_str)?;
    Ok(schedule::seed_start_date(target, weeks_to_transplant).to_string())
}

/// Expected harvest date, or nothing when days to maturity is unknown
#[wasm_bindgen]
pub fn harvest_estimate(transplant_date: &str, days_to_maturity: Option<i32>) -> Result<Option<String>, JsValue> {
    let transplant = parse_day(transplant_date)?;
    Ok(schedule::harvest_estimate(transplant, days_to_maturity).map(|d| d.to_string()))
}

/// Days from the browser's today until `date`; negative once it has passed
#[wasm_bindgen]
pub fn days_until(date: &str) -> Result<i64, JsValue> {
    let target = parse_day(date)?;
    let today = browser_today().ok_or_else(|| JsValue::from_str("Browser clock is unavailable"))?;
    Ok(schedule::days_until(target, today))
}

/// Compute a plan item from its JSON and its seed lot's JSON
///
/// Returns the `PlanItemResult` as JSON.
#[wasm_bindgen]
pub fn compute_plan_item(
    item_json: &str,
    seed_json: &str,
    container_volume_gallons: i32,
    last_frost: &str,
) -> Result<String, JsValue> {
    let item: PlanItem = serde_json::from_str(item_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid plan item JSON: {}", e)))?;
    let seed: SeedLot = serde_json::from_str(seed_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid seed JSON: {}", e)))?;
    let last_frost = parse_day(last_frost)?;

    let result = planning::compute_plan_item(&item, &seed, container_volume_gallons, last_frost)
        .map_err(|e| {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
            JsValue::from_str(&e.to_string())
        })?;

    serde_json::to_string(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Validate a germination rate field (percent)
#[wasm_bindgen]
pub fn is_valid_germination_rate(rate: f64) -> bool {
    rate_from_f64(Some(rate)).is_some_and(|r| validate_germination_rate(r).is_ok())
}

/// Validate a pH reading
#[wasm_bindgen]
pub fn is_valid_ph(ph: f64) -> bool {
    rate_from_f64(Some(ph)).is_some_and(|v| validate_ph(v).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_capacity() {
        assert_eq!(container_capacity(5, "compact"), 5);
        assert_eq!(container_capacity(5, "medium"), 1);
        assert_eq!(container_capacity(7, "large"), 1);
        assert_eq!(container_capacity(6, "large"), 1);
        assert_eq!(container_capacity(100, "medium"), 5);
        assert_eq!(container_capacity(5, "giant"), 1);
    }

    #[test]
    fn test_available_space_floors_at_zero() {
        assert_eq!(container_available_space(3, 1), 2);
        assert_eq!(container_available_space(1, 4), 0);
    }

    #[test]
    fn test_recommended_spacing() {
        assert_eq!(recommended_spacing("compact"), 6);
        assert_eq!(recommended_spacing("large"), 30);
        assert_eq!(recommended_spacing("unknown"), 15);
    }

    #[test]
    fn test_seeds_to_start() {
        assert_eq!(seeds_to_start(10, Some(80.0)), 13);
        assert_eq!(seeds_to_start(10, None), 20);
        assert_eq!(seeds_to_start(10, Some(0.0)), 20);
    }

    #[test]
    fn test_validation_helpers() {
        assert!(is_valid_germination_rate(85.5));
        assert!(!is_valid_germination_rate(120.0));
        assert!(is_valid_ph(6.2));
        assert!(!is_valid_ph(15.0));
    }
}

// ============================================================================
// WASM-specific Tests
// ============================================================================
