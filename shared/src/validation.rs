//! Input validation for garden records
//!
//! Checks return a static message; callers attach the field name when turning
//! a failure into an error response.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::GardenError;

// ============================================================================
// Inventory Validations
// ============================================================================

/// Germination rate is a percentage between 0 and 100
pub fn validate_germination_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err("Germination rate must be between 0 and 100");
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

pub fn validate_positive_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be greater than 0");
    }
    Ok(())
}

/// Longest maturity accepted, ten years
pub const MAX_DAYS_TO_MATURITY: i32 = 3650;

pub fn validate_days_to_maturity(days: i32) -> Result<(), &'static str> {
    if days <= 0 {
        return Err("Days to maturity must be greater than 0");
    }
    if days > MAX_DAYS_TO_MATURITY {
        return Err("Days to maturity cannot exceed 3650");
    }
    Ok(())
}

pub fn validate_weeks_to_transplant(weeks: i32) -> Result<(), &'static str> {
    if !(0..=52).contains(&weeks) {
        return Err("Weeks to transplant must be between 0 and 52");
    }
    Ok(())
}

// ============================================================================
// Growing Validations
// ============================================================================

pub const MAX_PLANTS_PER_TRANSPLANT: i32 = 500;
pub const MAX_PLAN_CONTAINERS: i32 = 10_000;
pub const MAX_PLANTS_PER_CONTAINER: i32 = 1_000;

/// Plants created by one transplant request
pub fn validate_transplant_quantity(quantity: i32) -> Result<(), &'static str> {
    validate_positive_quantity(quantity)?;
    if quantity > MAX_PLANTS_PER_TRANSPLANT {
        return Err("Cannot transplant more than 500 plants at once");
    }
    Ok(())
}

pub fn validate_plan_containers(num_containers: i32) -> Result<(), &'static str> {
    if !(0..=MAX_PLAN_CONTAINERS).contains(&num_containers) {
        return Err("Number of containers must be between 0 and 10000");
    }
    Ok(())
}

pub fn validate_plants_per_container(plants: i32) -> Result<(), &'static str> {
    if !(0..=MAX_PLANTS_PER_CONTAINER).contains(&plants) {
        return Err("Plants per container must be between 0 and 1000");
    }
    Ok(())
}

pub fn validate_container_volume(volume_gallons: i32) -> Result<(), &'static str> {
    if volume_gallons <= 0 {
        return Err("Container volume must be greater than 0");
    }
    Ok(())
}

/// Health and quality ratings use a 1-10 scale
pub fn validate_rating(rating: i32) -> Result<(), &'static str> {
    if !(1..=10).contains(&rating) {
        return Err("Rating must be between 1 and 10");
    }
    Ok(())
}

pub fn validate_harvest_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Harvest amount must be greater than 0");
    }
    Ok(())
}

pub fn validate_ph(ph: Decimal) -> Result<(), &'static str> {
    if ph < Decimal::ZERO || ph > Decimal::from(14) {
        return Err("pH must be between 0 and 14");
    }
    Ok(())
}

pub fn validate_ec(ec: Decimal) -> Result<(), &'static str> {
    if ec < Decimal::ZERO {
        return Err("EC cannot be negative");
    }
    Ok(())
}

/// Template offsets relative to last frost, either side
pub fn validate_frost_offset_weeks(weeks: i32) -> Result<(), &'static str> {
    if !(-52..=52).contains(&weeks) {
        return Err("Weeks from last frost must be between -52 and 52");
    }
    Ok(())
}

pub fn validate_succession_weeks(weeks: i32) -> Result<(), &'static str> {
    if !(1..=52).contains(&weeks) {
        return Err("Succession interval must be between 1 and 52 weeks");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

pub fn validate_required(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Value is required");
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` form value
pub fn parse_date(value: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| "Date must be in YYYY-MM-DD format")
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Attach a field name to a failed check
pub fn check(field: &str, result: Result<(), &'static str>) -> Result<(), GardenError> {
    result.map_err(|message| GardenError::validation(field, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_germination_rate_bounds() {
        assert!(validate_germination_rate(Decimal::ZERO).is_ok());
        assert!(validate_germination_rate(Decimal::from(100)).is_ok());
        assert!(validate_germination_rate(Decimal::new(855, 1)).is_ok());
        assert!(validate_germination_rate(Decimal::from(101)).is_err());
        assert!(validate_germination_rate(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_ph_and_ec() {
        assert!(validate_ph(Decimal::new(62, 1)).is_ok());
        assert!(validate_ph(Decimal::from(15)).is_err());
        assert!(validate_ec(Decimal::ZERO).is_ok());
        assert!(validate_ec(Decimal::new(-1, 1)).is_err());
    }

    #[test]
    fn test_rating_scale() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(10).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(11).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-04-15"), Ok(NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()));
        assert!(parse_date("04/15/2024").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_check_names_the_field() {
        let err = check("quantity", validate_quantity(-3)).unwrap_err();
        assert!(matches!(err, GardenError::Validation { ref field, .. } if field == "quantity"));
    }

    #[test]
    fn test_weeks_to_transplant_range() {
        assert!(validate_weeks_to_transplant(0).is_ok());
        assert!(validate_weeks_to_transplant(52).is_ok());
        assert!(validate_weeks_to_transplant(53).is_err());
    }

    #[test]
    fn test_days_to_maturity_upper_bound() {
        assert!(validate_days_to_maturity(MAX_DAYS_TO_MATURITY).is_ok());
        assert!(validate_days_to_maturity(MAX_DAYS_TO_MATURITY + 1).is_err());
        assert!(validate_days_to_maturity(i32::MAX).is_err());
    }

    #[test]
    fn test_plan_size_bounds() {
        assert!(validate_plan_containers(0).is_ok());
        assert!(validate_plan_containers(MAX_PLAN_CONTAINERS).is_ok());
        assert!(validate_plan_containers(100_000).is_err());
        assert!(validate_plants_per_container(MAX_PLANTS_PER_CONTAINER + 1).is_err());
        assert!(validate_plants_per_container(-1).is_err());
    }

    #[test]
    fn test_transplant_quantity_cap() {
        assert!(validate_transplant_quantity(1).is_ok());
        assert!(validate_transplant_quantity(MAX_PLANTS_PER_TRANSPLANT).is_ok());
        assert!(validate_transplant_quantity(0).is_err());
        assert!(validate_transplant_quantity(1_000_000).is_err());
    }

    #[test]
    fn test_frost_offsets_reject_extremes() {
        assert!(validate_frost_offset_weeks(-4).is_ok());
        assert!(validate_frost_offset_weeks(i32::MIN).is_err());
        assert!(validate_frost_offset_weeks(i32::MAX).is_err());
        assert!(validate_succession_weeks(0).is_err());
        assert!(validate_succession_weeks(3).is_ok());
    }
}
