//! Account and input validation tests
//!
//! Property-based and unit tests for:
//! - Property 15: Registration Input Validation
//! - Property 16: Password Hash Verification
//! - Record field range checks

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::validation::{
    check, parse_date, validate_email, validate_password, validate_ph, validate_rating,
    validate_required, validate_weeks_to_transplant,
};
use shared::GardenError;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate valid email addresses
fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z]{5,10}@[a-z]{3,8}\\.(com|org|net)"
}

/// Generate valid passwords (8+ chars)
fn password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!@#$%]{8,20}"
}

/// Generate passwords that are too short
fn short_password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{0,7}"
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 15: Registration Input Validation
    #[test]
    fn prop_valid_email_accepted(email in email_strategy()) {
        prop_assert!(validate_email(&email).is_ok());
    }

    #[test]
    fn prop_email_without_at_rejected(local in "[a-z]{3,10}", domain in "[a-z]{3,8}\\.com") {
        let email = format!("{}{}", local, domain);
        prop_assert!(validate_email(&email).is_err());
    }

    #[test]
    fn prop_password_length(password in password_strategy()) {
        prop_assert!(validate_password(&password).is_ok());
    }

    #[test]
    fn prop_short_password_rejected(password in short_password_strategy()) {
        prop_assert!(validate_password(&password).is_err());
    }

    /// Whitespace-only names never pass the required check
    #[test]
    fn prop_blank_required_rejected(blank in "[ \t]{0,6}") {
        prop_assert!(validate_required(&blank).is_err());
    }

    #[test]
    fn prop_rating_scale(rating in -20i32..30) {
        prop_assert_eq!(validate_rating(rating).is_ok(), (1..=10).contains(&rating));
    }
}

// ============================================================================
// Unit Tests: Password Hashing
// ============================================================================

#[cfg(test)]
mod password_hash_tests {
    /// Property 16: Password Hash Verification
    #[test]
    fn test_hash_verifies_only_the_original_password() {
        // Minimum cost keeps the test fast
        let hashed = bcrypt::hash("tomatoes-in-may", 4).unwrap();
        assert_ne!(hashed, "tomatoes-in-may");
        assert!(bcrypt::verify("tomatoes-in-may", &hashed).unwrap());
        assert!(!bcrypt::verify("tomatoes-in-june", &hashed).unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let first = bcrypt::hash("basil1234", 4).unwrap();
        let second = bcrypt::hash("basil1234", 4).unwrap();
        assert_ne!(first, second);
    }
}

// ============================================================================
// Unit Tests: Field Checks
// ============================================================================

#[cfg(test)]
mod field_check_tests {
    use super::*;

    #[test]
    fn test_check_attaches_field_name() {
        match check("password", validate_password("short")) {
            Err(GardenError::Validation { field, message }) => {
                assert_eq!(field, "password");
                assert_eq!(message, "Password must be at least 8 characters");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(check("email", validate_email("grower@example.com")).is_ok());
    }

    #[test]
    fn test_weeks_to_transplant_range() {
        assert!(validate_weeks_to_transplant(0).is_ok());
        assert!(validate_weeks_to_transplant(52).is_ok());
        assert!(validate_weeks_to_transplant(53).is_err());
        assert!(validate_weeks_to_transplant(-1).is_err());
    }

    #[test]
    fn test_ph_range() {
        assert!(validate_ph(Decimal::new(62, 1)).is_ok());
        assert!(validate_ph(Decimal::from(15)).is_err());
    }

    #[test]
    fn test_form_dates() {
        assert!(parse_date(" 2024-04-15 ").is_ok());
        assert!(parse_date("04/15/2024").is_err());
        assert!(parse_date("2023-02-29").is_err());
    }
}
