//! Shared types and models for the Garden Tracker
//!
//! This crate contains the domain records shared between the backend and the
//! browser (via WASM), plus the scheduling and capacity engine:
//! - `schedule`: seed-start, transplant and harvest date rules
//! - `capacity`: container capacity lookup table
//! - `ledger`: quantity bookkeeping across seed → seedling → plant transitions
//! - `calendar`: date-indexed event index and upcoming task window
//! - `planning`: seeds-to-start allocation for a crop plan

pub mod calendar;
pub mod capacity;
pub mod error;
pub mod ledger;
pub mod models;
pub mod planning;
pub mod schedule;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
