//! HTTP request handlers

use chrono::{NaiveDate, Utc};

pub mod auth;
pub mod calendar;
pub mod container;
pub mod harvest;
pub mod health;
pub mod hydro;
pub mod plan;
pub mod plant;
pub mod reporting;
pub mod seed;
pub mod seedling;
pub mod template;

pub use auth::*;
pub use calendar::*;
pub use container::*;
pub use harvest::*;
pub use health::*;
pub use hydro::*;
pub use plan::*;
pub use plant::*;
pub use reporting::*;
pub use seed::*;
pub use seedling::*;
pub use template::*;

/// The request's date; read once per request and passed down
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
