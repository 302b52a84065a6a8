//! Domain models for the Garden Tracker

mod container;
mod harvest;
mod hydro;
mod plan;
mod plant;
mod seed;
mod seedling;
mod template;

pub use container::*;
pub use harvest::*;
pub use hydro::*;
pub use plan::*;
pub use plant::*;
pub use seed::*;
pub use seedling::*;
pub use template::*;
