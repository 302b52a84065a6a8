//! Business logic services for the Garden Tracker

pub mod auth;
pub mod calendar;
pub mod container;
pub mod harvest;
pub mod hydro;
pub mod plan;
pub mod plant;
pub mod reporting;
pub mod seed;
pub mod seedling;
pub mod template;

pub use auth::AuthService;
pub use calendar::CalendarService;
pub use container::ContainerService;
pub use harvest::HarvestService;
pub use hydro::HydroService;
pub use plan::PlanService;
pub use plant::PlantService;
pub use reporting::ReportingService;
pub use seed::SeedService;
pub use seedling::SeedlingService;
pub use template::TemplateService;
