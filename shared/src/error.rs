//! Domain errors raised by the garden engine

use thiserror::Error;

/// Errors produced by engine operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GardenError {
    /// A required field is missing or malformed
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    /// A delete was refused because dependent records still reference the target
    #[error("Cannot delete {resource}: {count} {dependents} still reference it")]
    ReferentialBlock {
        resource: String,
        dependents: String,
        count: i64,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },
}

impl GardenError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        GardenError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn blocked(resource: &str, dependents: &str, count: i64) -> Self {
        GardenError::ReferentialBlock {
            resource: resource.to_string(),
            dependents: dependents.to_string(),
            count,
        }
    }

    pub fn transition(from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        GardenError::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Result alias for engine operations
pub type GardenResult<T> = Result<T, GardenError>;
