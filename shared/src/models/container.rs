//! Grow bag and hydro bag models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capacity;

/// A container plants are grown in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Container {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: ContainerKind,
    pub volume_gallons: i32,
    /// Balcony, deck, patio, ...
    pub location: Option<String>,
    pub max_plants: i32,
    /// Plants currently occupying the container. Keeping this at or below
    /// `max_plants` is up to callers.
    pub current_plants: i32,
    /// Set for hydro bags attached to a hydroponic system
    pub hydro_system_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "VARCHAR", rename_all = "snake_case")
)]
pub enum ContainerKind {
    #[default]
    GrowBag,
    HydroBag,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::GrowBag => "grow_bag",
            ContainerKind::HydroBag => "hydro_bag",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "grow_bag" => Some(ContainerKind::GrowBag),
            "hydro_bag" => Some(ContainerKind::HydroBag),
            _ => None,
        }
    }
}

impl Container {
    pub fn is_full(&self) -> bool {
        capacity::is_full(self.max_plants, self.current_plants)
    }

    pub fn available_space(&self) -> i32 {
        capacity::available_space(self.max_plants, self.current_plants)
    }

    pub fn is_hydro(&self) -> bool {
        self.kind == ContainerKind::HydroBag
    }
}
