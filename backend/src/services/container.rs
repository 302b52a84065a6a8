//! Container service: grow bags, hydro bags and their occupancy

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::seed::SeedService;
use crate::error::{AppError, AppResult};
use crate::models::{Container, ContainerKind, SizeCategory};
use shared::capacity::{self, CapacityBreakdown, CapacityRecommendation};
use shared::ledger;
use shared::validation::{check, validate_container_volume, validate_quantity, validate_required};

pub(crate) const CONTAINER_COLUMNS: &str = "id, user_id, name, kind, volume_gallons, location, \
     max_plants, current_plants, hydro_system_id, notes, created_at";

/// Container service for managing grow bags and hydro bags
#[derive(Clone)]
pub struct ContainerService {
    db: PgPool,
}

/// Input for adding a container
#[derive(Debug, Deserialize)]
pub struct CreateContainerInput {
    pub name: String,
    /// grow_bag (default) or hydro_bag
    pub kind: Option<String>,
    pub volume_gallons: i32,
    pub location: Option<String>,
    /// Explicit capacity; derived from the capacity table when absent
    pub max_plants: Option<i32>,
    /// Size category used to derive capacity, medium by default
    pub size_category: Option<String>,
    pub hydro_system_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContainerInput {
    pub name: Option<String>,
    pub location: Option<String>,
    pub max_plants: Option<i32>,
    pub notes: Option<String>,
}

/// Container with its free slots
#[derive(Debug, Serialize)]
pub struct ContainerView {
    #[serde(flatten)]
    pub container: Container,
    pub available_space: i32,
    pub is_full: bool,
    /// What the bag's volume could hold per size category
    pub capacity_by_category: CapacityBreakdown,
}

impl From<Container> for ContainerView {
    fn from(container: Container) -> Self {
        Self {
            available_space: container.available_space(),
            is_full: container.is_full(),
            capacity_by_category: capacity::capacity_by_category(container.volume_gallons),
            container,
        }
    }
}

/// Load a container inside a transaction, locking it until commit
pub(crate) async fn lock_container(
    conn: &mut PgConnection,
    user_id: Uuid,
    container_id: Uuid,
) -> AppResult<Container> {
    sqlx::query_as::<_, Container>(&format!(
        "SELECT {} FROM containers WHERE id = $1 AND user_id = $2 FOR UPDATE",
        CONTAINER_COLUMNS
    ))
    .bind(container_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Container".to_string()))
}

pub(crate) async fn save_occupancy(conn: &mut PgConnection, container: &Container) -> AppResult<()> {
    sqlx::query("UPDATE containers SET current_plants = $1 WHERE id = $2")
        .bind(container.current_plants)
        .bind(container.id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Occupy `count` slots, warning when the container goes over capacity
pub(crate) async fn occupy(
    conn: &mut PgConnection,
    container: &Container,
    count: i32,
) -> AppResult<Container> {
    let updated = ledger::occupy_container(container, count);
    if updated.current_plants > updated.max_plants {
        tracing::warn!(
            container_id = %container.id,
            current = updated.current_plants,
            max = updated.max_plants,
            "Container is over capacity"
        );
    }
    save_occupancy(conn, &updated).await?;
    Ok(updated)
}

/// Free `count` slots in a container
pub(crate) async fn release(
    conn: &mut PgConnection,
    user_id: Uuid,
    container_id: Uuid,
    count: i32,
) -> AppResult<Container> {
    let container = lock_container(conn, user_id, container_id).await?;
    let updated = ledger::release_container(&container, count);
    save_occupancy(conn, &updated).await?;
    Ok(updated)
}

impl ContainerService {
    /// Create a new ContainerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<ContainerView>> {
        let containers = sqlx::query_as::<_, Container>(&format!(
            "SELECT {} FROM containers WHERE user_id = $1 ORDER BY name",
            CONTAINER_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(containers.into_iter().map(ContainerView::from).collect())
    }

    pub async fn get(&self, user_id: Uuid, container_id: Uuid) -> AppResult<Container> {
        sqlx::query_as::<_, Container>(&format!(
            "SELECT {} FROM containers WHERE id = $1 AND user_id = $2",
            CONTAINER_COLUMNS
        ))
        .bind(container_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Container".to_string()))
    }

    pub async fn create(&self, user_id: Uuid, input: CreateContainerInput) -> AppResult<Container> {
        check("name", validate_required(&input.name))?;
        check("volume_gallons", validate_container_volume(input.volume_gallons))?;

        let kind = match input.kind.as_deref() {
            None => ContainerKind::default(),
            Some(value) => ContainerKind::from_str(value).ok_or_else(|| {
                AppError::validation("kind", format!("Unknown container kind '{}'", value))
            })?,
        };

        match (kind, input.hydro_system_id) {
            (ContainerKind::HydroBag, None) => {
                return Err(AppError::validation(
                    "hydro_system_id",
                    "Hydro bags must belong to a hydroponic system",
                ));
            }
            (ContainerKind::GrowBag, Some(_)) => {
                return Err(AppError::validation(
                    "hydro_system_id",
                    "Grow bags cannot be attached to a hydroponic system",
                ));
            }
            (ContainerKind::HydroBag, Some(system_id)) => {
                let owned: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM hydro_systems WHERE id = $1 AND user_id = $2",
                )
                .bind(system_id)
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;
                if owned == 0 {
                    return Err(AppError::NotFound("Hydro system".to_string()));
                }
            }
            (ContainerKind::GrowBag, None) => {}
        }

        let size = input
            .size_category
            .as_deref()
            .map(SizeCategory::from_str_lossy)
            .unwrap_or_default();
        let max_plants = input
            .max_plants
            .unwrap_or_else(|| capacity::capacity_for(input.volume_gallons, size));
        check("max_plants", validate_quantity(max_plants))?;

        let container = sqlx::query_as::<_, Container>(&format!(
            r#"
            INSERT INTO containers (user_id, name, kind, volume_gallons, location, max_plants,
                                    hydro_system_id, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            CONTAINER_COLUMNS
        ))
        .bind(user_id)
        .bind(input.name.trim())
        .bind(kind)
        .bind(input.volume_gallons)
        .bind(&input.location)
        .bind(max_plants)
        .bind(input.hydro_system_id)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(container_id = %container.id, max_plants, "Added container");
        Ok(container)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        container_id: Uuid,
        input: UpdateContainerInput,
    ) -> AppResult<Container> {
        let mut container = self.get(user_id, container_id).await?;

        if let Some(name) = input.name {
            check("name", validate_required(&name))?;
            container.name = name.trim().to_string();
        }
        if input.location.is_some() {
            container.location = input.location;
        }
        if let Some(max_plants) = input.max_plants {
            check("max_plants", validate_quantity(max_plants))?;
            container.max_plants = max_plants;
        }
        if input.notes.is_some() {
            container.notes = input.notes;
        }

        let updated = sqlx::query_as::<_, Container>(&format!(
            r#"
            UPDATE containers SET name = $3, location = $4, max_plants = $5, notes = $6
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            CONTAINER_COLUMNS
        ))
        .bind(container_id)
        .bind(user_id)
        .bind(&container.name)
        .bind(&container.location)
        .bind(container.max_plants)
        .bind(&container.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(updated)
    }

    /// Delete a container with no living plants; dead plants are detached
    pub async fn delete(&self, user_id: Uuid, container_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        lock_container(&mut tx, user_id, container_id).await?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM plants WHERE container_id = $1 AND status <> 'dead'",
        )
        .bind(container_id)
        .fetch_one(&mut *tx)
        .await?;
        ledger::check_container_deletable(active)?;

        sqlx::query("UPDATE plants SET container_id = NULL WHERE container_id = $1")
            .bind(container_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM containers WHERE id = $1 AND user_id = $2")
            .bind(container_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// How many plants of a seed lot's variety fit in a container
    pub async fn recommend(
        &self,
        user_id: Uuid,
        container_id: Uuid,
        seed_id: Uuid,
    ) -> AppResult<CapacityRecommendation> {
        let container = self.get(user_id, container_id).await?;
        let seed = SeedService::new(self.db.clone()).get(user_id, seed_id).await?;

        Ok(capacity::recommend(
            &container.name,
            container.volume_gallons,
            &seed.variety_name,
            seed.size_category,
            container.current_plants,
        ))
    }
}
