//! Plant service: transplanting, status changes and progress logs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::container::{lock_container, occupy, release};
use super::harvest::HARVEST_COLUMNS;
use super::seed::lock_seed;
use super::seedling::{lock_batch, save_batch};
use crate::error::{AppError, AppResult};
use crate::models::{
    HarvestEvent, PlantRecord, PlantStatus, PlantSummaryRow, ProgressLog, SeedLot, SeedlingBatch,
    YieldTotals,
};
use shared::ledger;
use shared::schedule;
use shared::validation::{check, validate_rating, validate_transplant_quantity};

pub(crate) const PLANT_COLUMNS: &str = "id, user_id, seed_id, seedling_id, container_id, plant_name, \
     transplant_date, expected_harvest_date, first_harvest_date, last_harvest_date, status, \
     health_rating, notes, created_at";

const LOG_COLUMNS: &str = "id, plant_id, log_date, height_inches, growth_stage, observations, \
     issues, actions_taken, created_at";

/// Plant service for managing plants in the garden
#[derive(Clone)]
pub struct PlantService {
    db: PgPool,
}

/// Input for transplanting plants into the garden
#[derive(Debug, Deserialize)]
pub struct CreatePlantInput {
    /// Required unless a seedling batch is given
    pub seed_id: Option<Uuid>,
    pub seedling_id: Option<Uuid>,
    pub container_id: Option<Uuid>,
    pub plant_name: Option<String>,
    pub transplant_date: NaiveDate,
    /// Number of plants to create, one record each
    pub quantity: Option<i32>,
    pub health_rating: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlantInput {
    pub plant_name: Option<String>,
    pub expected_harvest_date: Option<NaiveDate>,
    pub health_rating: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlantStatusInput {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLogInput {
    pub log_date: NaiveDate,
    pub height_inches: Option<Decimal>,
    pub growth_stage: Option<String>,
    pub observations: Option<String>,
    pub issues: Option<String>,
    pub actions_taken: Option<String>,
    /// Updates the plant's health rating when given
    pub health_rating: Option<i32>,
}

/// Plant with its harvest history and progress logs
#[derive(Debug, Serialize)]
pub struct PlantDetail {
    pub plant: PlantRecord,
    pub variety_name: String,
    pub days_since_transplant: i64,
    pub harvests: Vec<HarvestEvent>,
    pub totals: YieldTotals,
    pub logs: Vec<ProgressLog>,
}

/// Where and how many plants to create
pub(crate) struct Placement<'a> {
    pub seed: &'a SeedLot,
    pub seedling_id: Option<Uuid>,
    pub container_id: Option<Uuid>,
    pub plant_name: Option<&'a str>,
    pub transplant_date: NaiveDate,
    pub quantity: i32,
    pub health_rating: Option<i32>,
    pub notes: Option<&'a str>,
}

/// Take seedlings out of a batch for transplanting and save the batch
pub(crate) async fn consume_seedlings(
    conn: &mut PgConnection,
    user_id: Uuid,
    batch_id: Uuid,
    quantity: i32,
    transplant_date: NaiveDate,
) -> AppResult<SeedlingBatch> {
    let batch = lock_batch(conn, user_id, batch_id).await?;
    let outcome = ledger::apply_transplant_consumption(&batch, quantity, transplant_date)?;

    if outcome.shortfall > 0 {
        tracing::warn!(
            %batch_id,
            available = batch.available_quantity(),
            requested = quantity,
            shortfall = outcome.shortfall,
            "Transplanting more seedlings than the batch holds"
        );
    }

    save_batch(conn, &outcome.batch).await
}

/// Insert one record per plant and bump the container's occupancy
pub(crate) async fn insert_plants(
    conn: &mut PgConnection,
    user_id: Uuid,
    placement: Placement<'_>,
) -> AppResult<Vec<PlantRecord>> {
    let expected_harvest =
        schedule::harvest_estimate(placement.transplant_date, placement.seed.days_to_maturity);
    let names = ledger::plant_names(
        placement.plant_name,
        &placement.seed.variety_name,
        placement.quantity,
    );

    let mut plants = Vec::with_capacity(names.len());
    for name in names {
        let plant = sqlx::query_as::<_, PlantRecord>(&format!(
            r#"
            INSERT INTO plants (user_id, seed_id, seedling_id, container_id, plant_name,
                                transplant_date, expected_harvest_date, status, health_rating, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            PLANT_COLUMNS
        ))
        .bind(user_id)
        .bind(placement.seed.id)
        .bind(placement.seedling_id)
        .bind(placement.container_id)
        .bind(name)
        .bind(placement.transplant_date)
        .bind(expected_harvest)
        .bind(PlantStatus::Growing)
        .bind(placement.health_rating)
        .bind(placement.notes)
        .fetch_one(&mut *conn)
        .await?;
        plants.push(plant);
    }

    if let Some(container_id) = placement.container_id {
        let container = lock_container(conn, user_id, container_id).await?;
        occupy(conn, &container, plants.len() as i32).await?;
    }

    Ok(plants)
}

pub(crate) async fn lock_plant(
    conn: &mut PgConnection,
    user_id: Uuid,
    plant_id: Uuid,
) -> AppResult<PlantRecord> {
    sqlx::query_as::<_, PlantRecord>(&format!(
        "SELECT {} FROM plants WHERE id = $1 AND user_id = $2 FOR UPDATE",
        PLANT_COLUMNS
    ))
    .bind(plant_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Plant".to_string()))
}

fn parse_plant_status(value: &str) -> AppResult<PlantStatus> {
    PlantStatus::from_str(value)
        .ok_or_else(|| AppError::validation("status", format!("Unknown plant status '{}'", value)))
}

impl PlantService {
    /// Create a new PlantService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Plants with seed and container names; dead plants only when asked for
    pub async fn list(&self, user_id: Uuid, include_dead: bool) -> AppResult<Vec<PlantSummaryRow>> {
        let rows = sqlx::query_as::<_, PlantSummaryRow>(
            r#"
            SELECT p.id, p.plant_name, s.variety_name, s.plant_type, c.name AS container_name,
                   p.transplant_date, p.expected_harvest_date, p.status
            FROM plants p
            JOIN seeds s ON s.id = p.seed_id
            LEFT JOIN containers c ON c.id = p.container_id
            WHERE p.user_id = $1 AND ($2 OR p.status <> 'dead')
            ORDER BY p.transplant_date DESC
            "#,
        )
        .bind(user_id)
        .bind(include_dead)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Full records, used by the calendar
    pub async fn list_records(&self, user_id: Uuid) -> AppResult<Vec<PlantRecord>> {
        let plants = sqlx::query_as::<_, PlantRecord>(&format!(
            "SELECT {} FROM plants WHERE user_id = $1",
            PLANT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(plants)
    }

    pub async fn get(&self, user_id: Uuid, plant_id: Uuid) -> AppResult<PlantRecord> {
        sqlx::query_as::<_, PlantRecord>(&format!(
            "SELECT {} FROM plants WHERE id = $1 AND user_id = $2",
            PLANT_COLUMNS
        ))
        .bind(plant_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Plant".to_string()))
    }

    pub async fn detail(&self, user_id: Uuid, plant_id: Uuid, today: NaiveDate) -> AppResult<PlantDetail> {
        let plant = self.get(user_id, plant_id).await?;

        let variety_name: String = sqlx::query_scalar("SELECT variety_name FROM seeds WHERE id = $1")
            .bind(plant.seed_id)
            .fetch_one(&self.db)
            .await?;

        let harvests = sqlx::query_as::<_, HarvestEvent>(&format!(
            "SELECT {} FROM harvests WHERE plant_id = $1 ORDER BY harvest_date DESC",
            HARVEST_COLUMNS
        ))
        .bind(plant_id)
        .fetch_all(&self.db)
        .await?;

        let logs = self.list_logs(user_id, plant_id).await?;

        Ok(PlantDetail {
            days_since_transplant: plant.days_since_transplant(today),
            totals: YieldTotals::from_harvests(&harvests),
            plant,
            variety_name,
            harvests,
            logs,
        })
    }

    /// Transplant one or more plants, drawing from a seedling batch when given
    pub async fn create(&self, user_id: Uuid, input: CreatePlantInput) -> AppResult<Vec<PlantRecord>> {
        let quantity = input.quantity.unwrap_or(1);
        check("quantity", validate_transplant_quantity(quantity))?;
        if let Some(rating) = input.health_rating {
            check("health_rating", validate_rating(rating))?;
        }

        let mut tx = self.db.begin().await?;

        // Lock order container, batch, seed matches hydro plantings
        if let Some(container_id) = input.container_id {
            let container = lock_container(&mut tx, user_id, container_id).await?;
            if container.is_hydro() {
                return Err(AppError::validation(
                    "container_id",
                    "Use the hydroponics endpoints to plant into a hydro bag",
                ));
            }
        }

        let batch = match input.seedling_id {
            Some(batch_id) => {
                Some(consume_seedlings(&mut tx, user_id, batch_id, quantity, input.transplant_date).await?)
            }
            None => None,
        };
        let seed_id = match (input.seed_id, &batch) {
            (Some(seed_id), _) => seed_id,
            (None, Some(batch)) => batch.seed_id,
            (None, None) => {
                return Err(AppError::validation(
                    "seed_id",
                    "A seed or seedling batch is required",
                ));
            }
        };
        if matches!(&batch, Some(batch) if batch.seed_id != seed_id) {
            return Err(AppError::validation(
                "seedling_id",
                "Seedling batch was grown from a different seed lot",
            ));
        }
        let seed = lock_seed(&mut tx, user_id, seed_id).await?;

        let plants = insert_plants(
            &mut tx,
            user_id,
            Placement {
                seed: &seed,
                seedling_id: input.seedling_id,
                container_id: input.container_id,
                plant_name: input.plant_name.as_deref(),
                transplant_date: input.transplant_date,
                quantity,
                health_rating: input.health_rating,
                notes: input.notes.as_deref(),
            },
        )
        .await?;

        tx.commit().await?;
        tracing::info!(count = plants.len(), seed_id = %seed.id, "Transplanted plants");

        Ok(plants)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        plant_id: Uuid,
        input: UpdatePlantInput,
    ) -> AppResult<PlantRecord> {
        let mut plant = self.get(user_id, plant_id).await?;

        if input.plant_name.is_some() {
            plant.plant_name = input.plant_name;
        }
        if input.expected_harvest_date.is_some() {
            plant.expected_harvest_date = input.expected_harvest_date;
        }
        if let Some(rating) = input.health_rating {
            check("health_rating", validate_rating(rating))?;
            plant.health_rating = Some(rating);
        }
        if input.notes.is_some() {
            plant.notes = input.notes;
        }

        let updated = sqlx::query_as::<_, PlantRecord>(&format!(
            r#"
            UPDATE plants SET plant_name = $3, expected_harvest_date = $4, health_rating = $5, notes = $6
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            PLANT_COLUMNS
        ))
        .bind(plant_id)
        .bind(user_id)
        .bind(&plant.plant_name)
        .bind(plant.expected_harvest_date)
        .bind(plant.health_rating)
        .bind(&plant.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(updated)
    }

    /// Change a plant's status; a plant that dies gives up its container slot
    pub async fn update_status(
        &self,
        user_id: Uuid,
        plant_id: Uuid,
        input: PlantStatusInput,
    ) -> AppResult<PlantRecord> {
        let next = parse_plant_status(&input.status)?;

        let mut tx = self.db.begin().await?;
        let plant = lock_plant(&mut tx, user_id, plant_id).await?;
        let change = ledger::apply_plant_status_change(&plant, next)?;

        if let (true, Some(container_id)) = (change.releases_container, plant.container_id) {
            release(&mut tx, user_id, container_id, 1).await?;
        }

        let updated = sqlx::query_as::<_, PlantRecord>(&format!(
            "UPDATE plants SET status = $2 WHERE id = $1 RETURNING {}",
            PLANT_COLUMNS
        ))
        .bind(plant_id)
        .bind(change.plant.status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a plant with its harvests and logs, freeing its container slot
    pub async fn delete(&self, user_id: Uuid, plant_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        let plant = lock_plant(&mut tx, user_id, plant_id).await?;

        if let (true, Some(container_id)) = (ledger::releases_container_on_delete(&plant), plant.container_id) {
            release(&mut tx, user_id, container_id, 1).await?;
        }

        sqlx::query("DELETE FROM plants WHERE id = $1 AND user_id = $2")
            .bind(plant_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(%plant_id, "Deleted plant");
        Ok(())
    }

    pub async fn list_logs(&self, user_id: Uuid, plant_id: Uuid) -> AppResult<Vec<ProgressLog>> {
        let logs = sqlx::query_as::<_, ProgressLog>(&format!(
            r#"
            SELECT {} FROM progress_logs
            WHERE plant_id = $1 AND EXISTS (SELECT 1 FROM plants WHERE id = $1 AND user_id = $2)
            ORDER BY log_date DESC
            "#,
            LOG_COLUMNS
        ))
        .bind(plant_id)
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }

    pub async fn add_log(
        &self,
        user_id: Uuid,
        plant_id: Uuid,
        input: CreateLogInput,
    ) -> AppResult<ProgressLog> {
        if matches!(input.height_inches, Some(h) if h < Decimal::ZERO) {
            return Err(AppError::validation("height_inches", "Height cannot be negative"));
        }
        if let Some(rating) = input.health_rating {
            check("health_rating", validate_rating(rating))?;
        }

        let mut tx = self.db.begin().await?;
        lock_plant(&mut tx, user_id, plant_id).await?;

        let log = sqlx::query_as::<_, ProgressLog>(&format!(
            r#"
            INSERT INTO progress_logs (plant_id, log_date, height_inches, growth_stage,
                                       observations, issues, actions_taken)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            LOG_COLUMNS
        ))
        .bind(plant_id)
        .bind(input.log_date)
        .bind(input.height_inches)
        .bind(&input.growth_stage)
        .bind(&input.observations)
        .bind(&input.issues)
        .bind(&input.actions_taken)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(rating) = input.health_rating {
            sqlx::query("UPDATE plants SET health_rating = $2 WHERE id = $1")
                .bind(plant_id)
                .bind(rating)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(log)
    }
}
