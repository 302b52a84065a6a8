//! Hydroponics service: systems, nutrient readings and hydro bag plantings

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::container::{lock_container, CONTAINER_COLUMNS};
use super::plant::{consume_seedlings, insert_plants, Placement};
use super::seed::{lock_seed, save_seed_quantity};
use crate::error::{AppError, AppResult};
use crate::models::{Container, HydroSystem, HydroSystemStatus, NutrientReading, PlantRecord};
use shared::ledger;
use shared::validation::{check, validate_ec, validate_ph, validate_required, validate_transplant_quantity};
use shared::GardenError;

const SYSTEM_COLUMNS: &str =
    "id, user_id, name, system_type, reservoir_gallons, location, status, notes, created_at";

const READING_COLUMNS: &str = "id, system_id, reading_date, ec, ph, water_temp_f, notes, created_at";

/// Hydroponics service
#[derive(Clone)]
pub struct HydroService {
    db: PgPool,
}

#[derive(Debug, Deserialize)]
pub struct CreateSystemInput {
    pub name: String,
    pub system_type: String,
    pub reservoir_gallons: Option<Decimal>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SystemStatusInput {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateReadingInput {
    pub reading_date: NaiveDate,
    pub ec: Option<Decimal>,
    pub ph: Option<Decimal>,
    pub water_temp_f: Option<Decimal>,
    pub notes: Option<String>,
}

/// Input for planting into a hydro bag, from a seedling batch or directly from seed
#[derive(Debug, Deserialize)]
pub struct CreateHydroPlantInput {
    pub container_id: Uuid,
    pub seedling_id: Option<Uuid>,
    pub seed_id: Option<Uuid>,
    pub plant_name: Option<String>,
    pub transplant_date: NaiveDate,
    pub quantity: Option<i32>,
    pub notes: Option<String>,
}

/// System with its bags and latest reading
#[derive(Debug, Serialize)]
pub struct SystemDetail {
    pub system: HydroSystem,
    pub bags: Vec<Container>,
    pub latest_reading: Option<NutrientReading>,
}

async fn lock_system(
    conn: &mut PgConnection,
    user_id: Uuid,
    system_id: Uuid,
) -> AppResult<HydroSystem> {
    sqlx::query_as::<_, HydroSystem>(&format!(
        "SELECT {} FROM hydro_systems WHERE id = $1 AND user_id = $2 FOR UPDATE",
        SYSTEM_COLUMNS
    ))
    .bind(system_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Hydro system".to_string()))
}

impl HydroService {
    /// Create a new HydroService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_systems(&self, user_id: Uuid) -> AppResult<Vec<HydroSystem>> {
        let systems = sqlx::query_as::<_, HydroSystem>(&format!(
            "SELECT {} FROM hydro_systems WHERE user_id = $1 ORDER BY name",
            SYSTEM_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(systems)
    }

    pub async fn get_system(&self, user_id: Uuid, system_id: Uuid) -> AppResult<SystemDetail> {
        let system = sqlx::query_as::<_, HydroSystem>(&format!(
            "SELECT {} FROM hydro_systems WHERE id = $1 AND user_id = $2",
            SYSTEM_COLUMNS
        ))
        .bind(system_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Hydro system".to_string()))?;

        let bags = sqlx::query_as::<_, Container>(&format!(
            "SELECT {} FROM containers WHERE hydro_system_id = $1 ORDER BY name",
            CONTAINER_COLUMNS
        ))
        .bind(system_id)
        .fetch_all(&self.db)
        .await?;

        let latest_reading = sqlx::query_as::<_, NutrientReading>(&format!(
            "SELECT {} FROM nutrient_readings WHERE system_id = $1 ORDER BY reading_date DESC, created_at DESC LIMIT 1",
            READING_COLUMNS
        ))
        .bind(system_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(SystemDetail {
            system,
            bags,
            latest_reading,
        })
    }

    pub async fn create_system(&self, user_id: Uuid, input: CreateSystemInput) -> AppResult<HydroSystem> {
        check("name", validate_required(&input.name))?;
        check("system_type", validate_required(&input.system_type))?;
        let reservoir = input.reservoir_gallons.unwrap_or(Decimal::ZERO);
        if reservoir < Decimal::ZERO {
            return Err(AppError::validation("reservoir_gallons", "Reservoir size cannot be negative"));
        }

        let system = sqlx::query_as::<_, HydroSystem>(&format!(
            r#"
            INSERT INTO hydro_systems (user_id, name, system_type, reservoir_gallons, location, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            SYSTEM_COLUMNS
        ))
        .bind(user_id)
        .bind(input.name.trim())
        .bind(input.system_type.trim().to_lowercase())
        .bind(reservoir)
        .bind(&input.location)
        .bind(HydroSystemStatus::Active)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(system)
    }

    pub async fn update_status(
        &self,
        user_id: Uuid,
        system_id: Uuid,
        input: SystemStatusInput,
    ) -> AppResult<HydroSystem> {
        let status = HydroSystemStatus::from_str(&input.status).ok_or_else(|| {
            AppError::validation("status", format!("Unknown system status '{}'", input.status))
        })?;

        let system = sqlx::query_as::<_, HydroSystem>(&format!(
            "UPDATE hydro_systems SET status = $3 WHERE id = $1 AND user_id = $2 RETURNING {}",
            SYSTEM_COLUMNS
        ))
        .bind(system_id)
        .bind(user_id)
        .bind(status)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Hydro system".to_string()))?;

        tracing::info!(%system_id, %status, "Hydro system status changed");
        Ok(system)
    }

    /// Delete a system with no hydro bags attached
    pub async fn delete_system(&self, user_id: Uuid, system_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        lock_system(&mut tx, user_id, system_id).await?;

        let bags: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM containers WHERE hydro_system_id = $1")
            .bind(system_id)
            .fetch_one(&mut *tx)
            .await?;
        if bags > 0 {
            return Err(GardenError::blocked("hydro system", "hydro bag(s)", bags).into());
        }

        sqlx::query("DELETE FROM hydro_systems WHERE id = $1")
            .bind(system_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_readings(&self, user_id: Uuid, system_id: Uuid) -> AppResult<Vec<NutrientReading>> {
        let readings = sqlx::query_as::<_, NutrientReading>(&format!(
            r#"
            SELECT {} FROM nutrient_readings
            WHERE system_id = $1 AND EXISTS (SELECT 1 FROM hydro_systems WHERE id = $1 AND user_id = $2)
            ORDER BY reading_date DESC, created_at DESC
            "#,
            READING_COLUMNS
        ))
        .bind(system_id)
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(readings)
    }

    pub async fn add_reading(
        &self,
        user_id: Uuid,
        system_id: Uuid,
        input: CreateReadingInput,
    ) -> AppResult<NutrientReading> {
        if let Some(ec) = input.ec {
            check("ec", validate_ec(ec))?;
        }
        if let Some(ph) = input.ph {
            check("ph", validate_ph(ph))?;
        }

        let mut tx = self.db.begin().await?;
        lock_system(&mut tx, user_id, system_id).await?;

        let reading = sqlx::query_as::<_, NutrientReading>(&format!(
            r#"
            INSERT INTO nutrient_readings (system_id, reading_date, ec, ph, water_temp_f, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            READING_COLUMNS
        ))
        .bind(system_id)
        .bind(input.reading_date)
        .bind(input.ec)
        .bind(input.ph)
        .bind(input.water_temp_f)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(reading)
    }

    /// Plant into a hydro bag of a running system
    ///
    /// From a seedling batch the same consumption rule as soil transplants
    /// applies; direct plantings take their seeds out of the seed lot.
    pub async fn create_plants(
        &self,
        user_id: Uuid,
        input: CreateHydroPlantInput,
    ) -> AppResult<Vec<PlantRecord>> {
        let quantity = input.quantity.unwrap_or(1);
        check("quantity", validate_transplant_quantity(quantity))?;

        let mut tx = self.db.begin().await?;

        let container = lock_container(&mut tx, user_id, input.container_id).await?;
        let system_id = match (container.is_hydro(), container.hydro_system_id) {
            (true, Some(system_id)) => system_id,
            _ => {
                return Err(AppError::validation("container_id", "Container is not a hydro bag"));
            }
        };
        let system = lock_system(&mut tx, user_id, system_id).await?;
        if !system.status.accepts_plants() {
            return Err(AppError::validation(
                "container_id",
                format!("Hydro system '{}' is {}", system.name, system.status),
            ));
        }

        let (seed, seedling_id) = match (input.seedling_id, input.seed_id) {
            (Some(batch_id), _) => {
                let batch = consume_seedlings(&mut tx, user_id, batch_id, quantity, input.transplant_date).await?;
                (lock_seed(&mut tx, user_id, batch.seed_id).await?, Some(batch_id))
            }
            (None, Some(seed_id)) => {
                let seed = lock_seed(&mut tx, user_id, seed_id).await?;
                let outcome = ledger::apply_sow(&seed, quantity)?;
                if outcome.shortfall > 0 {
                    tracing::warn!(
                        %seed_id,
                        on_hand = seed.quantity,
                        requested = quantity,
                        "Direct planting more seeds than recorded in inventory; clamping to zero"
                    );
                }
                save_seed_quantity(&mut tx, &outcome.seed).await?;
                (outcome.seed, None)
            }
            (None, None) => {
                return Err(AppError::validation(
                    "seed_id",
                    "A seed or seedling batch is required",
                ));
            }
        };

        let plants = insert_plants(
            &mut tx,
            user_id,
            Placement {
                seed: &seed,
                seedling_id,
                container_id: Some(container.id),
                plant_name: input.plant_name.as_deref(),
                transplant_date: input.transplant_date,
                quantity,
                health_rating: None,
                notes: input.notes.as_deref(),
            },
        )
        .await?;

        tx.commit().await?;
        tracing::info!(count = plants.len(), container_id = %container.id, "Planted into hydro bag");

        Ok(plants)
    }
}
