//! Seedling batch service: sowing, germination, pot-up and status changes

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::seed::{lock_seed, save_seed_quantity, SeedService};
use crate::error::{AppError, AppResult};
use crate::models::{SeedLot, SeedlingBatch, SeedlingStatus, SeedlingView};
use shared::ledger::{self, Sowing};

pub(crate) const SEEDLING_COLUMNS: &str = "id, user_id, seed_id, sown_date, germination_date, \
     quantity_started, quantity_viable, expected_transplant_date, actual_transplant_date, \
     potted_up_date, pot_size, quantity_potted_up, location, status, notes, created_at";

/// Seedling service for managing seedling batches
#[derive(Clone)]
pub struct SeedlingService {
    db: PgPool,
}

/// Input for sowing a new batch
#[derive(Debug, Deserialize)]
pub struct SowInput {
    pub seed_id: Uuid,
    pub sown_date: NaiveDate,
    pub germination_date: Option<NaiveDate>,
    pub quantity_started: i32,
    pub quantity_viable: Option<i32>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GerminationInput {
    pub germination_date: NaiveDate,
    pub quantity_viable: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct PotUpInput {
    pub potted_up_date: NaiveDate,
    pub pot_size: Option<String>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: String,
}

/// Load a batch inside a transaction, locking it until commit
pub(crate) async fn lock_batch(
    conn: &mut PgConnection,
    user_id: Uuid,
    batch_id: Uuid,
) -> AppResult<SeedlingBatch> {
    sqlx::query_as::<_, SeedlingBatch>(&format!(
        "SELECT {} FROM seedlings WHERE id = $1 AND user_id = $2 FOR UPDATE",
        SEEDLING_COLUMNS
    ))
    .bind(batch_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Seedling batch".to_string()))
}

/// Write back every field the ledger may change
pub(crate) async fn save_batch(
    conn: &mut PgConnection,
    batch: &SeedlingBatch,
) -> AppResult<SeedlingBatch> {
    let saved = sqlx::query_as::<_, SeedlingBatch>(&format!(
        r#"
        UPDATE seedlings
        SET germination_date = $2, quantity_viable = $3, actual_transplant_date = $4,
            potted_up_date = $5, pot_size = $6, quantity_potted_up = $7, status = $8
        WHERE id = $1
        RETURNING {}
        "#,
        SEEDLING_COLUMNS
    ))
    .bind(batch.id)
    .bind(batch.germination_date)
    .bind(batch.quantity_viable)
    .bind(batch.actual_transplant_date)
    .bind(batch.potted_up_date)
    .bind(&batch.pot_size)
    .bind(batch.quantity_potted_up)
    .bind(batch.status)
    .fetch_one(&mut *conn)
    .await?;

    Ok(saved)
}

pub(crate) fn parse_seedling_status(value: &str) -> AppResult<SeedlingStatus> {
    SeedlingStatus::from_str(value)
        .ok_or_else(|| AppError::validation("status", format!("Unknown seedling status '{}'", value)))
}

fn to_view(batch: SeedlingBatch, seeds: &HashMap<Uuid, SeedLot>, today: NaiveDate) -> SeedlingView {
    let (variety_name, plant_type) = seeds
        .get(&batch.seed_id)
        .map(|s| (s.variety_name.clone(), s.plant_type.clone()))
        .unwrap_or_else(|| ("Unknown variety".to_string(), "unknown".to_string()));

    SeedlingView {
        days_since_sown: batch.days_since_sown(today),
        days_since_germination: batch.days_since_germination(today),
        days_to_germinate: batch.days_to_germinate(),
        days_until_transplant: batch.days_until_transplant(today),
        days_since_potted_up: batch.days_since_potted_up(today),
        ready_for_pot_up: ledger::is_ready_for_pot_up(&batch, today),
        variety_name,
        plant_type,
        batch,
    }
}

impl SeedlingService {
    /// Create a new SeedlingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_batches(&self, user_id: Uuid) -> AppResult<Vec<SeedlingBatch>> {
        let batches = sqlx::query_as::<_, SeedlingBatch>(&format!(
            "SELECT {} FROM seedlings WHERE user_id = $1 ORDER BY sown_date DESC",
            SEEDLING_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(batches)
    }

    /// Batches with seed names and ages; terminal batches only when asked for
    pub async fn list(
        &self,
        user_id: Uuid,
        include_finished: bool,
        today: NaiveDate,
    ) -> AppResult<Vec<SeedlingView>> {
        let seeds: HashMap<Uuid, SeedLot> = SeedService::new(self.db.clone())
            .list(user_id)
            .await?
            .into_iter()
            .map(|seed| (seed.id, seed))
            .collect();

        Ok(self
            .list_batches(user_id)
            .await?
            .into_iter()
            .filter(|batch| include_finished || batch.status.is_active())
            .map(|batch| to_view(batch, &seeds, today))
            .collect())
    }

    /// Growing batches that germinated at least two weeks ago
    pub async fn ready_for_pot_up(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<Vec<SeedlingView>> {
        Ok(self
            .list(user_id, false, today)
            .await?
            .into_iter()
            .filter(|view| view.ready_for_pot_up)
            .collect())
    }

    pub async fn get(&self, user_id: Uuid, batch_id: Uuid) -> AppResult<SeedlingBatch> {
        sqlx::query_as::<_, SeedlingBatch>(&format!(
            "SELECT {} FROM seedlings WHERE id = $1 AND user_id = $2",
            SEEDLING_COLUMNS
        ))
        .bind(batch_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Seedling batch".to_string()))
    }

    /// Sow a batch and take its seeds out of inventory in one transaction
    pub async fn sow(&self, user_id: Uuid, input: SowInput) -> AppResult<SeedlingBatch> {
        let mut tx = self.db.begin().await?;
        let seed = lock_seed(&mut tx, user_id, input.seed_id).await?;

        let (new_batch, outcome) = ledger::prepare_sowing(
            &seed,
            Sowing {
                sown_date: input.sown_date,
                germination_date: input.germination_date,
                quantity_started: input.quantity_started,
                quantity_viable: input.quantity_viable,
                location: input.location,
                notes: input.notes,
            },
        )?;

        if outcome.shortfall > 0 {
            tracing::warn!(
                seed_id = %seed.id,
                on_hand = seed.quantity,
                requested = input.quantity_started,
                shortfall = outcome.shortfall,
                "Sowing more seeds than recorded in inventory; clamping to zero"
            );
        }
        save_seed_quantity(&mut tx, &outcome.seed).await?;

        let batch = sqlx::query_as::<_, SeedlingBatch>(&format!(
            r#"
            INSERT INTO seedlings (user_id, seed_id, sown_date, germination_date, quantity_started,
                                   quantity_viable, expected_transplant_date, location, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            SEEDLING_COLUMNS
        ))
        .bind(user_id)
        .bind(new_batch.seed_id)
        .bind(new_batch.sown_date)
        .bind(new_batch.germination_date)
        .bind(new_batch.quantity_started)
        .bind(new_batch.quantity_viable)
        .bind(new_batch.expected_transplant_date)
        .bind(&new_batch.location)
        .bind(new_batch.status)
        .bind(&new_batch.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(batch_id = %batch.id, seed_id = %seed.id, "Sowed seedling batch");

        Ok(batch)
    }

    pub async fn record_germination(
        &self,
        user_id: Uuid,
        batch_id: Uuid,
        input: GerminationInput,
    ) -> AppResult<SeedlingBatch> {
        let mut tx = self.db.begin().await?;
        let batch = lock_batch(&mut tx, user_id, batch_id).await?;

        if input.germination_date < batch.sown_date {
            return Err(AppError::validation(
                "germination_date",
                "Germination date cannot be before the sown date",
            ));
        }

        let updated = ledger::apply_germination(&batch, input.germination_date, input.quantity_viable)?;
        let saved = save_batch(&mut tx, &updated).await?;
        tx.commit().await?;

        Ok(saved)
    }

    pub async fn pot_up(
        &self,
        user_id: Uuid,
        batch_id: Uuid,
        input: PotUpInput,
    ) -> AppResult<SeedlingBatch> {
        let mut tx = self.db.begin().await?;
        let batch = lock_batch(&mut tx, user_id, batch_id).await?;

        let updated = ledger::apply_pot_up(&batch, input.potted_up_date, input.pot_size, input.quantity)?;
        let saved = save_batch(&mut tx, &updated).await?;
        tx.commit().await?;

        tracing::info!(%batch_id, potted = ?saved.quantity_potted_up, "Potted up seedling batch");
        Ok(saved)
    }

    pub async fn update_status(
        &self,
        user_id: Uuid,
        batch_id: Uuid,
        input: StatusInput,
    ) -> AppResult<SeedlingBatch> {
        let next = parse_seedling_status(&input.status)?;

        let mut tx = self.db.begin().await?;
        let batch = lock_batch(&mut tx, user_id, batch_id).await?;
        let updated = ledger::apply_status_change(&batch, next)?;
        let saved = save_batch(&mut tx, &updated).await?;
        tx.commit().await?;

        Ok(saved)
    }

    /// Delete a batch no plant was transplanted from
    pub async fn delete(&self, user_id: Uuid, batch_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        lock_batch(&mut tx, user_id, batch_id).await?;

        let plant_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM plants WHERE seedling_id = $1")
                .bind(batch_id)
                .fetch_one(&mut *tx)
                .await?;
        ledger::check_batch_deletable(plant_count)?;

        sqlx::query("DELETE FROM seedlings WHERE id = $1 AND user_id = $2")
            .bind(batch_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
