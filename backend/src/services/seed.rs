//! Seed inventory service

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{SeedLot, SizeCategory, DEFAULT_WEEKS_TO_TRANSPLANT};
use shared::ledger;
use shared::schedule::{self, SeedSchedule};
use shared::validation::{
    check, validate_days_to_maturity, validate_germination_rate, validate_quantity,
    validate_required, validate_weeks_to_transplant,
};

pub(crate) const SEED_COLUMNS: &str = "id, user_id, variety_name, plant_type, quantity, purchase_date, \
     expiration_date, germination_rate, supplier, days_to_maturity, weeks_to_transplant, \
     size_category, notes, created_at";

/// Seed service for managing seed lots
#[derive(Clone)]
pub struct SeedService {
    db: PgPool,
}

/// Input for adding a seed lot
#[derive(Debug, Deserialize)]
pub struct CreateSeedInput {
    pub variety_name: String,
    pub plant_type: String,
    #[serde(default)]
    pub quantity: i32,
    pub purchase_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub germination_rate: Option<Decimal>,
    pub supplier: Option<String>,
    pub days_to_maturity: Option<i32>,
    pub weeks_to_transplant: Option<i32>,
    /// compact, medium or large; anything else is stored as medium
    pub size_category: Option<String>,
    pub notes: Option<String>,
}

/// Input for updating a seed lot
#[derive(Debug, Deserialize)]
pub struct UpdateSeedInput {
    pub variety_name: Option<String>,
    pub plant_type: Option<String>,
    pub quantity: Option<i32>,
    pub purchase_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub germination_rate: Option<Decimal>,
    pub supplier: Option<String>,
    pub days_to_maturity: Option<i32>,
    pub weeks_to_transplant: Option<i32>,
    pub size_category: Option<String>,
    pub notes: Option<String>,
}

fn validate_seed(seed: &SeedLot) -> AppResult<()> {
    check("variety_name", validate_required(&seed.variety_name))?;
    check("plant_type", validate_required(&seed.plant_type))?;
    check("quantity", validate_quantity(seed.quantity))?;
    check("weeks_to_transplant", validate_weeks_to_transplant(seed.weeks_to_transplant))?;
    if let Some(rate) = seed.germination_rate {
        check("germination_rate", validate_germination_rate(rate))?;
    }
    if let Some(days) = seed.days_to_maturity {
        check("days_to_maturity", validate_days_to_maturity(days))?;
    }
    Ok(())
}

/// Load a seed lot inside a transaction, locking it until commit
pub(crate) async fn lock_seed(
    conn: &mut PgConnection,
    user_id: Uuid,
    seed_id: Uuid,
) -> AppResult<SeedLot> {
    sqlx::query_as::<_, SeedLot>(&format!(
        "SELECT {} FROM seeds WHERE id = $1 AND user_id = $2 FOR UPDATE",
        SEED_COLUMNS
    ))
    .bind(seed_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Seed".to_string()))
}

pub(crate) async fn save_seed_quantity(conn: &mut PgConnection, seed: &SeedLot) -> AppResult<()> {
    sqlx::query("UPDATE seeds SET quantity = $1 WHERE id = $2")
        .bind(seed.quantity)
        .bind(seed.id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

impl SeedService {
    /// Create a new SeedService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All seed lots of a user, alphabetically
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<SeedLot>> {
        let seeds = sqlx::query_as::<_, SeedLot>(&format!(
            "SELECT {} FROM seeds WHERE user_id = $1 ORDER BY variety_name",
            SEED_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(seeds)
    }

    /// Seed lots at or below the low-stock threshold
    pub async fn low_stock(&self, user_id: Uuid, threshold: i32) -> AppResult<Vec<SeedLot>> {
        let seeds = sqlx::query_as::<_, SeedLot>(&format!(
            "SELECT {} FROM seeds WHERE user_id = $1 AND quantity <= $2 ORDER BY quantity, variety_name",
            SEED_COLUMNS
        ))
        .bind(user_id)
        .bind(threshold)
        .fetch_all(&self.db)
        .await?;

        Ok(seeds)
    }

    pub async fn get(&self, user_id: Uuid, seed_id: Uuid) -> AppResult<SeedLot> {
        sqlx::query_as::<_, SeedLot>(&format!(
            "SELECT {} FROM seeds WHERE id = $1 AND user_id = $2",
            SEED_COLUMNS
        ))
        .bind(seed_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Seed".to_string()))
    }

    pub async fn create(&self, user_id: Uuid, input: CreateSeedInput) -> AppResult<SeedLot> {
        let draft = SeedLot {
            id: Uuid::nil(),
            user_id,
            variety_name: input.variety_name.trim().to_string(),
            plant_type: input.plant_type.trim().to_lowercase(),
            quantity: input.quantity,
            purchase_date: input.purchase_date,
            expiration_date: input.expiration_date,
            germination_rate: input.germination_rate,
            supplier: input.supplier,
            days_to_maturity: input.days_to_maturity,
            weeks_to_transplant: input.weeks_to_transplant.unwrap_or(DEFAULT_WEEKS_TO_TRANSPLANT),
            size_category: input
                .size_category
                .as_deref()
                .map(SizeCategory::from_str_lossy)
                .unwrap_or_default(),
            notes: input.notes,
            created_at: chrono::Utc::now(),
        };
        validate_seed(&draft)?;

        let seed = sqlx::query_as::<_, SeedLot>(&format!(
            r#"
            INSERT INTO seeds (user_id, variety_name, plant_type, quantity, purchase_date,
                               expiration_date, germination_rate, supplier, days_to_maturity,
                               weeks_to_transplant, size_category, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            SEED_COLUMNS
        ))
        .bind(user_id)
        .bind(&draft.variety_name)
        .bind(&draft.plant_type)
        .bind(draft.quantity)
        .bind(draft.purchase_date)
        .bind(draft.expiration_date)
        .bind(draft.germination_rate)
        .bind(&draft.supplier)
        .bind(draft.days_to_maturity)
        .bind(draft.weeks_to_transplant)
        .bind(draft.size_category)
        .bind(&draft.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(seed_id = %seed.id, variety = %seed.variety_name, "Added seed lot");

        Ok(seed)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        seed_id: Uuid,
        input: UpdateSeedInput,
    ) -> AppResult<SeedLot> {
        let mut seed = self.get(user_id, seed_id).await?;

        if let Some(name) = input.variety_name {
            seed.variety_name = name.trim().to_string();
        }
        if let Some(plant_type) = input.plant_type {
            seed.plant_type = plant_type.trim().to_lowercase();
        }
        if let Some(quantity) = input.quantity {
            seed.quantity = quantity;
        }
        if input.purchase_date.is_some() {
            seed.purchase_date = input.purchase_date;
        }
        if input.expiration_date.is_some() {
            seed.expiration_date = input.expiration_date;
        }
        if input.germination_rate.is_some() {
            seed.germination_rate = input.germination_rate;
        }
        if input.supplier.is_some() {
            seed.supplier = input.supplier;
        }
        if input.days_to_maturity.is_some() {
            seed.days_to_maturity = input.days_to_maturity;
        }
        if let Some(weeks) = input.weeks_to_transplant {
            seed.weeks_to_transplant = weeks;
        }
        if let Some(size) = input.size_category.as_deref() {
            seed.size_category = SizeCategory::from_str_lossy(size);
        }
        if input.notes.is_some() {
            seed.notes = input.notes;
        }
        validate_seed(&seed)?;

        let updated = sqlx::query_as::<_, SeedLot>(&format!(
            r#"
            UPDATE seeds
            SET variety_name = $3, plant_type = $4, quantity = $5, purchase_date = $6,
                expiration_date = $7, germination_rate = $8, supplier = $9,
                days_to_maturity = $10, weeks_to_transplant = $11, size_category = $12, notes = $13
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            SEED_COLUMNS
        ))
        .bind(seed_id)
        .bind(user_id)
        .bind(&seed.variety_name)
        .bind(&seed.plant_type)
        .bind(seed.quantity)
        .bind(seed.purchase_date)
        .bind(seed.expiration_date)
        .bind(seed.germination_rate)
        .bind(&seed.supplier)
        .bind(seed.days_to_maturity)
        .bind(seed.weeks_to_transplant)
        .bind(seed.size_category)
        .bind(&seed.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(updated)
    }

    /// Delete a seed lot no plant or seedling batch refers to
    pub async fn delete(&self, user_id: Uuid, seed_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        lock_seed(&mut tx, user_id, seed_id).await?;

        let plant_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plants WHERE seed_id = $1")
            .bind(seed_id)
            .fetch_one(&mut *tx)
            .await?;
        let seedling_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM seedlings WHERE seed_id = $1")
                .bind(seed_id)
                .fetch_one(&mut *tx)
                .await?;

        ledger::check_seed_deletable(plant_count, seedling_count)?;

        sqlx::query("DELETE FROM seeds WHERE id = $1 AND user_id = $2")
            .bind(seed_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(%seed_id, "Deleted seed lot");
        Ok(())
    }

    /// Seed start, transplant and harvest dates for a lot against a season's last frost
    pub async fn schedule(
        &self,
        user_id: Uuid,
        seed_id: Uuid,
        last_frost: NaiveDate,
    ) -> AppResult<SeedSchedule> {
        let seed = self.get(user_id, seed_id).await?;
        let target =
            schedule::transplant_target(last_frost, schedule::DEFAULT_TRANSPLANT_OFFSET_WEEKS);
        Ok(schedule::compute_seed_schedule(&seed, target))
    }
}
