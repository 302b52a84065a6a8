//! Harvest service for recording and exporting harvests

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::plant::lock_plant;
use crate::error::{AppError, AppResult};
use crate::models::HarvestEvent;
use shared::ledger;
use shared::types::HarvestUnit;
use shared::validation::{check, validate_harvest_amount, validate_rating};

pub(crate) const HARVEST_COLUMNS: &str =
    "id, plant_id, harvest_date, amount, unit, quality_rating, notes, created_at";

/// Harvest service for managing harvests
#[derive(Clone)]
pub struct HarvestService {
    db: PgPool,
}

/// Harvest joined with the plant and variety it came from
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HarvestListRow {
    pub id: Uuid,
    pub plant_id: Uuid,
    pub plant_name: Option<String>,
    pub variety_name: String,
    pub harvest_date: NaiveDate,
    pub amount: Decimal,
    pub unit: HarvestUnit,
    pub quality_rating: Option<i32>,
    pub notes: Option<String>,
}

/// Input for recording a harvest
#[derive(Debug, Deserialize)]
pub struct RecordHarvestInput {
    pub plant_id: Uuid,
    pub harvest_date: NaiveDate,
    pub amount: Decimal,
    pub unit: Option<String>,
    pub quality_rating: Option<i32>,
    pub notes: Option<String>,
}

/// Optional date range for harvest queries
#[derive(Debug, Default, Deserialize)]
pub struct HarvestFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl HarvestService {
    /// Create a new HarvestService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Harvests of a user, most recent first
    pub async fn list(&self, user_id: Uuid, filter: &HarvestFilter) -> AppResult<Vec<HarvestListRow>> {
        let rows = sqlx::query_as::<_, HarvestListRow>(
            r#"
            SELECT h.id, h.plant_id, p.plant_name, s.variety_name, h.harvest_date, h.amount,
                   h.unit, h.quality_rating, h.notes
            FROM harvests h
            JOIN plants p ON p.id = h.plant_id
            JOIN seeds s ON s.id = p.seed_id
            WHERE p.user_id = $1
              AND ($2::DATE IS NULL OR h.harvest_date >= $2)
              AND ($3::DATE IS NULL OR h.harvest_date <= $3)
            ORDER BY h.harvest_date DESC, h.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Record a harvest and update the plant's harvest dates together
    pub async fn record(&self, user_id: Uuid, input: RecordHarvestInput) -> AppResult<HarvestEvent> {
        check("amount", validate_harvest_amount(input.amount))?;
        if let Some(rating) = input.quality_rating {
            check("quality_rating", validate_rating(rating))?;
        }
        let unit = match input.unit.as_deref() {
            None => HarvestUnit::default(),
            Some(value) => HarvestUnit::from_str(value).ok_or_else(|| {
                AppError::validation("unit", format!("Unknown harvest unit '{}'", value))
            })?,
        };

        let mut tx = self.db.begin().await?;
        let plant = lock_plant(&mut tx, user_id, input.plant_id).await?;
        let updated = ledger::apply_harvest(&plant, input.harvest_date)?;

        sqlx::query(
            r#"
            UPDATE plants SET first_harvest_date = $2, last_harvest_date = $3, status = $4
            WHERE id = $1
            "#,
        )
        .bind(plant.id)
        .bind(updated.first_harvest_date)
        .bind(updated.last_harvest_date)
        .bind(updated.status)
        .execute(&mut *tx)
        .await?;

        let harvest = sqlx::query_as::<_, HarvestEvent>(&format!(
            r#"
            INSERT INTO harvests (plant_id, harvest_date, amount, unit, quality_rating, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            HARVEST_COLUMNS
        ))
        .bind(plant.id)
        .bind(input.harvest_date)
        .bind(input.amount)
        .bind(unit)
        .bind(input.quality_rating)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(harvest_id = %harvest.id, plant_id = %plant.id, "Recorded harvest");

        Ok(harvest)
    }

    pub async fn delete(&self, user_id: Uuid, harvest_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM harvests h
            USING plants p
            WHERE h.id = $1 AND p.id = h.plant_id AND p.user_id = $2
            "#,
        )
        .bind(harvest_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Harvest".to_string()));
        }
        Ok(())
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}
