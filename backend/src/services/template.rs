//! Planting template service

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{PlantingTemplate, TemplateSchedule};
use shared::schedule::FrostDates;
use shared::validation::{check, validate_frost_offset_weeks, validate_required, validate_succession_weeks};

const TEMPLATE_COLUMNS: &str = "id, plant_type, variety_name, weeks_before_last_frost, \
     weeks_after_last_frost, succession_planting_weeks, notes, created_at";

/// Template service; templates are shared by all users
#[derive(Clone)]
pub struct TemplateService {
    db: PgPool,
    frost: FrostDates,
}

#[derive(Debug, Deserialize)]
pub struct CreateTemplateInput {
    pub plant_type: String,
    pub variety_name: Option<String>,
    pub weeks_before_last_frost: Option<i32>,
    pub weeks_after_last_frost: Option<i32>,
    pub succession_planting_weeks: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolvedTemplate {
    pub template: PlantingTemplate,
    pub year: i32,
    pub schedule: TemplateSchedule,
}

impl TemplateService {
    /// Create a new TemplateService instance
    pub fn new(db: PgPool, frost: FrostDates) -> Self {
        Self { db, frost }
    }

    pub async fn list(&self) -> AppResult<Vec<PlantingTemplate>> {
        let templates = sqlx::query_as::<_, PlantingTemplate>(&format!(
            "SELECT {} FROM planting_templates ORDER BY plant_type, variety_name NULLS FIRST",
            TEMPLATE_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(templates)
    }

    pub async fn get(&self, template_id: Uuid) -> AppResult<PlantingTemplate> {
        sqlx::query_as::<_, PlantingTemplate>(&format!(
            "SELECT {} FROM planting_templates WHERE id = $1",
            TEMPLATE_COLUMNS
        ))
        .bind(template_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Planting template".to_string()))
    }

    pub async fn create(&self, input: CreateTemplateInput) -> AppResult<PlantingTemplate> {
        check("plant_type", validate_required(&input.plant_type))?;
        if let Some(weeks) = input.weeks_before_last_frost {
            check("weeks_before_last_frost", validate_frost_offset_weeks(weeks))?;
        }
        if let Some(weeks) = input.weeks_after_last_frost {
            check("weeks_after_last_frost", validate_frost_offset_weeks(weeks))?;
        }
        if let Some(weeks) = input.succession_planting_weeks {
            check("succession_planting_weeks", validate_succession_weeks(weeks))?;
        }

        let template = sqlx::query_as::<_, PlantingTemplate>(&format!(
            r#"
            INSERT INTO planting_templates (plant_type, variety_name, weeks_before_last_frost,
                                            weeks_after_last_frost, succession_planting_weeks, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            TEMPLATE_COLUMNS
        ))
        .bind(input.plant_type.trim().to_lowercase())
        .bind(&input.variety_name)
        .bind(input.weeks_before_last_frost)
        .bind(input.weeks_after_last_frost)
        .bind(input.succession_planting_weeks)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(template)
    }

    pub async fn delete(&self, template_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM planting_templates WHERE id = $1")
            .bind(template_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Planting template".to_string()));
        }
        Ok(())
    }

    /// Resolve a template against the configured frost dates of `year`
    pub async fn resolve(&self, template_id: Uuid, year: i32) -> AppResult<ResolvedTemplate> {
        let template = self.get(template_id).await?;
        let season = self.frost.for_year(year)?;
        let schedule = template.resolve(season.last_frost, season.first_frost);

        Ok(ResolvedTemplate {
            template,
            year,
            schedule,
        })
    }
}
