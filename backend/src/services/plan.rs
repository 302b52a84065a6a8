//! Garden plan service: crop plans and their seed requirements

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::seed::SeedService;
use crate::error::{AppError, AppResult};
use crate::models::{GardenPlan, PlanItem, PlanItemResult, PlanSummary, SeedLot};
use shared::planning;
use shared::schedule::FrostDates;
use shared::validation::{
    check, validate_container_volume, validate_plan_containers, validate_plants_per_container,
    validate_required,
};

const PLAN_COLUMNS: &str = "id, user_id, name, year, container_volume_gallons, created_at";
const ITEM_COLUMNS: &str =
    "id, plan_id, seed_id, num_containers, plants_per_container, is_direct_sow";

/// Plan service for managing garden plans
#[derive(Clone)]
pub struct PlanService {
    db: PgPool,
    frost: FrostDates,
    default_volume: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanInput {
    pub name: String,
    pub year: i32,
    pub container_volume_gallons: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AddPlanItemInput {
    pub seed_id: Uuid,
    pub num_containers: i32,
    pub plants_per_container: Option<i32>,
    #[serde(default)]
    pub is_direct_sow: bool,
}

#[derive(Debug, Serialize)]
pub struct PlanWithItems {
    pub plan: GardenPlan,
    pub items: Vec<PlanItem>,
}

/// Requirements for every item of a plan
#[derive(Debug, Serialize)]
pub struct ComputedPlan {
    pub plan: GardenPlan,
    pub items: Vec<PlanItemResult>,
    pub summary: PlanSummary,
}

impl PlanService {
    /// Create a new PlanService instance
    pub fn new(db: PgPool, frost: FrostDates, default_volume: i32) -> Self {
        Self {
            db,
            frost,
            default_volume,
        }
    }

    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<GardenPlan>> {
        let plans = sqlx::query_as::<_, GardenPlan>(&format!(
            "SELECT {} FROM garden_plans WHERE user_id = $1 ORDER BY year DESC, name",
            PLAN_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(plans)
    }

    async fn get_plan(&self, user_id: Uuid, plan_id: Uuid) -> AppResult<GardenPlan> {
        sqlx::query_as::<_, GardenPlan>(&format!(
            "SELECT {} FROM garden_plans WHERE id = $1 AND user_id = $2",
            PLAN_COLUMNS
        ))
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Garden plan".to_string()))
    }

    async fn items(&self, plan_id: Uuid) -> AppResult<Vec<PlanItem>> {
        let items = sqlx::query_as::<_, PlanItem>(&format!(
            "SELECT {} FROM plan_items WHERE plan_id = $1 ORDER BY id",
            ITEM_COLUMNS
        ))
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    pub async fn get(&self, user_id: Uuid, plan_id: Uuid) -> AppResult<PlanWithItems> {
        let plan = self.get_plan(user_id, plan_id).await?;
        let items = self.items(plan.id).await?;
        Ok(PlanWithItems { plan, items })
    }

    pub async fn create(&self, user_id: Uuid, input: CreatePlanInput) -> AppResult<GardenPlan> {
        check("name", validate_required(&input.name))?;
        let volume = input.container_volume_gallons.unwrap_or(self.default_volume);
        check("container_volume_gallons", validate_container_volume(volume))?;
        // The year must have resolvable frost dates
        self.frost.for_year(input.year)?;

        let plan = sqlx::query_as::<_, GardenPlan>(&format!(
            r#"
            INSERT INTO garden_plans (user_id, name, year, container_volume_gallons)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            PLAN_COLUMNS
        ))
        .bind(user_id)
        .bind(input.name.trim())
        .bind(input.year)
        .bind(volume)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(plan_id = %plan.id, year = plan.year, "Created garden plan");
        Ok(plan)
    }

    pub async fn add_item(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        input: AddPlanItemInput,
    ) -> AppResult<PlanItem> {
        check("num_containers", validate_plan_containers(input.num_containers))?;
        if let Some(per_container) = input.plants_per_container {
            check("plants_per_container", validate_plants_per_container(per_container))?;
        }

        let plan = self.get_plan(user_id, plan_id).await?;
        // Ownership of the referenced seed lot
        SeedService::new(self.db.clone()).get(user_id, input.seed_id).await?;

        let item = sqlx::query_as::<_, PlanItem>(&format!(
            r#"
            INSERT INTO plan_items (plan_id, seed_id, num_containers, plants_per_container, is_direct_sow)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(plan.id)
        .bind(input.seed_id)
        .bind(input.num_containers)
        .bind(input.plants_per_container)
        .bind(input.is_direct_sow)
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    pub async fn remove_item(&self, user_id: Uuid, plan_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM plan_items i
            USING garden_plans p
            WHERE i.id = $1 AND i.plan_id = $2 AND p.id = i.plan_id AND p.user_id = $3
            "#,
        )
        .bind(item_id)
        .bind(plan_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Plan item".to_string()));
        }
        Ok(())
    }

    pub async fn delete(&self, user_id: Uuid, plan_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM garden_plans WHERE id = $1 AND user_id = $2")
            .bind(plan_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Garden plan".to_string()));
        }
        Ok(())
    }

    /// Seeds to start and start dates for every item, against the plan year's last frost
    pub async fn compute(&self, user_id: Uuid, plan_id: Uuid) -> AppResult<ComputedPlan> {
        let PlanWithItems { plan, items } = self.get(user_id, plan_id).await?;
        let season = self.frost.for_year(plan.year)?;

        let seeds: HashMap<Uuid, SeedLot> = SeedService::new(self.db.clone())
            .list(user_id)
            .await?
            .into_iter()
            .map(|seed| (seed.id, seed))
            .collect();

        let results = items
            .iter()
            .map(|item| -> AppResult<PlanItemResult> {
                let seed = seeds
                    .get(&item.seed_id)
                    .ok_or_else(|| AppError::NotFound("Seed".to_string()))?;
                Ok(planning::compute_plan_item(
                    item,
                    seed,
                    plan.container_volume_gallons,
                    season.last_frost,
                )?)
            })
            .collect::<AppResult<Vec<_>>>()?;

        let summary = planning::summarize_plan(&items, &results)?;
        tracing::debug!(
            plan_id = %plan.id,
            total_seeds = summary.total_seeds_to_start,
            "Computed garden plan"
        );

        Ok(ComputedPlan {
            plan,
            items: results,
            summary,
        })
    }
}
