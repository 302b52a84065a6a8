//! Garden plan HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::{GardenPlan, PlanItem};
use crate::services::plan::{
    AddPlanItemInput, ComputedPlan, CreatePlanInput, PlanService, PlanWithItems,
};
use crate::AppState;

fn plan_service(state: &AppState) -> PlanService {
    PlanService::new(
        state.db.clone(),
        state.frost,
        state.config.garden.default_container_volume,
    )
}

pub async fn list_plans(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<GardenPlan>>> {
    let plans = plan_service(&state).list(current_user.id()).await?;
    Ok(Json(plans))
}

pub async fn get_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> AppResult<Json<PlanWithItems>> {
    let plan = plan_service(&state).get(current_user.id(), plan_id).await?;
    Ok(Json(plan))
}

pub async fn create_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePlanInput>,
) -> AppResult<(StatusCode, Json<GardenPlan>)> {
    let plan = plan_service(&state).create(current_user.id(), input).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn delete_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    plan_service(&state).delete(current_user.id(), plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_plan_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
    Json(input): Json<AddPlanItemInput>,
) -> AppResult<(StatusCode, Json<PlanItem>)> {
    let item = plan_service(&state)
        .add_item(current_user.id(), plan_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn remove_plan_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((plan_id, item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    plan_service(&state)
        .remove_item(current_user.id(), plan_id, item_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Seeds to start and start dates for every item of the plan
pub async fn compute_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> AppResult<Json<ComputedPlan>> {
    let computed = plan_service(&state)
        .compute(current_user.id(), plan_id)
        .await?;
    Ok(Json(computed))
}
