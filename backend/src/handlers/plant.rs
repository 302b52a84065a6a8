//! Plant HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::today;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::{PlantRecord, PlantSummaryRow, ProgressLog};
use crate::services::plant::{
    CreateLogInput, CreatePlantInput, PlantDetail, PlantService, PlantStatusInput, UpdatePlantInput,
};
use crate::AppState;

#[derive(Deserialize)]
pub struct PlantListQuery {
    /// Include dead plants
    #[serde(default)]
    pub all: bool,
}

pub async fn list_plants(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<PlantListQuery>,
) -> AppResult<Json<Vec<PlantSummaryRow>>> {
    let service = PlantService::new(state.db.clone());
    let plants = service.list(current_user.id(), query.all).await?;
    Ok(Json(plants))
}

/// Plant with harvests, yield totals and progress logs
pub async fn get_plant(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plant_id): Path<Uuid>,
) -> AppResult<Json<PlantDetail>> {
    let service = PlantService::new(state.db.clone());
    let detail = service.detail(current_user.id(), plant_id, today()).await?;
    Ok(Json(detail))
}

/// Transplant one or more plants into the garden
pub async fn create_plants(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePlantInput>,
) -> AppResult<(StatusCode, Json<Vec<PlantRecord>>)> {
    let service = PlantService::new(state.db.clone());
    let plants = service.create(current_user.id(), input).await?;
    Ok((StatusCode::CREATED, Json(plants)))
}

pub async fn update_plant(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plant_id): Path<Uuid>,
    Json(input): Json<UpdatePlantInput>,
) -> AppResult<Json<PlantRecord>> {
    let service = PlantService::new(state.db.clone());
    let plant = service.update(current_user.id(), plant_id, input).await?;
    Ok(Json(plant))
}

pub async fn update_plant_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plant_id): Path<Uuid>,
    Json(input): Json<PlantStatusInput>,
) -> AppResult<Json<PlantRecord>> {
    let service = PlantService::new(state.db.clone());
    let plant = service
        .update_status(current_user.id(), plant_id, input)
        .await?;
    Ok(Json(plant))
}

pub async fn delete_plant(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plant_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = PlantService::new(state.db.clone());
    service.delete(current_user.id(), plant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_logs(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plant_id): Path<Uuid>,
) -> AppResult<Json<Vec<ProgressLog>>> {
    let service = PlantService::new(state.db.clone());
    let logs = service.list_logs(current_user.id(), plant_id).await?;
    Ok(Json(logs))
}

pub async fn add_log(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plant_id): Path<Uuid>,
    Json(input): Json<CreateLogInput>,
) -> AppResult<(StatusCode, Json<ProgressLog>)> {
    let service = PlantService::new(state.db.clone());
    let log = service.add_log(current_user.id(), plant_id, input).await?;
    Ok((StatusCode::CREATED, Json(log)))
}
