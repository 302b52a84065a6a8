//! Hydroponics HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::{HydroSystem, NutrientReading, PlantRecord};
use crate::services::hydro::{
    CreateHydroPlantInput, CreateReadingInput, CreateSystemInput, HydroService, SystemDetail,
    SystemStatusInput,
};
use crate::AppState;

pub async fn list_systems(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<HydroSystem>>> {
    let service = HydroService::new(state.db.clone());
    let systems = service.list_systems(current_user.id()).await?;
    Ok(Json(systems))
}

pub async fn get_system(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(system_id): Path<Uuid>,
) -> AppResult<Json<SystemDetail>> {
    let service = HydroService::new(state.db.clone());
    let detail = service.get_system(current_user.id(), system_id).await?;
    Ok(Json(detail))
}

pub async fn create_system(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSystemInput>,
) -> AppResult<(StatusCode, Json<HydroSystem>)> {
    let service = HydroService::new(state.db.clone());
    let system = service.create_system(current_user.id(), input).await?;
    Ok((StatusCode::CREATED, Json(system)))
}

pub async fn update_system_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(system_id): Path<Uuid>,
    Json(input): Json<SystemStatusInput>,
) -> AppResult<Json<HydroSystem>> {
    let service = HydroService::new(state.db.clone());
    let system = service
        .update_status(current_user.id(), system_id, input)
        .await?;
    Ok(Json(system))
}

pub async fn delete_system(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(system_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = HydroService::new(state.db.clone());
    service.delete_system(current_user.id(), system_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_readings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(system_id): Path<Uuid>,
) -> AppResult<Json<Vec<NutrientReading>>> {
    let service = HydroService::new(state.db.clone());
    let readings = service.list_readings(current_user.id(), system_id).await?;
    Ok(Json(readings))
}

pub async fn add_reading(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(system_id): Path<Uuid>,
    Json(input): Json<CreateReadingInput>,
) -> AppResult<(StatusCode, Json<NutrientReading>)> {
    let service = HydroService::new(state.db.clone());
    let reading = service
        .add_reading(current_user.id(), system_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(reading)))
}

/// Plant into a hydro bag from a seedling batch or directly from seed
pub async fn create_hydro_plants(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateHydroPlantInput>,
) -> AppResult<(StatusCode, Json<Vec<PlantRecord>>)> {
    let service = HydroService::new(state.db.clone());
    let plants = service.create_plants(current_user.id(), input).await?;
    Ok((StatusCode::CREATED, Json(plants)))
}
