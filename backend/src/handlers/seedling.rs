//! Seedling batch HTTP handlers

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
use crate::models::{SeedlingBatch, SeedlingView};
use crate::services::seedling::{GerminationInput, PotUpInput, SeedlingService, SowInput, StatusInput};
use crate::AppState;

#[derive(Deserialize)]
pub struct SeedlingListQuery {
    /// Include transplanted and failed batches
    #[serde(default)]
    pub all: bool,
}

pub async fn list_seedlings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<SeedlingListQuery>,
) -> AppResult<Json<Vec<SeedlingView>>> {
    let service = SeedlingService::new(state.db.clone());
    let batches = service.list(current_user.id(), query.all, today()).await?;
    Ok(Json(batches))
}

pub async fn list_ready_for_pot_up(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<SeedlingView>>> {
    let service = SeedlingService::new(state.db.clone());
    let batches = service.ready_for_pot_up(current_user.id(), today()).await?;
    Ok(Json(batches))
}

pub async fn get_seedling(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<SeedlingBatch>> {
    let service = SeedlingService::new(state.db.clone());
    let batch = service.get(current_user.id(), batch_id).await?;
    Ok(Json(batch))
}

/// Sow a new batch, taking seeds out of inventory
pub async fn sow_seedlings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SowInput>,
) -> AppResult<(StatusCode, Json<SeedlingBatch>)> {
    let service = SeedlingService::new(state.db.clone());
    let batch = service.sow(current_user.id(), input).await?;
    Ok((StatusCode::CREATED, Json(batch)))
}

pub async fn record_germination(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<GerminationInput>,
) -> AppResult<Json<SeedlingBatch>> {
    let service = SeedlingService::new(state.db.clone());
    let batch = service
        .record_germination(current_user.id(), batch_id, input)
        .await?;
    Ok(Json(batch))
}

pub async fn pot_up(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<PotUpInput>,
) -> AppResult<Json<SeedlingBatch>> {
    let service = SeedlingService::new(state.db.clone());
    let batch = service.pot_up(current_user.id(), batch_id, input).await?;
    Ok(Json(batch))
}

pub async fn update_seedling_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<StatusInput>,
) -> AppResult<Json<SeedlingBatch>> {
    let service = SeedlingService::new(state.db.clone());
    let batch = service
        .update_status(current_user.id(), batch_id, input)
        .await?;
    Ok(Json(batch))
}

pub async fn delete_seedling(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = SeedlingService::new(state.db.clone());
    service.delete(current_user.id(), batch_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
