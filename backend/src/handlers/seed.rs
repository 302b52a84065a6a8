//! Seed inventory HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Datelike;
use serde::Deserialize;
use uuid::Uuid;

use super::today;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::SeedLot;
use crate::services::seed::{CreateSeedInput, SeedService, UpdateSeedInput};
use crate::AppState;
use shared::schedule::SeedSchedule;

#[derive(Deserialize)]
pub struct SeedListQuery {
    /// Only lots at or below the configured low-stock threshold
    #[serde(default)]
    pub low_stock: bool,
}

#[derive(Deserialize)]
pub struct ScheduleQuery {
    pub year: Option<i32>,
}

pub async fn list_seeds(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<SeedListQuery>,
) -> AppResult<Json<Vec<SeedLot>>> {
    let service = SeedService::new(state.db.clone());
    let seeds = if query.low_stock {
        service
            .low_stock(current_user.id(), state.config.garden.low_seed_threshold)
            .await?
    } else {
        service.list(current_user.id()).await?
    };
    Ok(Json(seeds))
}

pub async fn get_seed(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(seed_id): Path<Uuid>,
) -> AppResult<Json<SeedLot>> {
    let service = SeedService::new(state.db.clone());
    let seed = service.get(current_user.id(), seed_id).await?;
    Ok(Json(seed))
}

pub async fn create_seed(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSeedInput>,
) -> AppResult<(StatusCode, Json<SeedLot>)> {
    let service = SeedService::new(state.db.clone());
    let seed = service.create(current_user.id(), input).await?;
    Ok((StatusCode::CREATED, Json(seed)))
}

pub async fn update_seed(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(seed_id): Path<Uuid>,
    Json(input): Json<UpdateSeedInput>,
) -> AppResult<Json<SeedLot>> {
    let service = SeedService::new(state.db.clone());
    let seed = service.update(current_user.id(), seed_id, input).await?;
    Ok(Json(seed))
}

pub async fn delete_seed(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(seed_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = SeedService::new(state.db.clone());
    service.delete(current_user.id(), seed_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Projected seed start, transplant and harvest dates for a season
pub async fn get_seed_schedule(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(seed_id): Path<Uuid>,
    Query(query): Query<ScheduleQuery>,
) -> AppResult<Json<SeedSchedule>> {
    let year = query.year.unwrap_or_else(|| today().year());
    let season = state.frost.for_year(year)?;

    let service = SeedService::new(state.db.clone());
    let schedule = service
        .schedule(current_user.id(), seed_id, season.last_frost)
        .await?;
    Ok(Json(schedule))
}
