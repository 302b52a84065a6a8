//! Harvest HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::HarvestEvent;
use crate::services::harvest::{HarvestFilter, HarvestListRow, HarvestService, RecordHarvestInput};
use crate::AppState;

pub async fn list_harvests(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<HarvestFilter>,
) -> AppResult<Json<Vec<HarvestListRow>>> {
    let service = HarvestService::new(state.db.clone());
    let harvests = service.list(current_user.id(), &filter).await?;
    Ok(Json(harvests))
}

/// Record a harvest against a plant
pub async fn record_harvest(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordHarvestInput>,
) -> AppResult<(StatusCode, Json<HarvestEvent>)> {
    let service = HarvestService::new(state.db.clone());
    let harvest = service.record(current_user.id(), input).await?;
    Ok((StatusCode::CREATED, Json(harvest)))
}

pub async fn delete_harvest(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(harvest_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = HarvestService::new(state.db.clone());
    service.delete(current_user.id(), harvest_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Download harvests as CSV
pub async fn export_harvests(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<HarvestFilter>,
) -> AppResult<impl IntoResponse> {
    let service = HarvestService::new(state.db.clone());
    let harvests = service.list(current_user.id(), &filter).await?;
    let csv = HarvestService::export_to_csv(&harvests)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"harvests.csv\""),
        ],
        csv,
    ))
}
