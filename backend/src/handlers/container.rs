//! Container HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::Container;
use crate::services::container::{
    ContainerService, ContainerView, CreateContainerInput, UpdateContainerInput,
};
use crate::AppState;
use shared::capacity::CapacityRecommendation;

#[derive(Deserialize)]
pub struct CapacityQuery {
    pub seed_id: Uuid,
}

pub async fn list_containers(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<ContainerView>>> {
    let service = ContainerService::new(state.db.clone());
    let containers = service.list(current_user.id()).await?;
    Ok(Json(containers))
}

pub async fn get_container(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(container_id): Path<Uuid>,
) -> AppResult<Json<ContainerView>> {
    let service = ContainerService::new(state.db.clone());
    let container = service.get(current_user.id(), container_id).await?;
    Ok(Json(ContainerView::from(container)))
}

pub async fn create_container(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateContainerInput>,
) -> AppResult<(StatusCode, Json<Container>)> {
    let service = ContainerService::new(state.db.clone());
    let container = service.create(current_user.id(), input).await?;
    Ok((StatusCode::CREATED, Json(container)))
}

pub async fn update_container(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(container_id): Path<Uuid>,
    Json(input): Json<UpdateContainerInput>,
) -> AppResult<Json<Container>> {
    let service = ContainerService::new(state.db.clone());
    let container = service
        .update(current_user.id(), container_id, input)
        .await?;
    Ok(Json(container))
}

pub async fn delete_container(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(container_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = ContainerService::new(state.db.clone());
    service.delete(current_user.id(), container_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// How many plants of a seed lot fit in the container
pub async fn get_capacity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(container_id): Path<Uuid>,
    Query(query): Query<CapacityQuery>,
) -> AppResult<Json<CapacityRecommendation>> {
    let service = ContainerService::new(state.db.clone());
    let recommendation = service
        .recommend(current_user.id(), container_id, query.seed_id)
        .await?;
    Ok(Json(recommendation))
}
