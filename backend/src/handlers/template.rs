//! Planting template HTTP handlers

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
use crate::models::PlantingTemplate;
use crate::services::template::{CreateTemplateInput, ResolvedTemplate, TemplateService};
use crate::AppState;

#[derive(Deserialize)]
pub struct ResolveQuery {
    pub year: Option<i32>,
}

pub async fn list_templates(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<PlantingTemplate>>> {
    let service = TemplateService::new(state.db.clone(), state.frost);
    let templates = service.list().await?;
    Ok(Json(templates))
}

/// Template with its dates resolved for a season
pub async fn get_template(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(template_id): Path<Uuid>,
    Query(query): Query<ResolveQuery>,
) -> AppResult<Json<ResolvedTemplate>> {
    let year = query.year.unwrap_or_else(|| today().year());
    let service = TemplateService::new(state.db.clone(), state.frost);
    let resolved = service.resolve(template_id, year).await?;
    Ok(Json(resolved))
}

pub async fn create_template(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateTemplateInput>,
) -> AppResult<(StatusCode, Json<PlantingTemplate>)> {
    let service = TemplateService::new(state.db.clone(), state.frost);
    let template = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn delete_template(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(template_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = TemplateService::new(state.db.clone(), state.frost);
    service.delete(template_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
