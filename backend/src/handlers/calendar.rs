//! Planting calendar HTTP handlers

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Datelike;
use serde::Deserialize;

use super::today;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::calendar::{CalendarService, MonthView};
use crate::AppState;
use shared::calendar::UpcomingTask;

#[derive(Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

fn calendar_service(state: &AppState) -> CalendarService {
    CalendarService::new(
        state.db.clone(),
        state.frost,
        state.config.garden.upcoming_window_days,
    )
}

/// Month grid with seed starts, transplants and harvests; defaults to the current month
pub async fn get_month(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<MonthView>> {
    let now = today();
    let year = query.year.unwrap_or_else(|| now.year());
    let month = query.month.unwrap_or_else(|| now.month());

    let view = calendar_service(&state)
        .month(current_user.id(), year, month)
        .await?;
    Ok(Json(view))
}

pub async fn get_upcoming(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<UpcomingTask>>> {
    let tasks = calendar_service(&state)
        .upcoming(current_user.id(), today())
        .await?;
    Ok(Json(tasks))
}
