//! Dashboard and analytics handlers

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::today;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::harvest::HarvestService;
use crate::services::reporting::{Dashboard, ReportingService};
use crate::services::CalendarService;
use crate::AppState;

#[derive(Deserialize)]
pub struct AnalyticsQuery {
    pub format: Option<String>, // "json" or "csv"
}

fn reporting_service(state: &AppState) -> ReportingService {
    let garden = &state.config.garden;
    let calendar = CalendarService::new(state.db.clone(), state.frost, garden.upcoming_window_days);
    ReportingService::new(state.db.clone(), calendar, garden.low_seed_threshold)
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Dashboard>> {
    let dashboard = reporting_service(&state)
        .dashboard(current_user.id(), today())
        .await?;
    Ok(Json(dashboard))
}

/// Yield analytics; `format=csv` downloads the per-variety table
pub async fn get_analytics(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<impl IntoResponse> {
    let analytics = reporting_service(&state).analytics(current_user.id()).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = HarvestService::export_to_csv(&analytics.varieties)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"variety_performance.csv\""),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(analytics).into_response())
    }
}
