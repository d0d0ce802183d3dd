use crate::dashboard::{build_dashboard, build_summary};
use crate::errors::AppError;
use crate::models::{DashboardQuery, DashboardResponse, SummaryResponse};
use crate::source::fetch_log;
use crate::state::AppState;
use crate::stats::TotalStats;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use chrono::Utc;
use tracing::debug;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.config.title, state.config.refresh_secs))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let log = fetch_log(&state.client, &state.config.source).await?;
    debug!(selected = ?query.date, "building dashboard");
    let dashboard = build_dashboard(&log, &state.config, query.date.as_deref())?;
    Ok(Json(dashboard))
}

pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    let log = fetch_log(&state.client, &state.config.source).await?;
    let stats = TotalStats::build(&log, state.config.timezone);
    Ok(Json(build_summary(&stats, Utc::now())?))
}
