use axum::{extract::State, Json};
use chrono::Utc;
use contracts::dashboards::d100_gym_overview::DashboardStats;

use crate::dashboards::d100_gym_overview::{aggregator::DashboardOptions, service};
use crate::shared::error::AppResult;
use crate::shared::state::AppState;

/// GET /api/dashboard/stats
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let options = DashboardOptions::from(&state.config.dashboard);
    let stats = service::get_stats(&state.db, Utc::now(), &options).await?;
    Ok(Json(stats))
}
