use chrono::{DateTime, Utc};
use contracts::dashboards::d100_gym_overview::DashboardStats;
use sea_orm::DatabaseConnection;

use super::aggregator::{aggregate_dashboard, DashboardOptions};
use crate::domain::a001_member::snapshot;
use crate::shared::error::AppResult;

/// Статистика главной панели по всем участникам
pub async fn get_stats(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
    options: &DashboardOptions,
) -> AppResult<DashboardStats> {
    let members = snapshot::load_all(db).await?;
    let stats = aggregate_dashboard(&members, now, options);
    tracing::debug!(
        "Dashboard stats: {} members, {} active",
        stats.total_members,
        stats.active_members
    );
    Ok(stats)
}
