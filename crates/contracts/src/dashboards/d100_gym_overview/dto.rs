use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::a001_member::aggregate::MemberId;
use crate::enums::member_status::MemberStatus;

/// Сводная статистика для главной панели
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_members: usize,
    pub active_members: usize,
    /// Последний абонемент есть, но недействителен
    pub inactive_members: usize,
    /// Ни одного абонемента в истории
    pub without_membership_members: usize,
    pub new_members_this_month: usize,
    /// Последний абонемент просрочен (участники без абонементов не входят)
    pub members_not_renewed: usize,
    /// Ровно 6 месяцев, от старого к текущему
    pub enrollments_by_month: Vec<MonthlyEnrollment>,
    pub recent_members: Vec<RecentMember>,
}

/// Количество первичных записей за календарный месяц
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEnrollment {
    /// Короткое локализованное название месяца
    pub month: String,
    pub year: i32,
    pub month_number: u32,
    pub count: usize,
}

/// Недавно записавшийся участник
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMember {
    pub id: MemberId,
    pub name: String,
    pub phone: String,
    pub status: MemberStatus,
    pub enrollment_date: DateTime<Utc>,
    /// Название типа последнего абонемента или метка "нет абонемента"
    pub membership_type: String,
}
