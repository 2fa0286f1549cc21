use chrono::{DateTime, Datelike, TimeZone, Utc};
use contracts::dashboards::d100_gym_overview::{DashboardStats, MonthlyEnrollment, RecentMember};
use contracts::enums::member_status::MemberStatus;

use crate::domain::a001_member::snapshot::MemberSnapshot;
use crate::shared::config::DashboardConfig;
use crate::shared::locale::Locale;

/// Количество месяцев в гистограмме записей
pub const HISTOGRAM_MONTHS: i32 = 6;

#[derive(Debug, Clone, Copy)]
pub struct DashboardOptions {
    pub locale: Locale,
    pub recent_members: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            locale: Locale::Es,
            recent_members: 5,
        }
    }
}

impl From<&DashboardConfig> for DashboardOptions {
    fn from(cfg: &DashboardConfig) -> Self {
        Self {
            locale: cfg.locale,
            recent_members: cfg.recent_members,
        }
    }
}

/// Начало месяца 00:00:00 UTC
fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Сдвиг (год, месяц) на `delta` месяцев
fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// Сводка по всем участникам на момент `now`
///
/// Чистая функция: снимок уже прочитан из БД целиком.
pub fn aggregate_dashboard(
    members: &[MemberSnapshot],
    now: DateTime<Utc>,
    options: &DashboardOptions,
) -> DashboardStats {
    let mut active_members = 0;
    let mut inactive_members = 0;
    let mut without_membership_members = 0;
    let mut members_not_renewed = 0;

    for snapshot in members {
        match snapshot.status(now) {
            MemberStatus::Active => active_members += 1,
            MemberStatus::Inactive => inactive_members += 1,
            MemberStatus::NoMembership => without_membership_members += 1,
        }
        // Только по дате: деактивированный, но не истёкший сюда не попадает
        if let Some(latest) = snapshot.latest() {
            if latest.membership.expiration_date < now {
                members_not_renewed += 1;
            }
        }
    }

    let current_month_start = month_start(now.year(), now.month());
    let new_members_this_month = members
        .iter()
        .filter(|s| {
            let enrolled = s.member.first_enrollment_date;
            enrolled >= current_month_start && enrolled <= now
        })
        .count();

    DashboardStats {
        total_members: members.len(),
        active_members,
        inactive_members,
        without_membership_members,
        new_members_this_month,
        members_not_renewed,
        enrollments_by_month: enrollments_by_month(members, now, options.locale),
        recent_members: recent_members(members, now, options),
    }
}

/// Шесть календарных месяцев, от старого к текущему
///
/// Границы полуоткрытые: `[начало месяца, начало следующего)`.
fn enrollments_by_month(
    members: &[MemberSnapshot],
    now: DateTime<Utc>,
    locale: Locale,
) -> Vec<MonthlyEnrollment> {
    (0..HISTOGRAM_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = shift_month(now.year(), now.month(), -back);
            let (next_year, next_month) = shift_month(year, month, 1);
            let start = month_start(year, month);
            let end = month_start(next_year, next_month);

            let count = members
                .iter()
                .filter(|s| {
                    let enrolled = s.member.first_enrollment_date;
                    enrolled >= start && enrolled < end
                })
                .count();

            MonthlyEnrollment {
                month: locale.short_month(month).to_string(),
                year,
                month_number: month,
                count,
            }
        })
        .collect()
}

fn recent_members(
    members: &[MemberSnapshot],
    now: DateTime<Utc>,
    options: &DashboardOptions,
) -> Vec<RecentMember> {
    let mut ordered: Vec<&MemberSnapshot> = members.iter().collect();
    ordered.sort_by(|a, b| {
        b.member
            .first_enrollment_date
            .cmp(&a.member.first_enrollment_date)
    });

    ordered
        .into_iter()
        .take(options.recent_members)
        .map(|s| RecentMember {
            id: s.member.id,
            name: s.member.full_name(),
            phone: s.member.phone.clone(),
            status: s.status(now),
            enrollment_date: s.member.first_enrollment_date,
            membership_type: s
                .latest()
                .map(|m| m.membership_type_name.clone())
                .unwrap_or_else(|| options.locale.no_membership_label().to_string()),
        })
        .collect()
}
