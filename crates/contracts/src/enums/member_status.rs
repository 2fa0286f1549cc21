use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::a003_membership::aggregate::Membership;

/// Вычисляемый статус участника (в БД не хранится)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Active,
    Inactive,
    NoMembership,
}

impl MemberStatus {
    pub fn code(&self) -> &'static str {
        match self {
            MemberStatus::Active => "ACTIVE",
            MemberStatus::Inactive => "INACTIVE",
            MemberStatus::NoMembership => "NO_MEMBERSHIP",
        }
    }

    pub fn all() -> [MemberStatus; 3] {
        [
            MemberStatus::Active,
            MemberStatus::Inactive,
            MemberStatus::NoMembership,
        ]
    }

    /// Парсинг из строки запроса (регистр не важен)
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::all()
            .into_iter()
            .find(|s| s.code().eq_ignore_ascii_case(code))
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Статус по последнему абонементу участника на момент `now`
///
/// ACTIVE только если флаг абонемента установлен и срок истекает строго
/// после `now`. Срок, равный `now`, считается истёкшим.
pub fn classify_status(latest: Option<&Membership>, now: DateTime<Utc>) -> MemberStatus {
    match latest {
        None => MemberStatus::NoMembership,
        Some(m) if m.is_active && m.expiration_date > now => MemberStatus::Active,
        Some(_) => MemberStatus::Inactive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_member::aggregate::MemberId;
    use crate::domain::a002_membership_type::aggregate::MembershipTypeId;
    use crate::domain::a003_membership::aggregate::MembershipId;
    use crate::domain::common::AggregateId;
    use chrono::{Duration, TimeZone};

    fn membership(is_active: bool, expiration_date: DateTime<Utc>) -> Membership {
        Membership {
            id: MembershipId::new_v4(),
            member_id: MemberId::new_v4(),
            membership_type_id: MembershipTypeId::new_v4(),
            acquisition_date: expiration_date - Duration::days(30),
            expiration_date,
            is_active,
            created_at: expiration_date - Duration::days(30),
        }
    }

    #[test]
    fn no_membership_for_empty_history() {
        let now = Utc::now();
        assert_eq!(classify_status(None, now), MemberStatus::NoMembership);
    }

    #[test]
    fn active_requires_flag_and_future_expiration() {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let later = now + Duration::seconds(1);
        let earlier = now - Duration::seconds(1);

        assert_eq!(classify_status(Some(&membership(true, later)), now), MemberStatus::Active);
        assert_eq!(classify_status(Some(&membership(false, later)), now), MemberStatus::Inactive);
        assert_eq!(classify_status(Some(&membership(true, earlier)), now), MemberStatus::Inactive);
        assert_eq!(classify_status(Some(&membership(false, earlier)), now), MemberStatus::Inactive);
    }

    #[test]
    fn expiration_equal_to_now_is_expired() {
        let now = Utc.with_ymd_and_hms(2024, 2, 9, 0, 0, 0).unwrap();
        assert_eq!(classify_status(Some(&membership(true, now)), now), MemberStatus::Inactive);
    }

    #[test]
    fn lapsed_monthly_membership_is_inactive() {
        let m = Membership {
            acquisition_date: Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
            ..membership(true, Utc.with_ymd_and_hms(2024, 2, 9, 0, 0, 0).unwrap())
        };
        let now = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();
        assert_eq!(classify_status(Some(&m), now), MemberStatus::Inactive);
    }

    #[test]
    fn status_codes_round_trip_through_serde_and_query() {
        assert_eq!(
            serde_json::to_string(&MemberStatus::NoMembership).unwrap(),
            "\"NO_MEMBERSHIP\""
        );
        assert_eq!(MemberStatus::from_code("active"), Some(MemberStatus::Active));
        assert_eq!(MemberStatus::from_code(" no_membership "), Some(MemberStatus::NoMembership));
        assert_eq!(MemberStatus::from_code("EXPIRED"), None);
    }
}
