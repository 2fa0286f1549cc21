use serde::{Deserialize, Serialize};

use super::aggregate::Member;
use crate::domain::a003_membership::aggregate::MembershipWithType;
use crate::enums::member_status::MemberStatus;

/// Строка списка участников
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberListItem {
    #[serde(flatten)]
    pub member: Member,
    pub status: MemberStatus,
    pub latest_membership: Option<MembershipWithType>,
}

/// Карточка участника
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetail {
    #[serde(flatten)]
    pub member: Member,
    pub status: MemberStatus,
    pub latest_membership: Option<MembershipWithType>,
    /// Дней до окончания последнего абонемента (округление вверх, может быть <= 0)
    pub days_remaining: Option<i64>,
    /// Осталось от 1 до 7 дней
    pub expiring_soon: bool,
    /// Вся история, сначала последние созданные
    pub memberships: Vec<MembershipWithType>,
}

/// Результат создания участника
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCreated {
    pub member: Member,
    pub membership: Option<MembershipWithType>,
}
