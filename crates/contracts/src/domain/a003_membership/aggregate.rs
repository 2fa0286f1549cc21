use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::a001_member::aggregate::MemberId;
use crate::domain::a002_membership_type::aggregate::MembershipTypeId;

crate::aggregate_id!(
    /// Уникальный идентификатор абонемента
    MembershipId
);

/// Абонемент: одна покупка или продление
///
/// `expiration_date` фиксируется при создании и не пересчитывается
/// при последующем изменении срока в каталоге.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: MembershipId,
    pub member_id: MemberId,
    pub membership_type_id: MembershipTypeId,
    pub acquisition_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Абонемент вместе с данными его типа (история, карточка участника)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipWithType {
    #[serde(flatten)]
    pub membership: Membership,
    pub membership_type_name: String,
    pub days_granted: i32,
}

/// Текущий (последний созданный) абонемент из истории
///
/// История передаётся в порядке создания. Выбирается запись с наибольшим
/// `created_at`; при равенстве побеждает более поздняя позиция.
/// Даты приобретения и окончания в выборе не участвуют.
pub fn latest_membership<T, F>(history: &[T], membership: F) -> Option<&T>
where
    F: Fn(&T) -> &Membership,
{
    history
        .iter()
        .enumerate()
        .max_by_key(|(idx, item)| (membership(item).created_at, *idx))
        .map(|(_, item)| item)
}
