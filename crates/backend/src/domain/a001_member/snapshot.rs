use chrono::{DateTime, Utc};
use contracts::domain::a001_member::aggregate::{Member, MemberId};
use contracts::domain::a001_member::views::MemberListItem;
use contracts::domain::a002_membership_type::aggregate::{MembershipType, MembershipTypeId};
use contracts::domain::a003_membership::aggregate::{
    latest_membership, Membership, MembershipWithType,
};
use contracts::enums::member_status::{classify_status, MemberStatus};
use sea_orm::ConnectionTrait;
use std::collections::HashMap;

use crate::domain::{a002_membership_type, a003_membership};

/// Участник вместе с полной историей абонементов на момент чтения
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSnapshot {
    pub member: Member,
    /// В порядке создания (старые первыми)
    pub history: Vec<MembershipWithType>,
}

impl MemberSnapshot {
    pub fn latest(&self) -> Option<&MembershipWithType> {
        latest_membership(&self.history, |h| &h.membership)
    }

    pub fn status(&self, now: DateTime<Utc>) -> MemberStatus {
        classify_status(self.latest().map(|h| &h.membership), now)
    }

    /// История, сначала последние созданные
    pub fn history_newest_first(&self) -> Vec<MembershipWithType> {
        let mut items: Vec<MembershipWithType> = self.history.iter().rev().cloned().collect();
        // Стабильная сортировка сохраняет порядок вставки при равных created_at
        items.sort_by(|a, b| b.membership.created_at.cmp(&a.membership.created_at));
        items
    }

    pub fn into_list_item(self, now: DateTime<Utc>) -> MemberListItem {
        let status = self.status(now);
        let latest_membership = self.latest().cloned();
        MemberListItem {
            member: self.member,
            status,
            latest_membership,
        }
    }
}

/// Абонемент с данными типа; неизвестный тип даёт пустое название
pub fn with_type(
    membership: Membership,
    types: &HashMap<MembershipTypeId, MembershipType>,
) -> MembershipWithType {
    match types.get(&membership.membership_type_id) {
        Some(t) => MembershipWithType {
            membership_type_name: t.name.clone(),
            days_granted: t.days_granted,
            membership,
        },
        None => {
            tracing::warn!(
                "Membership {} references unknown type {}",
                membership.id,
                membership.membership_type_id
            );
            MembershipWithType {
                membership_type_name: String::new(),
                days_granted: 0,
                membership,
            }
        }
    }
}

/// Раскладка абонементов по участникам с сохранением порядка
pub fn assemble(
    members: Vec<Member>,
    memberships: Vec<Membership>,
    types: &HashMap<MembershipTypeId, MembershipType>,
) -> Vec<MemberSnapshot> {
    let mut by_member: HashMap<MemberId, Vec<MembershipWithType>> = HashMap::new();
    for membership in memberships {
        by_member
            .entry(membership.member_id)
            .or_default()
            .push(with_type(membership, types));
    }

    members
        .into_iter()
        .map(|member| {
            let history = by_member.remove(&member.id).unwrap_or_default();
            MemberSnapshot { member, history }
        })
        .collect()
}

/// Загрузка истории для набора участников (порядок участников сохраняется)
pub async fn load<C: ConnectionTrait>(db: &C, members: Vec<Member>) -> anyhow::Result<Vec<MemberSnapshot>> {
    let ids: Vec<MemberId> = members.iter().map(|m| m.id).collect();
    let memberships = a003_membership::repository::list_for_members(db, &ids).await?;
    let types = a002_membership_type::repository::map_all(db).await?;
    Ok(assemble(members, memberships, &types))
}

/// Снимок всех участников для панели
pub async fn load_all<C: ConnectionTrait>(db: &C) -> anyhow::Result<Vec<MemberSnapshot>> {
    let members = super::repository::list_all(db).await?;
    let memberships = a003_membership::repository::list_all(db).await?;
    let types = a002_membership_type::repository::map_all(db).await?;
    Ok(assemble(members, memberships, &types))
}
