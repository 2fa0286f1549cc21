use contracts::domain::a001_member::aggregate::MemberId;
use contracts::domain::a002_membership_type::aggregate::MembershipTypeId;
use contracts::domain::a003_membership::aggregate::{Membership, MembershipId};
use contracts::domain::common::AggregateId;
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_membership")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub member_id: String,
    pub membership_type_id: String,
    pub acquisition_date: chrono::DateTime<chrono::Utc>,
    pub expiration_date: chrono::DateTime<chrono::Utc>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Membership {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        Ok(Membership {
            id: MembershipId::from_string(&m.id).map_err(anyhow::Error::msg)?,
            member_id: MemberId::from_string(&m.member_id).map_err(anyhow::Error::msg)?,
            membership_type_id: MembershipTypeId::from_string(&m.membership_type_id)
                .map_err(anyhow::Error::msg)?,
            acquisition_date: m.acquisition_date,
            expiration_date: m.expiration_date,
            is_active: m.is_active,
            created_at: m.created_at,
        })
    }
}

/// Размер пачки идентификаторов в одном `IN (...)`
const IDS_PER_QUERY: usize = 500;

/// Абонементы участников в порядке вставки (rowid)
///
/// Порядок вставки нужен для разрешения равных `created_at`. Идентификаторы
/// запрашиваются пачками, чтобы не упереться в лимит параметров SQLite;
/// история каждого участника целиком попадает в одну пачку.
pub async fn list_for_members<C: ConnectionTrait>(
    db: &C,
    member_ids: &[MemberId],
) -> anyhow::Result<Vec<Membership>> {
    let mut result = Vec::new();
    for chunk in member_ids.chunks(IDS_PER_QUERY) {
        let ids: Vec<String> = chunk.iter().map(|id| id.as_string()).collect();
        let models = Entity::find()
            .filter(Column::MemberId.is_in(ids))
            .order_by_asc(Expr::cust("rowid"))
            .all(db)
            .await?;
        for model in models {
            result.push(Membership::try_from(model)?);
        }
    }
    Ok(result)
}

/// Все абонементы в порядке вставки
pub async fn list_all<C: ConnectionTrait>(db: &C) -> anyhow::Result<Vec<Membership>> {
    Entity::find()
        .order_by_asc(Expr::cust("rowid"))
        .all(db)
        .await?
        .into_iter()
        .map(Membership::try_from)
        .collect()
}

pub async fn count_by_type<C: ConnectionTrait>(db: &C, type_id: MembershipTypeId) -> anyhow::Result<u64> {
    Ok(Entity::find()
        .filter(Column::MembershipTypeId.eq(type_id.as_string()))
        .count(db)
        .await?)
}

pub async fn insert<C: ConnectionTrait>(db: &C, membership: &Membership) -> anyhow::Result<MembershipId> {
    let active = ActiveModel {
        id: Set(membership.id.as_string()),
        member_id: Set(membership.member_id.as_string()),
        membership_type_id: Set(membership.membership_type_id.as_string()),
        acquisition_date: Set(membership.acquisition_date),
        expiration_date: Set(membership.expiration_date),
        is_active: Set(membership.is_active),
        created_at: Set(membership.created_at),
    };
    active.insert(db).await?;
    Ok(membership.id)
}

/// Удаление всей истории участника (только вместе с самим участником)
pub async fn delete_for_member<C: ConnectionTrait>(db: &C, member_id: MemberId) -> anyhow::Result<u64> {
    let result = Entity::delete_many()
        .filter(Column::MemberId.eq(member_id.as_string()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
