use contracts::domain::a002_membership_type::aggregate::{MembershipType, MembershipTypeId};
use contracts::domain::common::{AggregateId, EntityMetadata};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_membership_type")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    pub days_granted: i32,
    pub price: f64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MembershipType {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let id = MembershipTypeId::from_string(&m.id).map_err(anyhow::Error::msg)?;
        Ok(MembershipType {
            id,
            name: m.name,
            days_granted: m.days_granted,
            price: m.price,
            description: m.description,
            is_active: m.is_active,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        })
    }
}

fn to_active_model(aggregate: &MembershipType) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.id.as_string()),
        name: Set(aggregate.name.clone()),
        days_granted: Set(aggregate.days_granted),
        price: Set(aggregate.price),
        description: Set(aggregate.description.clone()),
        is_active: Set(aggregate.is_active),
        created_at: Set(aggregate.metadata.created_at),
        updated_at: Set(aggregate.metadata.updated_at),
        version: Set(aggregate.metadata.version),
    }
}

/// Каталог по возрастанию срока действия
pub async fn list<C: ConnectionTrait>(db: &C, include_inactive: bool) -> anyhow::Result<Vec<MembershipType>> {
    let mut query = Entity::find();
    if !include_inactive {
        query = query.filter(Column::IsActive.eq(true));
    }
    query
        .order_by_asc(Column::DaysGranted)
        .order_by_asc(Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(MembershipType::try_from)
        .collect()
}

/// Все типы (включая скрытые из каталога), по ID
pub async fn map_all<C: ConnectionTrait>(
    db: &C,
) -> anyhow::Result<HashMap<MembershipTypeId, MembershipType>> {
    Ok(list(db, true)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect())
}

pub async fn count<C: ConnectionTrait>(db: &C) -> anyhow::Result<u64> {
    Ok(Entity::find().count(db).await?)
}

pub async fn get_by_id<C: ConnectionTrait>(
    db: &C,
    id: MembershipTypeId,
) -> anyhow::Result<Option<MembershipType>> {
    Entity::find_by_id(id.as_string())
        .one(db)
        .await?
        .map(MembershipType::try_from)
        .transpose()
}

pub async fn get_by_name<C: ConnectionTrait>(db: &C, name: &str) -> anyhow::Result<Option<MembershipType>> {
    Entity::find()
        .filter(Column::Name.eq(name))
        .one(db)
        .await?
        .map(MembershipType::try_from)
        .transpose()
}

pub async fn insert<C: ConnectionTrait>(db: &C, aggregate: &MembershipType) -> anyhow::Result<MembershipTypeId> {
    to_active_model(aggregate).insert(db).await?;
    Ok(aggregate.id)
}

pub async fn update<C: ConnectionTrait>(db: &C, aggregate: &MembershipType) -> anyhow::Result<()> {
    let mut active = to_active_model(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(db).await?;
    Ok(())
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: MembershipTypeId) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.as_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}
