use chrono::Utc;
use contracts::domain::a001_member::aggregate::{Member, MemberId};
use contracts::domain::common::{AggregateId, EntityMetadata};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_member")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    #[sea_orm(unique)]
    pub phone: String,
    pub first_enrollment_date: chrono::DateTime<chrono::Utc>,
    pub last_renewal_date: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Member {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let id = MemberId::from_string(&m.id).map_err(anyhow::Error::msg)?;
        Ok(Member {
            id,
            first_name: m.first_name,
            last_name: m.last_name,
            age: m.age,
            phone: m.phone,
            first_enrollment_date: m.first_enrollment_date,
            last_renewal_date: m.last_renewal_date,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        })
    }
}

fn to_aggregates(models: Vec<Model>) -> anyhow::Result<Vec<Member>> {
    models.into_iter().map(Member::try_from).collect()
}

/// Все участники, сначала последние созданные
pub async fn list_all<C: ConnectionTrait>(db: &C) -> anyhow::Result<Vec<Member>> {
    let mut items = to_aggregates(Entity::find().all(db).await?)?;
    sort_newest_first(&mut items);
    Ok(items)
}

/// Поиск по подстроке имени, фамилии или телефона
///
/// Регистр не учитывается (LIKE в SQLite, только для ASCII).
pub async fn search<C: ConnectionTrait>(db: &C, query: &str) -> anyhow::Result<Vec<Member>> {
    let query = query.trim();
    if query.is_empty() {
        return list_all(db).await;
    }

    let pattern = contains_pattern(query);
    let like = |column: Column| {
        Expr::col((Entity, column)).like(LikeExpr::new(pattern.clone()).escape('\\'))
    };
    let condition = Condition::any()
        .add(like(Column::FirstName))
        .add(like(Column::LastName))
        .add(like(Column::Phone));

    let mut items = to_aggregates(Entity::find().filter(condition).all(db).await?)?;
    sort_newest_first(&mut items);
    Ok(items)
}

/// Шаблон LIKE "содержит"; `%` и `_` в запросе ищутся буквально
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn sort_newest_first(items: &mut [Member]) {
    items.sort_by(|a, b| b.metadata.created_at.cmp(&a.metadata.created_at));
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: MemberId) -> anyhow::Result<Option<Member>> {
    Entity::find_by_id(id.as_string())
        .one(db)
        .await?
        .map(Member::try_from)
        .transpose()
}

pub async fn get_by_phone<C: ConnectionTrait>(db: &C, phone: &str) -> anyhow::Result<Option<Member>> {
    Entity::find()
        .filter(Column::Phone.eq(phone))
        .one(db)
        .await?
        .map(Member::try_from)
        .transpose()
}

pub async fn insert<C: ConnectionTrait>(db: &C, aggregate: &Member) -> anyhow::Result<MemberId> {
    let active = ActiveModel {
        id: Set(aggregate.id.as_string()),
        first_name: Set(aggregate.first_name.clone()),
        last_name: Set(aggregate.last_name.clone()),
        age: Set(aggregate.age),
        phone: Set(aggregate.phone.clone()),
        first_enrollment_date: Set(aggregate.first_enrollment_date),
        last_renewal_date: Set(aggregate.last_renewal_date),
        created_at: Set(aggregate.metadata.created_at),
        updated_at: Set(aggregate.metadata.updated_at),
        version: Set(aggregate.metadata.version),
    };
    active.insert(db).await?;
    Ok(aggregate.id)
}

/// Обновление анкетных данных (дата первой записи не меняется)
pub async fn update<C: ConnectionTrait>(db: &C, aggregate: &Member) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(aggregate.id.as_string()),
        first_name: Set(aggregate.first_name.clone()),
        last_name: Set(aggregate.last_name.clone()),
        age: Set(aggregate.age),
        phone: Set(aggregate.phone.clone()),
        updated_at: Set(aggregate.metadata.updated_at),
        version: Set(aggregate.metadata.version),
        first_enrollment_date: sea_orm::ActiveValue::NotSet,
        last_renewal_date: sea_orm::ActiveValue::NotSet,
        created_at: sea_orm::ActiveValue::NotSet,
    };
    active.update(db).await?;
    Ok(())
}

pub async fn set_last_renewal_date<C: ConnectionTrait>(
    db: &C,
    id: MemberId,
    date: chrono::DateTime<Utc>,
) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::LastRenewalDate, Expr::value(Some(date)))
        .col_expr(Column::UpdatedAt, Expr::value(date))
        .filter(Column::Id.eq(id.as_string()))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: MemberId) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.as_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;
    use chrono::TimeZone;
    use contracts::domain::a001_member::aggregate::MemberDto;

    fn member(first_name: &str, phone: &str) -> Member {
        Member::new_for_insert(
            &MemberDto {
                first_name: first_name.into(),
                last_name: "Gómez".into(),
                age: 25,
                phone: phone.into(),
                membership_type_id: None,
            },
            Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("ana"), "%ana%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\x"), "%c:\\\\x%");
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let db = connect_in_memory().await;
        insert(&db, &member("Carla", "11112222")).await.unwrap();
        insert(&db, &member("Raúl", "33334444")).await.unwrap();

        assert!(search(&db, "_").await.unwrap().is_empty());
        assert!(search(&db, "%").await.unwrap().is_empty());

        let found = search(&db, "CARL").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].first_name, "Carla");

        assert_eq!(search(&db, "3333").await.unwrap().len(), 1);
    }
}
