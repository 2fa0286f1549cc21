use chrono::{DateTime, Utc};
use contracts::domain::a002_membership_type::aggregate::{
    normalize_name, MembershipType, MembershipTypeDto, MembershipTypeId, MembershipTypeUpdateDto,
};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::domain::a003_membership;
use crate::shared::error::{AppError, AppResult};

/// Каталог типов; неактивные только по запросу
pub async fn list(db: &DatabaseConnection, include_inactive: bool) -> AppResult<Vec<MembershipType>> {
    Ok(repository::list(db, include_inactive).await?)
}

/// Создание типа абонемента
pub async fn create(
    db: &DatabaseConnection,
    dto: MembershipTypeDto,
    now: DateTime<Utc>,
) -> AppResult<MembershipType> {
    let aggregate = MembershipType::new_for_insert(&dto, now);

    // Валидация
    aggregate.validate().map_err(AppError::Validation)?;

    if repository::get_by_name(db, &aggregate.name).await?.is_some() {
        return Err(AppError::conflict(format!(
            "Тип абонемента {} уже существует",
            aggregate.name
        )));
    }

    repository::insert(db, &aggregate).await?;
    tracing::info!(
        "Created membership type {} ({} days)",
        aggregate.name,
        aggregate.days_granted
    );
    Ok(aggregate)
}

/// Обновление типа абонемента, включая флаг активности
pub async fn update(
    db: &DatabaseConnection,
    id: MembershipTypeId,
    dto: MembershipTypeUpdateDto,
    now: DateTime<Utc>,
) -> AppResult<MembershipType> {
    if dto.is_empty() {
        return Err(AppError::validation("Нет данных для обновления"));
    }

    let mut aggregate = repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Тип абонемента не найден"))?;

    if let Some(name) = &dto.name {
        let normalized = normalize_name(name);
        if let Some(existing) = repository::get_by_name(db, &normalized).await? {
            if existing.id != id {
                return Err(AppError::conflict(format!(
                    "Тип абонемента {} уже существует",
                    normalized
                )));
            }
        }
    }

    aggregate.update(&dto, now);
    aggregate.validate().map_err(AppError::Validation)?;

    repository::update(db, &aggregate).await?;
    Ok(aggregate)
}

/// Удаление типа, на который не ссылается ни один абонемент
pub async fn delete(db: &DatabaseConnection, id: MembershipTypeId) -> AppResult<()> {
    let in_use = a003_membership::repository::count_by_type(db, id).await?;
    if in_use > 0 {
        return Err(AppError::conflict(format!(
            "Тип абонемента используется в {} абонементах; его можно только деактивировать",
            in_use
        )));
    }

    if !repository::delete(db, id).await? {
        return Err(AppError::not_found("Тип абонемента не найден"));
    }
    tracing::info!("Deleted membership type {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_member;
    use crate::shared::data::db::connect_in_memory;
    use chrono::TimeZone;
    use contracts::domain::a001_member::aggregate::MemberDto;
    use contracts::domain::common::AggregateId;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn dto(name: &str, days: i32) -> MembershipTypeDto {
        MembershipTypeDto {
            name: name.into(),
            days_granted: days,
            price: Some(100.0),
            description: Some("test".into()),
        }
    }

    #[tokio::test]
    async fn names_are_unique_after_normalization() {
        let db = connect_in_memory().await;
        let created = create(&db, dto("quincenal", 15), now()).await.unwrap();
        assert_eq!(created.name, "QUINCENAL");

        let err = create(&db, dto(" Quincenal ", 15), now()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn invalid_type_is_rejected() {
        let db = connect_in_memory().await;
        let err = create(&db, dto("X", 10), now()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = create(&db, dto("ANUAL", 0), now()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn deactivated_types_hidden_by_default() {
        let db = connect_in_memory().await;
        let a = create(&db, dto("semanal", 7), now()).await.unwrap();
        create(&db, dto("mensual", 30), now()).await.unwrap();

        let updated = update(
            &db,
            a.id,
            MembershipTypeUpdateDto {
                is_active: Some(false),
                ..Default::default()
            },
            now(),
        )
        .await
        .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.metadata.version, 1);

        assert_eq!(list(&db, false).await.unwrap().len(), 1);
        assert_eq!(list(&db, true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn rename_onto_existing_name_conflicts() {
        let db = connect_in_memory().await;
        let a = create(&db, dto("semanal", 7), now()).await.unwrap();
        create(&db, dto("mensual", 30), now()).await.unwrap();

        let err = update(
            &db,
            a.id,
            MembershipTypeUpdateDto {
                name: Some("Mensual".into()),
                ..Default::default()
            },
            now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = update(
            &db,
            MembershipTypeId::new_v4(),
            MembershipTypeUpdateDto {
                days_granted: Some(10),
                ..Default::default()
            },
            now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_patch_is_rejected_without_touching_version() {
        let db = connect_in_memory().await;
        let created = create(&db, dto("mensual", 30), now()).await.unwrap();

        let err = update(&db, created.id, MembershipTypeUpdateDto::default(), now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let stored = repository::get_by_id(&db, created.id).await.unwrap().unwrap();
        assert_eq!(stored.metadata.version, 0);

        // Явный null в описании считается изменением
        let cleared = update(
            &db,
            created.id,
            MembershipTypeUpdateDto {
                description: Some(None),
                ..Default::default()
            },
            now(),
        )
        .await
        .unwrap();
        assert_eq!(cleared.description, None);
    }

    #[tokio::test]
    async fn referenced_type_cannot_be_deleted() {
        let db = connect_in_memory().await;
        let used = create(&db, dto("semanal", 7), now()).await.unwrap();
        let unused = create(&db, dto("diaria", 1), now()).await.unwrap();

        a001_member::service::create(
            &db,
            MemberDto {
                first_name: "Elena".into(),
                last_name: "Vargas".into(),
                age: 29,
                phone: "99887766".into(),
                membership_type_id: Some(used.id.as_string()),
            },
            now(),
        )
        .await
        .unwrap();

        let err = delete(&db, used.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        delete(&db, unused.id).await.unwrap();
        let err = delete(&db, unused.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
