use chrono::{DateTime, Utc};
use contracts::domain::a001_member::aggregate::{Member, MemberDto, MemberId, MemberUpdateDto};
use contracts::domain::a001_member::views::{MemberCreated, MemberDetail, MemberListItem};
use contracts::domain::a002_membership_type::aggregate::MembershipTypeId;
use contracts::domain::a003_membership::aggregate::MembershipWithType;
use contracts::enums::member_status::MemberStatus;
use contracts::shared::pagination::Page;
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::{repository, snapshot};
use crate::domain::a002_membership_type;
use crate::domain::a003_membership::{self, renewal};
use crate::shared::error::{parse_id, AppError, AppResult};
use crate::shared::pagination::filter_and_paginate;

/// Порог "скоро истекает", дней
const EXPIRING_SOON_DAYS: i64 = 7;

const SECONDS_PER_DAY: i64 = 86_400;

/// Создание участника и, если указан тип, первого абонемента (одна транзакция)
pub async fn create(
    db: &DatabaseConnection,
    dto: MemberDto,
    now: DateTime<Utc>,
) -> AppResult<MemberCreated> {
    let member = Member::new_for_insert(&dto, now);
    member.validate().map_err(AppError::Validation)?;

    if repository::get_by_phone(db, &member.phone).await?.is_some() {
        return Err(AppError::conflict(
            "Участник с таким номером телефона уже существует",
        ));
    }

    let membership_type = match dto.membership_type_id.as_deref() {
        Some(raw) => {
            let type_id: MembershipTypeId = parse_id(raw)?;
            let found = a002_membership_type::repository::get_by_id(db, type_id)
                .await?
                .ok_or_else(|| AppError::not_found("Тип абонемента не найден"))?;
            Some(found)
        }
        None => None,
    };

    let txn = db.begin().await?;
    repository::insert(&txn, &member).await?;
    let membership = match &membership_type {
        Some(t) => {
            let plan = renewal::plan_renewal(&member, t, now);
            renewal::apply_plan(&txn, &plan).await?;
            Some(MembershipWithType {
                membership: plan.new_membership,
                membership_type_name: t.name.clone(),
                days_granted: t.days_granted,
            })
        }
        None => None,
    };
    txn.commit().await?;

    tracing::info!(
        "Created member {} ({}), initial membership: {}",
        member.id,
        member.full_name(),
        membership
            .as_ref()
            .map(|m| m.membership_type_name.as_str())
            .unwrap_or("none")
    );

    let member = Member {
        last_renewal_date: membership.as_ref().map(|m| m.membership.acquisition_date),
        ..member
    };
    Ok(MemberCreated { member, membership })
}

/// Частичное обновление анкеты
pub async fn update(
    db: &DatabaseConnection,
    id: MemberId,
    dto: MemberUpdateDto,
    now: DateTime<Utc>,
) -> AppResult<Member> {
    if dto.is_empty() {
        return Err(AppError::validation("Нет данных для обновления"));
    }

    let mut member = repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Участник не найден"))?;

    member.update(&dto, now);
    member.validate().map_err(AppError::Validation)?;

    if dto.phone.is_some() {
        if let Some(existing) = repository::get_by_phone(db, &member.phone).await? {
            if existing.id != member.id {
                return Err(AppError::conflict("Телефон уже зарегистрирован"));
            }
        }
    }

    repository::update(db, &member).await?;
    tracing::info!("Updated member {}", member.id);
    Ok(member)
}

/// Удаление участника вместе со всей историей
pub async fn delete(db: &DatabaseConnection, id: MemberId) -> AppResult<()> {
    let txn = db.begin().await?;
    let removed_memberships = a003_membership::repository::delete_for_member(&txn, id).await?;
    if !repository::delete(&txn, id).await? {
        return Err(AppError::not_found("Участник не найден"));
    }
    txn.commit().await?;

    tracing::info!(
        "Deleted member {} with {} memberships",
        id,
        removed_memberships
    );
    Ok(())
}

/// Карточка участника со статусом и историей
pub async fn get_detail(
    db: &DatabaseConnection,
    id: MemberId,
    now: DateTime<Utc>,
) -> AppResult<MemberDetail> {
    let member = repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Участник не найден"))?;

    let snapshot = snapshot::load(db, vec![member])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("Участник не найден"))?;

    Ok(build_detail(snapshot, now))
}

pub fn build_detail(snapshot: snapshot::MemberSnapshot, now: DateTime<Utc>) -> MemberDetail {
    let status = snapshot.status(now);
    let latest_membership = snapshot.latest().cloned();
    let days_remaining = latest_membership
        .as_ref()
        .map(|m| days_until(m.membership.expiration_date, now));
    let expiring_soon = matches!(days_remaining, Some(d) if d > 0 && d <= EXPIRING_SOON_DAYS);
    let memberships = snapshot.history_newest_first();

    MemberDetail {
        member: snapshot.member,
        status,
        latest_membership,
        days_remaining,
        expiring_soon,
        memberships,
    }
}

/// Целых дней до даты, с округлением вверх
fn days_until(date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (date - now).num_seconds();
    (seconds + SECONDS_PER_DAY - 1).div_euclid(SECONDS_PER_DAY)
}

/// История абонементов участника, сначала последние по дате приобретения
pub async fn list_memberships(
    db: &DatabaseConnection,
    id: MemberId,
) -> AppResult<Vec<MembershipWithType>> {
    let member = repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Участник не найден"))?;

    let mut history = snapshot::load(db, vec![member])
        .await?
        .pop()
        .map(|s| s.history)
        .unwrap_or_default();
    history.sort_by(|a, b| {
        b.membership
            .acquisition_date
            .cmp(&a.membership.acquisition_date)
    });
    Ok(history)
}

/// Список участников: поиск в БД, статус, фильтр и страницы
pub async fn list_paginated(
    db: &DatabaseConnection,
    search: Option<&str>,
    status: Option<MemberStatus>,
    page: usize,
    limit: usize,
    now: DateTime<Utc>,
) -> AppResult<Page<MemberListItem>> {
    let snapshots = match search {
        Some(q) => snapshot::load(db, repository::search(db, q).await?).await?,
        None => snapshot::load_all(db).await?,
    };

    let items: Vec<MemberListItem> = snapshots
        .into_iter()
        .map(|s| s.into_list_item(now))
        .collect();

    Ok(filter_and_paginate(items, status, page, limit))
}

/// Вставка тестовых данных
pub async fn insert_test_data(db: &DatabaseConnection, now: DateTime<Utc>) -> AppResult<usize> {
    let types = a002_membership_type::repository::list(db, false).await?;
    let type_id = |name: &str| {
        types
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.id.to_string())
    };

    let data = vec![
        ("Juan Carlos", "García López", 28, "12345678", type_id("MENSUAL")),
        ("María José", "Rodríguez Pérez", 25, "87654321", type_id("TRIMESTRAL")),
        ("Carlos Eduardo", "Martínez Silva", 35, "11223344", type_id("SEMANAL")),
        ("Ana Lucía", "Hernández Morales", 22, "44332211", None),
        ("Pedro Antonio", "López Castillo", 31, "55667788", type_id("DIARIA")),
    ];

    let mut inserted = 0;
    for (first_name, last_name, age, phone, membership_type_id) in data {
        let dto = MemberDto {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
            phone: phone.into(),
            membership_type_id,
        };
        match create(db, dto, now).await {
            Ok(_) => inserted += 1,
            Err(AppError::Conflict(_)) => {
                tracing::info!("Test member {} already exists, skipping", phone);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a002_membership_type::service as type_service;
    use crate::shared::data::db::connect_in_memory;
    use chrono::{Duration, TimeZone};
    use contracts::domain::a002_membership_type::aggregate::MembershipTypeDto;
    use contracts::domain::common::AggregateId;

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn dto(phone: &str, type_id: Option<String>) -> MemberDto {
        MemberDto {
            first_name: "Sofía".into(),
            last_name: "Castillo".into(),
            age: 27,
            phone: phone.into(),
            membership_type_id: type_id,
        }
    }

    async fn weekly(db: &DatabaseConnection) -> MembershipTypeId {
        type_service::create(
            db,
            MembershipTypeDto {
                name: "semanal".into(),
                days_granted: 7,
                price: Some(85.0),
                description: None,
            },
            ymd(2024, 1, 1),
        )
        .await
        .unwrap()
        .id
    }

    #[test]
    fn days_until_rounds_up() {
        let now = ymd(2024, 3, 1);
        assert_eq!(days_until(now + Duration::hours(1), now), 1);
        assert_eq!(days_until(now + Duration::days(7), now), 7);
        assert_eq!(days_until(now, now), 0);
        assert_eq!(days_until(now - Duration::hours(36), now), -1);
    }

    #[tokio::test]
    async fn create_with_initial_membership() {
        let db = connect_in_memory().await;
        let type_id = weekly(&db).await;

        let created = create(&db, dto("12345678", Some(type_id.as_string())), ymd(2024, 1, 10))
            .await
            .unwrap();
        let membership = created.membership.unwrap();
        assert_eq!(membership.membership.expiration_date, ymd(2024, 1, 17));
        assert_eq!(created.member.last_renewal_date, Some(ymd(2024, 1, 10)));

        let stored = repository::get_by_id(&db, created.member.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.last_renewal_date, Some(ymd(2024, 1, 10)));
    }

    #[tokio::test]
    async fn duplicate_phone_is_conflict() {
        let db = connect_in_memory().await;
        create(&db, dto("12345678", None), ymd(2024, 1, 10)).await.unwrap();
        let err = create(&db, dto("12345678", None), ymd(2024, 1, 11))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn invalid_input_and_unknown_type() {
        let db = connect_in_memory().await;
        let err = create(&db, dto("123", None), ymd(2024, 1, 10)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = create(&db, dto("12345678", Some("bad".into())), ymd(2024, 1, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = create(
            &db,
            dto("12345678", Some(MembershipTypeId::new_v4().as_string())),
            ymd(2024, 1, 10),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        // Ничего не записано
        assert!(repository::list_all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_checks_phone_owner() {
        let db = connect_in_memory().await;
        let a = create(&db, dto("11111111", None), ymd(2024, 1, 10)).await.unwrap();
        create(&db, dto("22222222", None), ymd(2024, 1, 10)).await.unwrap();

        let err = update(
            &db,
            a.member.id,
            MemberUpdateDto {
                phone: Some("22222222".into()),
                ..Default::default()
            },
            ymd(2024, 1, 12),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Свой же номер не конфликт
        let updated = update(
            &db,
            a.member.id,
            MemberUpdateDto {
                phone: Some("11111111".into()),
                age: Some(45),
                ..Default::default()
            },
            ymd(2024, 1, 12),
        )
        .await
        .unwrap();
        assert_eq!(updated.age, 45);

        let err = update(&db, a.member.id, MemberUpdateDto::default(), ymd(2024, 1, 12))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_cascades_history() {
        let db = connect_in_memory().await;
        let type_id = weekly(&db).await;
        let created = create(&db, dto("12345678", Some(type_id.as_string())), ymd(2024, 1, 10))
            .await
            .unwrap();

        delete(&db, created.member.id).await.unwrap();
        assert!(repository::get_by_id(&db, created.member.id)
            .await
            .unwrap()
            .is_none());
        assert!(a003_membership::repository::list_all(&db)
            .await
            .unwrap()
            .is_empty());

        let err = delete(&db, created.member.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn detail_reports_expiring_soon() {
        let db = connect_in_memory().await;
        let type_id = weekly(&db).await;
        let created = create(&db, dto("12345678", Some(type_id.as_string())), ymd(2024, 1, 10))
            .await
            .unwrap();

        let detail = get_detail(&db, created.member.id, ymd(2024, 1, 12)).await.unwrap();
        assert_eq!(detail.status, MemberStatus::Active);
        assert_eq!(detail.days_remaining, Some(5));
        assert!(detail.expiring_soon);
        assert_eq!(detail.memberships.len(), 1);

        let detail = get_detail(&db, created.member.id, ymd(2024, 2, 1)).await.unwrap();
        assert_eq!(detail.status, MemberStatus::Inactive);
        assert!(!detail.expiring_soon);
    }

    #[tokio::test]
    async fn list_filters_by_status_before_paging() {
        let db = connect_in_memory().await;
        let type_id = weekly(&db).await;
        let now = ymd(2024, 1, 12);

        for i in 0..12 {
            let phone = format!("{:08}", 10_000_000 + i);
            let type_ref = if i % 3 == 0 { Some(type_id.as_string()) } else { None };
            create(&db, dto(&phone, type_ref), ymd(2024, 1, 10)).await.unwrap();
        }

        let page = list_paginated(&db, None, Some(MemberStatus::Active), 1, 10, now)
            .await
            .unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.items.len(), 4);
        assert_eq!(page.total_pages, 1);

        let page = list_paginated(&db, None, Some(MemberStatus::NoMembership), 2, 5, now)
            .await
            .unwrap();
        assert_eq!(page.total, 8);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_pages, 2);

        let page = list_paginated(&db, Some("1000000"), None, 1, 10, now)
            .await
            .unwrap();
        assert_eq!(page.total, 10);
    }
}
