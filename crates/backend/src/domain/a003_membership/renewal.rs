use chrono::{DateTime, Duration, Utc};
use contracts::domain::a001_member::aggregate::{Member, MemberId};
use contracts::domain::a002_membership_type::aggregate::{MembershipType, MembershipTypeId};
use contracts::domain::a003_membership::aggregate::{Membership, MembershipId, MembershipWithType};
use contracts::domain::common::AggregateId;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use super::repository;
use crate::domain::{a001_member, a002_membership_type};
use crate::shared::error::{AppError, AppResult};

/// Изменения, которые продление вносит в данные
#[derive(Debug, Clone, PartialEq)]
pub struct RenewalPlan {
    pub new_membership: Membership,
    pub updated_last_renewal_date: DateTime<Utc>,
}

/// Расчёт продления на момент `now`
///
/// Срок берётся из типа в момент продления; флаг типа в каталоге
/// (`is_active`) здесь не проверяется.
pub fn plan_renewal(
    member: &Member,
    membership_type: &MembershipType,
    now: DateTime<Utc>,
) -> RenewalPlan {
    let acquisition_date = now;
    let expiration_date = acquisition_date + Duration::days(i64::from(membership_type.days_granted));

    RenewalPlan {
        new_membership: Membership {
            id: MembershipId::new_v4(),
            member_id: member.id,
            membership_type_id: membership_type.id,
            acquisition_date,
            expiration_date,
            is_active: true,
            created_at: now,
        },
        updated_last_renewal_date: acquisition_date,
    }
}

/// Запись плана: новый абонемент и дата продления у участника
///
/// Вызывается внутри транзакции вызывающего.
pub async fn apply_plan<C: ConnectionTrait>(txn: &C, plan: &RenewalPlan) -> anyhow::Result<()> {
    repository::insert(txn, &plan.new_membership).await?;
    let updated = a001_member::repository::set_last_renewal_date(
        txn,
        plan.new_membership.member_id,
        plan.updated_last_renewal_date,
    )
    .await?;
    if !updated {
        anyhow::bail!(
            "member {} disappeared during renewal",
            plan.new_membership.member_id
        );
    }
    Ok(())
}

/// Продление абонемента участника (всё или ничего)
pub async fn renew(
    db: &DatabaseConnection,
    member_id: MemberId,
    membership_type_id: MembershipTypeId,
    now: DateTime<Utc>,
) -> AppResult<MembershipWithType> {
    let member = a001_member::repository::get_by_id(db, member_id)
        .await?
        .ok_or_else(|| AppError::not_found("Участник не найден"))?;

    let membership_type = a002_membership_type::repository::get_by_id(db, membership_type_id)
        .await?
        .ok_or_else(|| AppError::not_found("Тип абонемента не найден"))?;

    let plan = plan_renewal(&member, &membership_type, now);

    // При ошибке транзакция откатывается при drop
    let txn = db.begin().await?;
    apply_plan(&txn, &plan).await?;
    txn.commit().await?;

    tracing::info!(
        "Renewed member {} with {} until {}",
        member.id,
        membership_type.name,
        plan.new_membership.expiration_date
    );

    Ok(MembershipWithType {
        membership: plan.new_membership,
        membership_type_name: membership_type.name,
        days_granted: membership_type.days_granted,
    })
}
