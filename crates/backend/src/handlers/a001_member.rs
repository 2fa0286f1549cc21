use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use contracts::domain::a001_member::aggregate::{
    Member, MemberDto, MemberId, MemberUpdateDto, RenewMembershipDto,
};
use contracts::domain::a001_member::views::{MemberCreated, MemberDetail, MemberListItem};
use contracts::domain::a002_membership_type::aggregate::MembershipTypeId;
use contracts::domain::a003_membership::aggregate::MembershipWithType;
use contracts::enums::member_status::MemberStatus;
use contracts::shared::pagination::{MemberListRequest, Page};
use serde_json::json;

use crate::domain::{a001_member, a003_membership};
use crate::shared::error::{parse_id, AppError, AppJson, AppQuery, AppResult};
use crate::shared::state::AppState;

/// GET /api/members
pub async fn list(
    State(state): State<AppState>,
    AppQuery(req): AppQuery<MemberListRequest>,
) -> AppResult<Json<Page<MemberListItem>>> {
    let status = match req.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(code) => Some(
            MemberStatus::from_code(code)
                .ok_or_else(|| AppError::validation(format!("Неизвестный статус: {}", code)))?,
        ),
    };
    let search = req
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let limit = state.config.members.resolve_limit(req.limit);
    let page = req.page.unwrap_or(1);

    let result =
        a001_member::service::list_paginated(&state.db, search, status, page, limit, Utc::now())
            .await?;
    Ok(Json(result))
}

/// POST /api/members
pub async fn create(
    State(state): State<AppState>,
    AppJson(dto): AppJson<MemberDto>,
) -> AppResult<(StatusCode, Json<MemberCreated>)> {
    let created = a001_member::service::create(&state.db, dto, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/members/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MemberDetail>> {
    let id: MemberId = parse_id(&id)?;
    let detail = a001_member::service::get_detail(&state.db, id, Utc::now()).await?;
    Ok(Json(detail))
}

/// PATCH /api/members/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<MemberUpdateDto>,
) -> AppResult<Json<Member>> {
    let id: MemberId = parse_id(&id)?;
    let member = a001_member::service::update(&state.db, id, dto, Utc::now()).await?;
    Ok(Json(member))
}

/// DELETE /api/members/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id: MemberId = parse_id(&id)?;
    a001_member::service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/members/:id (продление)
pub async fn renew(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<RenewMembershipDto>,
) -> AppResult<(StatusCode, Json<MembershipWithType>)> {
    let member_id: MemberId = parse_id(&id)?;
    let type_id: MembershipTypeId = parse_id(&dto.membership_type_id)?;
    let membership =
        a003_membership::renewal::renew(&state.db, member_id, type_id, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

/// GET /api/members/:id/memberships
pub async fn list_memberships(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<MembershipWithType>>> {
    let id: MemberId = parse_id(&id)?;
    let history = a001_member::service::list_memberships(&state.db, id).await?;
    Ok(Json(history))
}

/// POST /api/members/testdata
pub async fn insert_test_data(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    let inserted = a001_member::service::insert_test_data(&state.db, Utc::now()).await?;
    Ok(Json(json!({ "inserted": inserted })))
}
