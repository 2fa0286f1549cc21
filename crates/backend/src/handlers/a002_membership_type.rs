use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use contracts::domain::a002_membership_type::aggregate::{
    MembershipType, MembershipTypeDto, MembershipTypeId, MembershipTypeListRequest,
    MembershipTypeUpdateDto,
};

use crate::domain::a002_membership_type;
use crate::shared::error::{parse_id, AppJson, AppQuery, AppResult};
use crate::shared::state::AppState;

/// GET /api/membership-types
pub async fn list(
    State(state): State<AppState>,
    AppQuery(req): AppQuery<MembershipTypeListRequest>,
) -> AppResult<Json<Vec<MembershipType>>> {
    let items = a002_membership_type::service::list(&state.db, req.include_inactive).await?;
    Ok(Json(items))
}

/// POST /api/membership-types
pub async fn create(
    State(state): State<AppState>,
    AppJson(dto): AppJson<MembershipTypeDto>,
) -> AppResult<(StatusCode, Json<MembershipType>)> {
    let created = a002_membership_type::service::create(&state.db, dto, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/membership-types/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<MembershipTypeUpdateDto>,
) -> AppResult<Json<MembershipType>> {
    let id: MembershipTypeId = parse_id(&id)?;
    let updated = a002_membership_type::service::update(&state.db, id, dto, Utc::now()).await?;
    Ok(Json(updated))
}

/// DELETE /api/membership-types/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id: MembershipTypeId = parse_id(&id)?;
    a002_membership_type::service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
