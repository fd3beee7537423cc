use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::{
    AppState,
    auth::AuthUser,
    entities::profile,
    error::{ApiError, AppResult},
    models::ProfilePayload,
    routes::reply,
};

pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> AppResult<Response> {
    let row = profile::Entity::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(state.store.db())
        .await?
        .ok_or_else(|| ApiError::NotFound("profile".to_string()))?;
    Ok(reply(StatusCode::OK, "profile retrieved successfully", row))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(user_id): Path<i32>,
    Json(payload): Json<ProfilePayload>,
) -> AppResult<Response> {
    let row = profile::Entity::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(state.store.db())
        .await?
        .ok_or_else(|| ApiError::NotFound("profile".to_string()))?;

    let mut active: profile::ActiveModel = row.into();
    if let Some(birth) = payload.birth {
        active.birth = Set(Some(birth));
    }
    if let Some(avatar) = payload.avatar {
        active.avatar = Set(Some(avatar));
    }
    if let Some(bio) = payload.bio {
        active.bio = Set(Some(bio));
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    active.updated_by = Set(Some(user.user.id));
    active.last_modified = Set(Utc::now());

    let row = active.update(state.store.db()).await?;
    Ok(reply(StatusCode::OK, "profile updated successfully", row))
}
