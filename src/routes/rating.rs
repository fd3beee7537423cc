use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use sea_orm::{EntityTrait, ModelTrait};

use crate::{
    AppState,
    auth::AuthUser,
    entities::rating,
    error::{ApiError, AppResult},
    models::RatingPayload,
    routes::reply,
};

pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let rows = rating::Entity::find().all(state.store.db()).await?;
    Ok(reply(StatusCode::OK, "retrieved all rating data", rows))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<RatingPayload>,
) -> AppResult<Response> {
    let row = state.store.create_rating(payload, user.user.id).await?;
    Ok(reply(StatusCode::CREATED, "rating created successfully", row))
}

pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let row = rating::Entity::find_by_id(id)
        .one(state.store.db())
        .await?
        .ok_or_else(|| ApiError::NotFound("rating".to_string()))?;
    Ok(reply(StatusCode::OK, "rating retrieved successfully", row))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<RatingPayload>,
) -> AppResult<Response> {
    let row = state.store.update_rating(id, payload, user.user.id).await?;
    Ok(reply(StatusCode::OK, "rating updated successfully", row))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let row = rating::Entity::find_by_id(id)
        .one(state.store.db())
        .await?
        .ok_or_else(|| ApiError::NotFound("rating".to_string()))?;
    row.delete(state.store.db()).await?;
    Ok(reply(StatusCode::OK, "rating deleted successfully", serde_json::json!({})))
}
