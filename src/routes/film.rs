use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    AppState, auth::AuthUser, error::AppResult, models::FilmPayload, routes::reply,
};

pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let films = state.store.list_films().await?;
    Ok(reply(StatusCode::OK, "retrieved all film data", films))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<FilmPayload>,
) -> AppResult<Response> {
    let film = state.store.create_film(payload, user.user.id).await?;
    let out = state.store.film_out(film).await?;
    Ok(reply(StatusCode::CREATED, "film created successfully", out))
}

pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let film = state.store.find_film(id).await?;
    let out = state.store.film_out(film).await?;
    Ok(reply(StatusCode::OK, "film retrieved successfully", out))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<FilmPayload>,
) -> AppResult<Response> {
    let film = state.store.update_film(id, payload, user.user.id).await?;
    let out = state.store.film_out(film).await?;
    Ok(reply(StatusCode::OK, "film updated successfully", out))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    state.store.delete_film(id).await?;
    Ok(reply(StatusCode::OK, "film deleted successfully", serde_json::json!({})))
}
