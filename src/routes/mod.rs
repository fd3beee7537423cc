pub mod auth;
pub mod catalog;
pub mod film;
pub mod media;
pub mod profile;
pub mod rating;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;

use crate::{AppState, models::Envelope};

/// Wraps a payload in the uniform `{ status, message, data }` envelope.
pub fn reply<T: Serialize>(status: StatusCode, message: impl Into<String>, data: T) -> Response {
    (status, Json(Envelope { status: status.as_u16(), message: message.into(), data }))
        .into_response()
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/login", post(auth::login))
        .route("/api/v1/logout", post(auth::logout))
        .route("/api/v1/register", post(auth::register))
        .nest("/api/actor", catalog::actor::router())
        .nest("/api/director", catalog::director::router())
        .nest("/api/genre", catalog::genre::router())
        .nest("/api/country", catalog::country::router())
        .nest("/api/language", catalog::language::router())
        .route("/api/film", get(film::list).post(film::create))
        .route("/api/film/{id}", get(film::retrieve).put(film::update).delete(film::remove))
        .route("/api/rating", get(rating::list).post(rating::create))
        .route("/api/rating/{id}", get(rating::retrieve).put(rating::update).delete(rating::remove))
        .route("/api/profile/{user_id}", get(profile::retrieve).put(profile::update))
        .route("/api/media", post(media::upload))
}
