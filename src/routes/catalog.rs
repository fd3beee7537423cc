//! CRUD handlers for the five catalog lookup resources. The handler sets
//! are identical apart from the entity, so a macro stamps one module out
//! per resource.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set};

use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, AppResult},
    models::{CatalogPayload, validate_name},
    routes::reply,
};

macro_rules! catalog_resource {
    ($module:ident, $label:literal) => {
        pub mod $module {
            use super::*;
            use crate::entities::$module::{ActiveModel, Entity};

            pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Response> {
                let rows = Entity::find().all(state.store.db()).await?;
                Ok(reply(StatusCode::OK, concat!("retrieved all ", $label, " data"), rows))
            }

            pub async fn create(
                State(state): State<Arc<AppState>>,
                _user: AuthUser,
                Json(payload): Json<CatalogPayload>,
            ) -> AppResult<Response> {
                let name = validate_name(payload.name.as_deref().unwrap_or(""))?;
                let row = ActiveModel { name: Set(name), ..Default::default() }
                    .insert(state.store.db())
                    .await?;
                Ok(reply(StatusCode::CREATED, concat!($label, " created successfully"), row))
            }

            pub async fn retrieve(
                State(state): State<Arc<AppState>>,
                Path(id): Path<i32>,
            ) -> AppResult<Response> {
                let row = Entity::find_by_id(id)
                    .one(state.store.db())
                    .await?
                    .ok_or_else(|| ApiError::NotFound($label.to_string()))?;
                Ok(reply(StatusCode::OK, concat!($label, " retrieved successfully"), row))
            }

            pub async fn update(
                State(state): State<Arc<AppState>>,
                _user: AuthUser,
                Path(id): Path<i32>,
                Json(payload): Json<CatalogPayload>,
            ) -> AppResult<Response> {
                let row = Entity::find_by_id(id)
                    .one(state.store.db())
                    .await?
                    .ok_or_else(|| ApiError::NotFound($label.to_string()))?;

                let Some(name) = payload.name.as_deref() else {
                    return Ok(reply(
                        StatusCode::OK,
                        concat!($label, " updated successfully"),
                        row,
                    ));
                };

                let mut active: ActiveModel = row.into();
                active.name = Set(validate_name(name)?);
                let row = active.update(state.store.db()).await?;
                Ok(reply(StatusCode::OK, concat!($label, " updated successfully"), row))
            }

            pub async fn remove(
                State(state): State<Arc<AppState>>,
                _user: AuthUser,
                Path(id): Path<i32>,
            ) -> AppResult<Response> {
                let row = Entity::find_by_id(id)
                    .one(state.store.db())
                    .await?
                    .ok_or_else(|| ApiError::NotFound($label.to_string()))?;
                row.delete(state.store.db()).await?;
                Ok(reply(
                    StatusCode::OK,
                    concat!($label, " deleted successfully"),
                    serde_json::json!({}),
                ))
            }

            pub fn router() -> Router<Arc<AppState>> {
                Router::new()
                    .route("/", get(list).post(create))
                    .route("/{id}", get(retrieve).put(update).delete(remove))
            }
        }
    };
}

catalog_resource!(actor, "actor");
catalog_resource!(director, "director");
catalog_resource!(genre, "genre");
catalog_resource!(country, "country");
catalog_resource!(language, "language");
