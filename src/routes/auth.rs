use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::Response};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    AppState,
    auth::{AuthUser, verify_password},
    entities::{profile, user},
    error::{ApiError, AppResult},
    models::{LoginData, LoginPayload, RegisterPayload, UserOut},
    routes::reply,
};

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<Response> {
    let (username, password) =
        match (payload.username.as_deref(), payload.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
            _ => {
                return Err(ApiError::Authentication(
                    "must provide both username and password".to_string(),
                ));
            }
        };

    let Some(user) = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(state.store.db())
        .await?
    else {
        return Err(ApiError::Authentication(
            "unable to log in with the given credentials".to_string(),
        ));
    };

    if !verify_password(password, &user.password) {
        return Err(ApiError::Authentication(
            "unable to log in with the given credentials".to_string(),
        ));
    }
    if !user.is_active {
        return Err(ApiError::Authentication("user is deactivated".to_string()));
    }
    if !user.is_author && !user.is_visitor {
        return Err(ApiError::Authentication("user has no role assigned".to_string()));
    }

    let token = state.store.token_for_user(user.id).await?;
    let prof = profile::Entity::find()
        .filter(profile::Column::UserId.eq(user.id))
        .one(state.store.db())
        .await?;

    let message =
        if user.is_author { "you are logged in as author" } else { "you are logged in as visitor" };

    let data = LoginData {
        token,
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        is_active: user.is_active,
        is_author: user.is_author,
        is_visitor: user.is_visitor,
        birth: prof.as_ref().and_then(|p| p.birth),
        avatar: prof.as_ref().and_then(|p| p.avatar.clone()),
        bio: prof.as_ref().and_then(|p| p.bio.clone()),
    };
    Ok(reply(StatusCode::OK, message, data))
}

pub async fn logout(State(state): State<Arc<AppState>>, auth: AuthUser) -> AppResult<Response> {
    state.store.revoke_token(&auth.token).await?;
    Ok(reply(StatusCode::OK, "you have been logged out", serde_json::json!({})))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<Response> {
    let created = state.store.register(payload).await?;
    Ok(reply(
        StatusCode::CREATED,
        "your account has been registered",
        UserOut::from(created),
    ))
}
