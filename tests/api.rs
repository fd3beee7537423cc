use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::{Value, json};
use tower::ServiceExt;

use bioskop::{
    AppState,
    config::Config,
    db,
    entities::{rating, user},
    media::MediaStore,
    routes,
    store::Store,
};

async fn test_app() -> (Router, Arc<AppState>) {
    let db = db::connect_and_migrate("sqlite::memory:").await.expect("in-memory database");
    let config = Arc::new(Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
        media_root: std::env::temp_dir().join(format!("bioskop-api-{}", uuid::Uuid::new_v4())),
    });
    let media = MediaStore::new(config.media_root.clone());
    let state = Arc::new(AppState { config, store: Store::new(db), media });
    (routes::router().with_state(state.clone()), state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Token {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register_and_login(app: &Router, username: &str, is_author: bool) -> (i32, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password1": "sup3r-secret",
            "password2": "sup3r-secret",
            "first_name": "Test",
            "last_name": "User",
            "is_author": is_author,
            "is_visitor": !is_author,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let user_id = body["data"]["id"].as_i64().unwrap() as i32;

    let (status, body) = send(
        app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({ "username": username, "password": "sup3r-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    (user_id, body["data"]["token"].as_str().unwrap().to_string())
}

async fn create_named(app: &Router, token: &str, path: &str, name: &str) -> i32 {
    let (status, body) = send(app, "POST", path, Some(token), Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED, "create {path} failed: {body}");
    body["data"]["id"].as_i64().unwrap() as i32
}

/// Seeds one row in each lookup catalog and creates a film wired to them.
async fn seed_film(app: &Router, token: &str) -> i32 {
    let actor = create_named(app, token, "/api/actor", "Cut Mini Theo").await;
    let director = create_named(app, token, "/api/director", "Riri Riza").await;
    let genre = create_named(app, token, "/api/genre", "Drama").await;
    let country = create_named(app, token, "/api/country", "Indonesia").await;
    let language = create_named(app, token, "/api/language", "Indonesian").await;

    let (status, body) = send(
        app,
        "POST",
        "/api/film",
        Some(token),
        Some(json!({
            "title": "Laskar Pelangi",
            "year": 2008,
            "duration": 124,
            "description": "Ten students keep their underfunded school alive.",
            "actor": [actor],
            "director": [director],
            "genre": [genre],
            "country": [country],
            "language": [language],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create film failed: {body}");
    body["data"]["id"].as_i64().unwrap() as i32
}

#[tokio::test]
async fn catalog_create_and_retrieve_round_trip() {
    let (app, _) = test_app().await;
    let (_, token) = register_and_login(&app, "arief", true).await;

    let id = create_named(&app, &token, "/api/genre", "Comedy").await;
    let (status, body) = send(&app, "GET", &format!("/api/genre/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "genre retrieved successfully");
    assert_eq!(body["data"]["name"], "Comedy");
}

#[tokio::test]
async fn missing_catalog_row_is_a_not_found_envelope() {
    let (app, _) = test_app().await;
    let (_, token) = register_and_login(&app, "arief", true).await;

    let (status, body) = send(&app, "DELETE", "/api/actor/999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["message"], "actor does not exist");
    assert_eq!(body["data"], json!({}));
}

#[tokio::test]
async fn writes_without_a_token_are_rejected() {
    let (app, _) = test_app().await;

    for (method, uri) in [
        ("POST", "/api/actor"),
        ("POST", "/api/film"),
        ("POST", "/api/rating"),
        ("POST", "/api/media"),
    ] {
        let (status, body) = send(&app, method, uri, None, Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["message"], "authentication credentials were not provided");
    }
}

#[tokio::test]
async fn blank_catalog_name_is_rejected() {
    let (app, _) = test_app().await;
    let (_, token) = register_and_login(&app, "arief", true).await;

    let (status, body) =
        send(&app, "POST", "/api/country", Some(&token), Some(json!({ "name": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "name must not be empty");
}

#[tokio::test]
async fn film_requires_every_relation_list() {
    let (app, _) = test_app().await;
    let (_, token) = register_and_login(&app, "arief", true).await;

    let director = create_named(&app, &token, "/api/director", "Riri Riza").await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/film",
        Some(&token),
        Some(json!({
            "title": "Laskar Pelangi",
            "year": 2008,
            "duration": 124,
            "description": "Ten students keep their underfunded school alive.",
            "director": [director],
            "actor": [],
            "genre": [1],
            "country": [1],
            "language": [1],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "at least one actor is required");
}

#[tokio::test]
async fn film_rejects_unknown_relation_ids() {
    let (app, _) = test_app().await;
    let (_, token) = register_and_login(&app, "arief", true).await;
    let film = seed_film(&app, &token).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/film/{film}"),
        Some(&token),
        Some(json!({ "genre": [999] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "one or more genre ids do not exist");
}

#[tokio::test]
async fn film_average_rating_starts_null_then_rounds_to_one_decimal() {
    let (app, _) = test_app().await;
    let (author_id, token) = register_and_login(&app, "arief", true).await;
    let (visitor_id, _) = register_and_login(&app, "sinta", false).await;
    let film = seed_film(&app, &token).await;

    let (status, body) = send(&app, "GET", &format!("/api/film/{film}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["average_rating"], Value::Null);
    assert_eq!(body["data"]["actor"], json!(["Cut Mini Theo"]));

    for (user, value) in [(author_id, 7.0), (visitor_id, 8.5)] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/rating",
            Some(&token),
            Some(json!({ "user": user, "film": film, "value": value })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "rating failed: {body}");
    }

    // 7.0 and 8.5 average to 7.75; one decimal place, ties to even.
    let (status, body) = send(&app, "GET", &format!("/api/film/{film}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["average_rating"], json!(7.8));
}

#[tokio::test]
async fn second_rating_for_the_same_pair_is_a_duplicate() {
    let (app, state) = test_app().await;
    let (user_id, token) = register_and_login(&app, "arief", true).await;
    let film = seed_film(&app, &token).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/rating",
        Some(&token),
        Some(json!({ "user": user_id, "film": film, "value": 7.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/rating",
        Some(&token),
        Some(json!({ "user": user_id, "film": film, "value": 9.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "rating with this user and film already exists");

    // The first record is untouched.
    let rows = rating::Entity::find()
        .filter(rating::Column::UserId.eq(user_id))
        .all(state.store.db())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!((rows[0].value - 7.0).abs() < 1e-9);
}

#[tokio::test]
async fn rating_update_cannot_move_onto_an_existing_pair() {
    let (app, _) = test_app().await;
    let (author_id, token) = register_and_login(&app, "arief", true).await;
    let (visitor_id, _) = register_and_login(&app, "sinta", false).await;
    let film = seed_film(&app, &token).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/rating",
        Some(&token),
        Some(json!({ "user": author_id, "film": film, "value": 7.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/rating",
        Some(&token),
        Some(json!({ "user": visitor_id, "film": film, "value": 6.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let second = body["data"]["id"].as_i64().unwrap();

    // Re-pointing the second rating at the first user's pair must fail.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/rating/{second}"),
        Some(&token),
        Some(json!({ "user": author_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "rating with this user and film already exists");

    // A value-only update of the same row is not a duplicate of itself.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/rating/{second}"),
        Some(&token),
        Some(json!({ "value": 9.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "value-only update failed: {body}");
    assert_eq!(body["data"]["user_id"], visitor_id);
    assert_eq!(body["data"]["value"], json!(9.5));
}

#[tokio::test]
async fn rating_value_outside_the_scale_is_rejected() {
    let (app, _) = test_app().await;
    let (user_id, token) = register_and_login(&app, "arief", true).await;
    let film = seed_film(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/rating",
        Some(&token),
        Some(json!({ "user": user_id, "film": film, "value": 10.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "rating must be between 0.0 and 10.0");
}

#[tokio::test]
async fn film_thumbnail_clears_on_empty_string() {
    let (app, _) = test_app().await;
    let (_, token) = register_and_login(&app, "arief", true).await;
    let film = seed_film(&app, &token).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/film/{film}"),
        Some(&token),
        Some(json!({ "thumbnail": "film_images/poster.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["thumbnail"], "film_images/poster.png");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/film/{film}"),
        Some(&token),
        Some(json!({ "thumbnail": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["thumbnail"], Value::Null);
}

#[tokio::test]
async fn register_rejects_claiming_both_roles() {
    let (app, _) = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({
            "username": "arief",
            "email": "arief@example.com",
            "password1": "sup3r-secret",
            "password2": "sup3r-secret",
            "first_name": "Arief",
            "last_name": "Pratama",
            "is_author": true,
            "is_visitor": true,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "author and visitor cannot be selected at the same time");
}

#[tokio::test]
async fn register_rejects_mismatched_passwords_and_taken_usernames() {
    let (app, _) = test_app().await;
    register_and_login(&app, "arief", true).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({
            "username": "budi",
            "email": "budi@example.com",
            "password1": "sup3r-secret",
            "password2": "different",
            "first_name": "Budi",
            "last_name": "Santoso",
            "is_visitor": true,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "password fields did not match");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({
            "username": "arief",
            "email": "other@example.com",
            "password1": "sup3r-secret",
            "password2": "sup3r-secret",
            "first_name": "Arief",
            "last_name": "Lain",
            "is_visitor": true,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "username is already taken");
}

#[tokio::test]
async fn deactivated_user_cannot_log_in() {
    let (app, state) = test_app().await;
    let (user_id, _) = register_and_login(&app, "arief", true).await;

    let row = user::Entity::find_by_id(user_id).one(state.store.db()).await.unwrap().unwrap();
    let mut active: user::ActiveModel = row.into();
    active.is_active = Set(false);
    active.update(state.store.db()).await.unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({ "username": "arief", "password": "sup3r-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "user is deactivated");
}

#[tokio::test]
async fn account_with_no_role_cannot_log_in() {
    let (app, _) = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({
            "username": "nomad",
            "email": "nomad@example.com",
            "password1": "sup3r-secret",
            "password2": "sup3r-secret",
            "first_name": "No",
            "last_name": "Role",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({ "username": "nomad", "password": "sup3r-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "user has no role assigned");
}

#[tokio::test]
async fn wrong_password_does_not_reveal_which_field_was_bad() {
    let (app, _) = test_app().await;
    register_and_login(&app, "arief", true).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({ "username": "arief", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "unable to log in with the given credentials");
}

#[tokio::test]
async fn logout_revokes_the_token_and_login_mints_a_new_one() {
    let (app, _) = test_app().await;
    let (_, token) = register_and_login(&app, "arief", true).await;

    let (status, _) = send(&app, "POST", "/api/v1/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        send(&app, "POST", "/api/actor", Some(&token), Some(json!({ "name": "X" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({ "username": "arief", "password": "sup3r-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["data"]["token"].as_str().unwrap(), token);
}

#[tokio::test]
async fn repeated_login_reuses_the_existing_token() {
    let (app, _) = test_app().await;
    let (_, token) = register_and_login(&app, "arief", true).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({ "username": "arief", "password": "sup3r-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token"].as_str().unwrap(), token);
    assert_eq!(body["message"], "you are logged in as author");
}

#[tokio::test]
async fn registration_creates_a_profile_that_can_be_updated() {
    let (app, _) = test_app().await;
    let (user_id, token) = register_and_login(&app, "arief", true).await;

    let (status, body) =
        send(&app, "GET", &format!("/api/profile/{user_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], user_id);
    assert_eq!(body["data"]["bio"], Value::Null);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/profile/{user_id}"),
        Some(&token),
        Some(json!({ "bio": "Film enthusiast.", "birth": "1995-04-12" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "profile update failed: {body}");
    assert_eq!(body["data"]["bio"], "Film enthusiast.");
    assert_eq!(body["data"]["birth"], "1995-04-12");
}

#[tokio::test]
async fn deleting_a_film_removes_its_ratings() {
    let (app, state) = test_app().await;
    let (user_id, token) = register_and_login(&app, "arief", true).await;
    let film = seed_film(&app, &token).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/rating",
        Some(&token),
        Some(json!({ "user": user_id, "film": film, "value": 6.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "DELETE", &format!("/api/film/{film}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let leftover =
        rating::Entity::find().all(state.store.db()).await.unwrap();
    assert!(leftover.is_empty());

    let (status, _) = send(&app, "GET", &format!("/api/film/{film}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
