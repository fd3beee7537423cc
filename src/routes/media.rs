use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, AppResult},
    routes::reply,
};

/// Accepts a multipart upload with a `file` part and an optional
/// `category` part, and responds with the stored reference path.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut category = String::from("film_images");
    let mut file: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("malformed multipart body".to_string()))?
    {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("category") => {
                category = field
                    .text()
                    .await
                    .map_err(|_| ApiError::Validation("malformed category field".to_string()))?;
            }
            Some("file") => {
                let file_name = field.file_name().map(str::to_owned);
                let data = field.bytes().await.map_err(|_| {
                    ApiError::Validation("failed to read the uploaded file".to_string())
                })?;
                file = Some((file_name, data.to_vec()));
            }
            _ => {}
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| ApiError::Validation("file field is required".to_string()))?;
    let path = state.media.save(&category, file_name.as_deref(), &data).await?;

    Ok(reply(StatusCode::CREATED, "file uploaded successfully", serde_json::json!({ "path": path })))
}
