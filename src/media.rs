use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::error::{ApiError, AppResult};

/// Uploads above this size are rejected before anything touches disk.
pub const MAX_UPLOAD_BYTES: usize = 1_048_576;

const CATEGORIES: &[&str] = &["film_images", "profile_images"];

/// Local-disk media storage. Accepts an upload, writes it under
/// `<root>/<category>/` and hands back the reference path that films and
/// profiles store in their thumbnail/avatar columns.
#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn save(
        &self,
        category: &str,
        original_name: Option<&str>,
        data: &[u8],
    ) -> AppResult<String> {
        if !CATEGORIES.contains(&category) {
            return Err(ApiError::Validation(format!("unknown media category '{category}'")));
        }
        if data.is_empty() {
            return Err(ApiError::Validation("uploaded file is empty".to_string()));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::Validation(
                "image file is too large, the maximum size is 1 MiB".to_string(),
            ));
        }

        let extension = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .unwrap_or("bin")
            .to_ascii_lowercase();
        let file_name = format!("{}.{extension}", Uuid::new_v4().simple());

        let dir = self.root.join(category);
        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(&file_name), data).await?;

        Ok(format!("{category}/{file_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> MediaStore {
        MediaStore::new(std::env::temp_dir().join("bioskop-media-tests"))
    }

    #[tokio::test]
    async fn rejects_oversized_upload() {
        let data = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let err = test_store().save("film_images", Some("big.png"), &data).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_unknown_category() {
        let err = test_store().save("../escape", Some("a.png"), &[1, 2, 3]).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn saves_within_limit_and_returns_reference() {
        let store = test_store();
        let path = store.save("film_images", Some("poster.PNG"), &[1, 2, 3]).await.unwrap();
        assert!(path.starts_with("film_images/"));
        assert!(path.ends_with(".png"));
    }
}
