use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::{AppState, entities::user, error::ApiError};

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ApiError::Internal(format!("password hashing failed: {err}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}

/// Opaque token key, 32 hex characters.
pub fn new_token_key() -> String {
    Uuid::new_v4().simple().to_string()
}

/// The authenticated caller, resolved from an `Authorization: Token <key>`
/// header. Taking this as a handler argument is what gates write access.
pub struct AuthUser {
    pub user: user::Model,
    pub token: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError::Authentication(
                    "authentication credentials were not provided".to_string(),
                )
            })?;

        let key = header.strip_prefix("Token ").ok_or_else(|| {
            ApiError::Authentication("invalid authorization header".to_string())
        })?;

        let user = state
            .store
            .user_for_token(key)
            .await?
            .ok_or_else(|| ApiError::Authentication("invalid token".to_string()))?;

        if !user.is_active {
            return Err(ApiError::Authentication("user is deactivated".to_string()));
        }

        Ok(AuthUser { user, token: key.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn token_keys_are_unique_and_opaque() {
        let a = new_token_key();
        let b = new_token_key();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }
}
