use sea_orm::prelude::{Date, DateTimeUtc};
use serde::{Deserialize, Serialize};

use crate::{
    entities::{film::FilmStatus, profile::ProfileStatus, user},
    error::{ApiError, AppResult},
};

/// The uniform response wrapper: `{ status, message, data }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub message: String,
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct CatalogPayload {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilmPayload {
    pub title: Option<String>,
    /// Media reference path; an empty string clears it on update.
    pub thumbnail: Option<String>,
    pub status: Option<FilmStatus>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub director: Option<Vec<i32>>,
    pub actor: Option<Vec<i32>>,
    pub genre: Option<Vec<i32>>,
    pub country: Option<Vec<i32>>,
    pub language: Option<Vec<i32>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RatingPayload {
    pub user: Option<i32>,
    pub film: Option<i32>,
    pub value: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password1: Option<String>,
    pub password2: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_author: bool,
    #[serde(default)]
    pub is_visitor: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfilePayload {
    pub birth: Option<Date>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub status: Option<ProfileStatus>,
}

/// A user as exposed over the API; password fields never leave the server.
#[derive(Debug, Serialize)]
pub struct UserOut {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_author: bool,
    pub is_visitor: bool,
}

impl From<user::Model> for UserOut {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_active: user.is_active,
            is_author: user.is_author,
            is_visitor: user.is_visitor,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_author: bool,
    pub is_visitor: bool,
    pub birth: Option<Date>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

/// A film with its relations resolved to display names.
#[derive(Debug, Serialize)]
pub struct FilmOut {
    pub id: i32,
    pub title: String,
    pub thumbnail: Option<String>,
    pub status: FilmStatus,
    pub year: i32,
    pub description: String,
    pub duration: i32,
    pub director: Vec<String>,
    pub actor: Vec<String>,
    pub genre: Vec<String>,
    pub country: Vec<String>,
    pub language: Vec<String>,
    pub average_rating: Option<f64>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_on: DateTimeUtc,
    pub last_modified: DateTimeUtc,
}

/// Round to one decimal place, ties to even. 7.0 and 8.5 average to 7.75,
/// which rounds to 7.8.
pub fn round_half_even_1dp(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

pub fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_string()));
    }
    if name.chars().count() > 255 {
        return Err(ApiError::Validation("name must be at most 255 characters".to_string()));
    }
    Ok(name.to_string())
}

/// Accepts 0.0 through 10.0 with at most one decimal place and returns the
/// value normalized to that precision.
pub fn validate_rating_value(value: f64) -> AppResult<f64> {
    if !(0.0..=10.0).contains(&value) {
        return Err(ApiError::Validation("rating must be between 0.0 and 10.0".to_string()));
    }
    let scaled = value * 10.0;
    if (scaled - scaled.round()).abs() > 1e-6 {
        return Err(ApiError::Validation(
            "rating must have at most one decimal place".to_string(),
        ));
    }
    Ok(scaled.round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_ties_to_even() {
        assert!((round_half_even_1dp((7.0 + 8.5) / 2.0) - 7.8).abs() < 1e-9);
        assert!((round_half_even_1dp(7.25) - 7.2).abs() < 1e-9);
        assert!((round_half_even_1dp(7.749) - 7.7).abs() < 1e-9);
        assert!((round_half_even_1dp(9.0) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn rating_values_are_range_checked() {
        assert!(validate_rating_value(-0.1).is_err());
        assert!(validate_rating_value(10.1).is_err());
        assert!((validate_rating_value(0.0).unwrap()).abs() < 1e-9);
        assert!((validate_rating_value(10.0).unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn rating_values_are_precision_checked() {
        assert!(validate_rating_value(7.33).is_err());
        assert!((validate_rating_value(7.3).unwrap() - 7.3).abs() < 1e-9);
    }

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(validate_name("  Tom Hanks ").unwrap(), "Tom Hanks");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(256)).is_err());
    }
}
