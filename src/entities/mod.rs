pub mod actor;
pub mod auth_token;
pub mod country;
pub mod director;
pub mod film;
pub mod film_actor;
pub mod film_country;
pub mod film_director;
pub mod film_genre;
pub mod film_language;
pub mod genre;
pub mod language;
pub mod profile;
pub mod rating;
pub mod user;
