use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};

use crate::{
    auth,
    entities::{
        actor, auth_token, country, director, film, film_actor, film_country, film_director,
        film_genre, film_language, genre, language, profile, rating, user,
    },
    error::{ApiError, AppResult},
    models::{FilmOut, FilmPayload, RatingPayload, RegisterPayload, round_half_even_1dp,
        validate_rating_value},
};

/// Checks that every id in the list refers to an existing catalog row and
/// that the list is not empty; yields the deduplicated id set.
macro_rules! ensure_ids {
    ($conn:expr, $entity:ident, $ids:expr, $label:literal) => {{
        let ids: BTreeSet<i32> = $ids.iter().copied().collect();
        if ids.is_empty() {
            return Err(ApiError::Validation(
                concat!("at least one ", $label, " is required").to_string(),
            ));
        }
        let found = $entity::Entity::find()
            .filter($entity::Column::Id.is_in(ids.clone()))
            .count($conn)
            .await?;
        if found != ids.len() as u64 {
            return Err(ApiError::Validation(
                concat!("one or more ", $label, " ids do not exist").to_string(),
            ));
        }
        ids
    }};
}

/// Replaces a film's rows in one join table with a fresh id set.
macro_rules! replace_links {
    ($conn:expr, $join:ident, $fk:ident, $film_id:expr, $ids:expr) => {{
        $join::Entity::delete_many()
            .filter($join::Column::FilmId.eq($film_id))
            .exec($conn)
            .await?;
        let rows = $ids.iter().map(|id| $join::ActiveModel {
            film_id: Set($film_id),
            $fk: Set(*id),
        });
        $join::Entity::insert_many(rows).exec($conn).await?;
    }};
}

#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
}

impl Store {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn create_film(&self, payload: FilmPayload, by: i32) -> AppResult<film::Model> {
        let title = validate_title(payload.title.as_deref().unwrap_or(""))?;
        let year = validate_year(
            payload.year.ok_or_else(|| ApiError::Validation("year is required".to_string()))?,
        )?;
        let duration = validate_duration(payload.duration.ok_or_else(|| {
            ApiError::Validation("duration is required".to_string())
        })?)?;
        let description = payload
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ApiError::Validation("description is required".to_string()))?
            .to_string();

        let txn = self.db.begin().await?;

        let directors =
            ensure_ids!(&txn, director, payload.director.as_deref().unwrap_or(&[]), "director");
        let actors = ensure_ids!(&txn, actor, payload.actor.as_deref().unwrap_or(&[]), "actor");
        let genres = ensure_ids!(&txn, genre, payload.genre.as_deref().unwrap_or(&[]), "genre");
        let countries =
            ensure_ids!(&txn, country, payload.country.as_deref().unwrap_or(&[]), "country");
        let languages =
            ensure_ids!(&txn, language, payload.language.as_deref().unwrap_or(&[]), "language");

        let now = Utc::now();
        let created = film::ActiveModel {
            title: Set(title),
            thumbnail: Set(payload.thumbnail.clone().filter(|t| !t.is_empty())),
            status: Set(payload.status.unwrap_or(film::FilmStatus::Released)),
            year: Set(year),
            description: Set(description),
            duration: Set(duration),
            created_by: Set(Some(by)),
            updated_by: Set(None),
            created_on: Set(now),
            last_modified: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        replace_links!(&txn, film_director, director_id, created.id, directors);
        replace_links!(&txn, film_actor, actor_id, created.id, actors);
        replace_links!(&txn, film_genre, genre_id, created.id, genres);
        replace_links!(&txn, film_country, country_id, created.id, countries);
        replace_links!(&txn, film_language, language_id, created.id, languages);

        txn.commit().await?;
        Ok(created)
    }

    pub async fn update_film(
        &self,
        id: i32,
        payload: FilmPayload,
        by: i32,
    ) -> AppResult<film::Model> {
        let current = film::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("film".to_string()))?;

        let txn = self.db.begin().await?;

        let mut active: film::ActiveModel = current.into();
        if let Some(title) = payload.title.as_deref() {
            active.title = Set(validate_title(title)?);
        }
        if let Some(thumbnail) = payload.thumbnail.clone() {
            // An empty string clears the stored reference.
            active.thumbnail = Set(if thumbnail.is_empty() { None } else { Some(thumbnail) });
        }
        if let Some(status) = payload.status {
            active.status = Set(status);
        }
        if let Some(year) = payload.year {
            active.year = Set(validate_year(year)?);
        }
        if let Some(description) = payload.description.as_deref() {
            let description = description.trim();
            if description.is_empty() {
                return Err(ApiError::Validation("description must not be empty".to_string()));
            }
            active.description = Set(description.to_string());
        }
        if let Some(duration) = payload.duration {
            active.duration = Set(validate_duration(duration)?);
        }
        active.updated_by = Set(Some(by));
        active.last_modified = Set(Utc::now());
        let updated = active.update(&txn).await?;

        if let Some(ids) = payload.director.as_deref() {
            let ids = ensure_ids!(&txn, director, ids, "director");
            replace_links!(&txn, film_director, director_id, id, ids);
        }
        if let Some(ids) = payload.actor.as_deref() {
            let ids = ensure_ids!(&txn, actor, ids, "actor");
            replace_links!(&txn, film_actor, actor_id, id, ids);
        }
        if let Some(ids) = payload.genre.as_deref() {
            let ids = ensure_ids!(&txn, genre, ids, "genre");
            replace_links!(&txn, film_genre, genre_id, id, ids);
        }
        if let Some(ids) = payload.country.as_deref() {
            let ids = ensure_ids!(&txn, country, ids, "country");
            replace_links!(&txn, film_country, country_id, id, ids);
        }
        if let Some(ids) = payload.language.as_deref() {
            let ids = ensure_ids!(&txn, language, ids, "language");
            replace_links!(&txn, film_language, language_id, id, ids);
        }

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a film along with its join rows and ratings.
    pub async fn delete_film(&self, id: i32) -> AppResult<()> {
        if film::Entity::find_by_id(id).one(&self.db).await?.is_none() {
            return Err(ApiError::NotFound("film".to_string()));
        }

        let txn = self.db.begin().await?;
        rating::Entity::delete_many().filter(rating::Column::FilmId.eq(id)).exec(&txn).await?;
        film_director::Entity::delete_many()
            .filter(film_director::Column::FilmId.eq(id))
            .exec(&txn)
            .await?;
        film_actor::Entity::delete_many()
            .filter(film_actor::Column::FilmId.eq(id))
            .exec(&txn)
            .await?;
        film_genre::Entity::delete_many()
            .filter(film_genre::Column::FilmId.eq(id))
            .exec(&txn)
            .await?;
        film_country::Entity::delete_many()
            .filter(film_country::Column::FilmId.eq(id))
            .exec(&txn)
            .await?;
        film_language::Entity::delete_many()
            .filter(film_language::Column::FilmId.eq(id))
            .exec(&txn)
            .await?;
        film::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn find_film(&self, id: i32) -> AppResult<film::Model> {
        film::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("film".to_string()))
    }

    pub async fn list_films(&self) -> AppResult<Vec<FilmOut>> {
        let films = film::Entity::find().all(&self.db).await?;
        let ratings = rating::Entity::find().all(&self.db).await?;

        let mut sums: HashMap<i32, (f64, u32)> = HashMap::new();
        for r in &ratings {
            let entry = sums.entry(r.film_id).or_default();
            entry.0 += r.value;
            entry.1 += 1;
        }

        let mut out = Vec::with_capacity(films.len());
        for f in films {
            let average = sums.get(&f.id).map(|(sum, n)| round_half_even_1dp(sum / *n as f64));
            out.push(self.resolve_film(f, average).await?);
        }
        Ok(out)
    }

    pub async fn film_out(&self, f: film::Model) -> AppResult<FilmOut> {
        let values: Vec<f64> = rating::Entity::find()
            .filter(rating::Column::FilmId.eq(f.id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|r| r.value)
            .collect();
        let average = if values.is_empty() {
            None
        } else {
            Some(round_half_even_1dp(values.iter().sum::<f64>() / values.len() as f64))
        };
        self.resolve_film(f, average).await
    }

    async fn resolve_film(
        &self,
        f: film::Model,
        average_rating: Option<f64>,
    ) -> AppResult<FilmOut> {
        let director = f.find_related(director::Entity).all(&self.db).await?;
        let actor = f.find_related(actor::Entity).all(&self.db).await?;
        let genre = f.find_related(genre::Entity).all(&self.db).await?;
        let country = f.find_related(country::Entity).all(&self.db).await?;
        let language = f.find_related(language::Entity).all(&self.db).await?;

        Ok(FilmOut {
            id: f.id,
            title: f.title,
            thumbnail: f.thumbnail,
            status: f.status,
            year: f.year,
            description: f.description,
            duration: f.duration,
            director: director.into_iter().map(|m| m.name).collect(),
            actor: actor.into_iter().map(|m| m.name).collect(),
            genre: genre.into_iter().map(|m| m.name).collect(),
            country: country.into_iter().map(|m| m.name).collect(),
            language: language.into_iter().map(|m| m.name).collect(),
            average_rating,
            created_by: f.created_by,
            updated_by: f.updated_by,
            created_on: f.created_on,
            last_modified: f.last_modified,
        })
    }

    pub async fn create_rating(&self, payload: RatingPayload, by: i32) -> AppResult<rating::Model> {
        let user_id =
            payload.user.ok_or_else(|| ApiError::Validation("user is required".to_string()))?;
        let film_id =
            payload.film.ok_or_else(|| ApiError::Validation("film is required".to_string()))?;
        let value = validate_rating_value(
            payload.value.ok_or_else(|| ApiError::Validation("rating is required".to_string()))?,
        )?;

        if user::Entity::find_by_id(user_id).one(&self.db).await?.is_none() {
            return Err(ApiError::Validation("user does not exist".to_string()));
        }
        if film::Entity::find_by_id(film_id).one(&self.db).await?.is_none() {
            return Err(ApiError::Validation("film does not exist".to_string()));
        }
        if self.rating_pair_exists(user_id, film_id, None).await? {
            return Err(ApiError::Duplicate(
                "rating with this user and film already exists".to_string(),
            ));
        }

        let now = Utc::now();
        // A racing insert for the same pair trips the unique index; the
        // DbErr conversion turns that into a Duplicate, not a 500.
        let created = rating::ActiveModel {
            user_id: Set(user_id),
            film_id: Set(film_id),
            value: Set(value),
            created_by: Set(Some(by)),
            updated_by: Set(None),
            created_on: Set(now),
            last_modified: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(created)
    }

    pub async fn update_rating(
        &self,
        id: i32,
        payload: RatingPayload,
        by: i32,
    ) -> AppResult<rating::Model> {
        let current = rating::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("rating".to_string()))?;

        let user_id = payload.user.unwrap_or(current.user_id);
        let film_id = payload.film.unwrap_or(current.film_id);
        let value = match payload.value {
            Some(value) => validate_rating_value(value)?,
            None => current.value,
        };

        if user_id != current.user_id
            && user::Entity::find_by_id(user_id).one(&self.db).await?.is_none()
        {
            return Err(ApiError::Validation("user does not exist".to_string()));
        }
        if film_id != current.film_id
            && film::Entity::find_by_id(film_id).one(&self.db).await?.is_none()
        {
            return Err(ApiError::Validation("film does not exist".to_string()));
        }
        if (user_id, film_id) != (current.user_id, current.film_id)
            && self.rating_pair_exists(user_id, film_id, Some(id)).await?
        {
            return Err(ApiError::Duplicate(
                "rating with this user and film already exists".to_string(),
            ));
        }

        let mut active: rating::ActiveModel = current.into();
        active.user_id = Set(user_id);
        active.film_id = Set(film_id);
        active.value = Set(value);
        active.updated_by = Set(Some(by));
        active.last_modified = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    async fn rating_pair_exists(
        &self,
        user_id: i32,
        film_id: i32,
        exclude: Option<i32>,
    ) -> AppResult<bool> {
        let mut query = rating::Entity::find()
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::FilmId.eq(film_id));
        if let Some(id) = exclude {
            query = query.filter(rating::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    /// Creates the user and an empty profile in one transaction.
    pub async fn register(&self, payload: RegisterPayload) -> AppResult<user::Model> {
        let username = required_field(payload.username.as_deref(), "username")?;
        let email = required_field(payload.email.as_deref(), "email")?;
        if !email.contains('@') {
            return Err(ApiError::Validation("enter a valid email address".to_string()));
        }
        let first_name = required_field(payload.first_name.as_deref(), "first_name")?;
        let last_name = required_field(payload.last_name.as_deref(), "last_name")?;
        let password1 = payload
            .password1
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::Validation("password1 is required".to_string()))?;
        let password2 = payload
            .password2
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::Validation("password2 is required".to_string()))?;

        if password1 != password2 {
            return Err(ApiError::Validation("password fields did not match".to_string()));
        }
        if password1.len() < 8 {
            return Err(ApiError::Validation(
                "password must be at least 8 characters".to_string(),
            ));
        }
        if payload.is_author && payload.is_visitor {
            return Err(ApiError::Validation(
                "author and visitor cannot be selected at the same time".to_string(),
            ));
        }

        if user::Entity::find()
            .filter(user::Column::Username.eq(&username))
            .count(&self.db)
            .await?
            > 0
        {
            return Err(ApiError::Duplicate("username is already taken".to_string()));
        }
        if user::Entity::find().filter(user::Column::Email.eq(&email)).count(&self.db).await? > 0 {
            return Err(ApiError::Duplicate("email is already registered".to_string()));
        }

        let password = auth::hash_password(password1)?;

        let now = Utc::now();
        let txn = self.db.begin().await?;
        let created = user::ActiveModel {
            username: Set(username),
            email: Set(email),
            password: Set(password),
            first_name: Set(first_name),
            last_name: Set(last_name),
            is_active: Set(true),
            is_author: Set(payload.is_author),
            is_visitor: Set(payload.is_visitor),
            date_joined: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        profile::ActiveModel {
            user_id: Set(created.id),
            status: Set(profile::ProfileStatus::Active),
            created_by: Set(Some(created.id)),
            created_on: Set(now),
            last_modified: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(created)
    }

    /// Get-or-create token semantics: a repeated login reuses the key that
    /// is already on record for the user.
    pub async fn token_for_user(&self, user_id: i32) -> AppResult<String> {
        if let Some(token) = auth_token::Entity::find()
            .filter(auth_token::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
        {
            return Ok(token.key);
        }

        let created = auth_token::ActiveModel {
            key: Set(auth::new_token_key()),
            user_id: Set(user_id),
            created_on: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(created.key)
    }

    /// Logout deletes the row outright, so the next login mints a new key.
    pub async fn revoke_token(&self, key: &str) -> AppResult<()> {
        auth_token::Entity::delete_by_id(key.to_owned()).exec(&self.db).await?;
        Ok(())
    }

    pub async fn user_for_token(&self, key: &str) -> AppResult<Option<user::Model>> {
        let Some(token) = auth_token::Entity::find_by_id(key.to_owned()).one(&self.db).await?
        else {
            return Ok(None);
        };
        Ok(user::Entity::find_by_id(token.user_id).one(&self.db).await?)
    }
}

fn required_field(value: Option<&str>, label: &str) -> AppResult<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Validation(format!("{label} is required")))
}

fn validate_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("title must not be empty".to_string()));
    }
    if title.chars().count() > 255 {
        return Err(ApiError::Validation("title must be at most 255 characters".to_string()));
    }
    Ok(title.to_string())
}

fn validate_year(year: i32) -> AppResult<i32> {
    if (1..=9999).contains(&year) {
        Ok(year)
    } else {
        Err(ApiError::Validation("year must be between 1 and 9999".to_string()))
    }
}

fn validate_duration(duration: i32) -> AppResult<i32> {
    if duration > 0 {
        Ok(duration)
    } else {
        Err(ApiError::Validation("duration must be a positive number of minutes".to_string()))
    }
}
