use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string(User::Username).unique_key())
                    .col(string(User::Email).unique_key())
                    .col(string(User::Password))
                    .col(string(User::FirstName))
                    .col(string(User::LastName))
                    .col(boolean(User::IsActive))
                    .col(boolean(User::IsAuthor))
                    .col(boolean(User::IsVisitor))
                    .col(timestamp(User::DateJoined))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(pk_auto(Profile::Id))
                    .col(integer(Profile::UserId).unique_key())
                    .col(date_null(Profile::Birth))
                    .col(string_null(Profile::Avatar))
                    .col(text_null(Profile::Bio))
                    .col(string(Profile::Status))
                    .col(integer_null(Profile::CreatedBy))
                    .col(integer_null(Profile::UpdatedBy))
                    .col(timestamp(Profile::CreatedOn))
                    .col(timestamp(Profile::LastModified))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_user")
                            .from(Profile::Table, Profile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actor::Table)
                    .if_not_exists()
                    .col(pk_auto(Actor::Id))
                    .col(string(Actor::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Director::Table)
                    .if_not_exists()
                    .col(pk_auto(Director::Id))
                    .col(string(Director::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(pk_auto(Genre::Id))
                    .col(string(Genre::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Country::Table)
                    .if_not_exists()
                    .col(pk_auto(Country::Id))
                    .col(string(Country::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Language::Table)
                    .if_not_exists()
                    .col(pk_auto(Language::Id))
                    .col(string(Language::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Film::Table)
                    .if_not_exists()
                    .col(pk_auto(Film::Id))
                    .col(string(Film::Title))
                    .col(string_null(Film::Thumbnail))
                    .col(string(Film::Status))
                    .col(integer(Film::Year))
                    .col(text(Film::Description))
                    .col(integer(Film::Duration))
                    .col(integer_null(Film::CreatedBy))
                    .col(integer_null(Film::UpdatedBy))
                    .col(timestamp(Film::CreatedOn))
                    .col(timestamp(Film::LastModified))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmActor::Table)
                    .if_not_exists()
                    .col(integer(FilmActor::FilmId))
                    .col(integer(FilmActor::ActorId))
                    .primary_key(Index::create().col(FilmActor::FilmId).col(FilmActor::ActorId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_actor_film")
                            .from(FilmActor::Table, FilmActor::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_actor_actor")
                            .from(FilmActor::Table, FilmActor::ActorId)
                            .to(Actor::Table, Actor::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmDirector::Table)
                    .if_not_exists()
                    .col(integer(FilmDirector::FilmId))
                    .col(integer(FilmDirector::DirectorId))
                    .primary_key(
                        Index::create().col(FilmDirector::FilmId).col(FilmDirector::DirectorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_director_film")
                            .from(FilmDirector::Table, FilmDirector::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_director_director")
                            .from(FilmDirector::Table, FilmDirector::DirectorId)
                            .to(Director::Table, Director::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmGenre::Table)
                    .if_not_exists()
                    .col(integer(FilmGenre::FilmId))
                    .col(integer(FilmGenre::GenreId))
                    .primary_key(Index::create().col(FilmGenre::FilmId).col(FilmGenre::GenreId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_genre_film")
                            .from(FilmGenre::Table, FilmGenre::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_genre_genre")
                            .from(FilmGenre::Table, FilmGenre::GenreId)
                            .to(Genre::Table, Genre::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmCountry::Table)
                    .if_not_exists()
                    .col(integer(FilmCountry::FilmId))
                    .col(integer(FilmCountry::CountryId))
                    .primary_key(
                        Index::create().col(FilmCountry::FilmId).col(FilmCountry::CountryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_country_film")
                            .from(FilmCountry::Table, FilmCountry::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_country_country")
                            .from(FilmCountry::Table, FilmCountry::CountryId)
                            .to(Country::Table, Country::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmLanguage::Table)
                    .if_not_exists()
                    .col(integer(FilmLanguage::FilmId))
                    .col(integer(FilmLanguage::LanguageId))
                    .primary_key(
                        Index::create().col(FilmLanguage::FilmId).col(FilmLanguage::LanguageId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_language_film")
                            .from(FilmLanguage::Table, FilmLanguage::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_language_language")
                            .from(FilmLanguage::Table, FilmLanguage::LanguageId)
                            .to(Language::Table, Language::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(pk_auto(Rating::Id))
                    .col(integer(Rating::UserId))
                    .col(integer(Rating::FilmId))
                    .col(double(Rating::Value))
                    .col(integer_null(Rating::CreatedBy))
                    .col(integer_null(Rating::UpdatedBy))
                    .col(timestamp(Rating::CreatedOn))
                    .col(timestamp(Rating::LastModified))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_user")
                            .from(Rating::Table, Rating::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_film")
                            .from(Rating::Table, Rating::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One rating per user per film, enforced by the database so that
        // racing inserts cannot slip a second row in.
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_user_film_unique")
                    .table(Rating::Table)
                    .col(Rating::UserId)
                    .col(Rating::FilmId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuthToken::Table)
                    .if_not_exists()
                    .col(string(AuthToken::Key).primary_key())
                    .col(integer(AuthToken::UserId).unique_key())
                    .col(timestamp(AuthToken::CreatedOn))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_auth_token_user")
                            .from(AuthToken::Table, AuthToken::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AuthToken::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Rating::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmLanguage::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmCountry::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmGenre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmDirector::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmActor::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Film::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Language::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Country::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Director::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actor::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Profile::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Username,
    Email,
    Password,
    FirstName,
    LastName,
    IsActive,
    IsAuthor,
    IsVisitor,
    DateJoined,
}

#[derive(DeriveIden)]
enum Profile {
    Table,
    Id,
    UserId,
    Birth,
    Avatar,
    Bio,
    Status,
    CreatedBy,
    UpdatedBy,
    CreatedOn,
    LastModified,
}

#[derive(DeriveIden)]
enum Actor {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Director {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Genre {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Country {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Language {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Film {
    Table,
    Id,
    Title,
    Thumbnail,
    Status,
    Year,
    Description,
    Duration,
    CreatedBy,
    UpdatedBy,
    CreatedOn,
    LastModified,
}

#[derive(DeriveIden)]
enum FilmActor {
    Table,
    FilmId,
    ActorId,
}

#[derive(DeriveIden)]
enum FilmDirector {
    Table,
    FilmId,
    DirectorId,
}

#[derive(DeriveIden)]
enum FilmGenre {
    Table,
    FilmId,
    GenreId,
}

#[derive(DeriveIden)]
enum FilmCountry {
    Table,
    FilmId,
    CountryId,
}

#[derive(DeriveIden)]
enum FilmLanguage {
    Table,
    FilmId,
    LanguageId,
}

#[derive(DeriveIden)]
enum Rating {
    Table,
    Id,
    UserId,
    FilmId,
    Value,
    CreatedBy,
    UpdatedBy,
    CreatedOn,
    LastModified,
}

#[derive(DeriveIden)]
enum AuthToken {
    Table,
    Key,
    UserId,
    CreatedOn,
}
