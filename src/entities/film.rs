use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "film")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// Reference path produced by the media store, e.g. `film_images/<name>`.
    pub thumbnail: Option<String>,
    pub status: FilmStatus,
    pub year: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Runtime in minutes.
    pub duration: i32,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_on: DateTimeUtc,
    pub last_modified: DateTimeUtc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum FilmStatus {
    #[sea_orm(string_value = "Released")]
    Released,
    #[sea_orm(string_value = "Upcoming")]
    Upcoming,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::actor::Entity> for Entity {
    fn to() -> RelationDef {
        super::film_actor::Relation::Actor.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::film_actor::Relation::Film.def().rev())
    }
}

impl Related<super::director::Entity> for Entity {
    fn to() -> RelationDef {
        super::film_director::Relation::Director.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::film_director::Relation::Film.def().rev())
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        super::film_genre::Relation::Genre.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::film_genre::Relation::Film.def().rev())
    }
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        super::film_country::Relation::Country.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::film_country::Relation::Film.def().rev())
    }
}

impl Related<super::language::Entity> for Entity {
    fn to() -> RelationDef {
        super::film_language::Relation::Language.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::film_language::Relation::Film.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
