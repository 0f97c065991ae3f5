use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// User record. The password hash is never serialized to clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<Date>,
    pub genre: Option<String>,
    pub poster_url: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Actor {
    pub id: i64,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rating {
    pub id: i64,
    pub movie_id: i64,
    pub user_id: i64,
    pub rating: i32,
    pub created_at: OffsetDateTime,
}

/// One row of the movies-with-average-rating listing. `rating` is `None`
/// for a movie nobody has rated yet.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MovieWithRating {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub movie: Movie,
    pub rating: Option<f64>,
}

/// Fields a client supplies when creating or replacing a movie.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieInput {
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<Date>,
    pub genre: Option<String>,
    pub poster_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActorInput {
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub bio: Option<String>,
}
