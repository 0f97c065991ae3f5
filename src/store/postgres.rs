use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::store::types::{Actor, ActorInput, Movie, MovieInput, MovieWithRating, Rating, User};
use crate::store::CatalogStore;

const MOVIE_COLS: &str =
    "id, title, description, release_date, genre, poster_url, created_by, created_at, updated_at";
const ACTOR_COLS: &str = "id, name, age, gender, bio, created_at, updated_at";

/// Production `CatalogStore` backed by a pooled Postgres connection.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => StoreError::Duplicate,
        sqlx::Error::PoolTimedOut => StoreError::Timeout,
        _ => StoreError::Unavailable(e.to_string()),
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn find_user(&self, username_or_email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1 OR email = LOWER($1)
            "#,
        )
        .bind(username_or_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn user_exists(&self, username: &str, email: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)"#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn get_movie(&self, id: i64) -> Result<Option<Movie>, StoreError> {
        sqlx::query_as::<_, Movie>(&format!("SELECT {MOVIE_COLS} FROM movies WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        sqlx::query_as::<_, Movie>(&format!("SELECT {MOVIE_COLS} FROM movies ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn create_movie(&self, input: &MovieInput) -> Result<Movie, StoreError> {
        sqlx::query_as::<_, Movie>(&format!(
            r#"
            INSERT INTO movies (title, description, release_date, genre, poster_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MOVIE_COLS}
            "#
        ))
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.release_date)
        .bind(&input.genre)
        .bind(&input.poster_url)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn update_movie(&self, id: i64, input: &MovieInput) -> Result<Option<Movie>, StoreError> {
        sqlx::query_as::<_, Movie>(&format!(
            r#"
            UPDATE movies
            SET title = $1, description = $2, release_date = $3, genre = $4,
                poster_url = $5, updated_at = now()
            WHERE id = $6
            RETURNING {MOVIE_COLS}
            "#
        ))
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.release_date)
        .bind(&input.genre)
        .bind(&input.poster_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn delete_movie(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_actor(&self, id: i64) -> Result<Option<Actor>, StoreError> {
        sqlx::query_as::<_, Actor>(&format!("SELECT {ACTOR_COLS} FROM actors WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn list_actors(&self) -> Result<Vec<Actor>, StoreError> {
        sqlx::query_as::<_, Actor>(&format!("SELECT {ACTOR_COLS} FROM actors ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn create_actor(&self, input: &ActorInput) -> Result<Actor, StoreError> {
        sqlx::query_as::<_, Actor>(&format!(
            r#"
            INSERT INTO actors (name, age, gender, bio)
            VALUES ($1, $2, $3, $4)
            RETURNING {ACTOR_COLS}
            "#
        ))
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.gender)
        .bind(&input.bio)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn update_actor(&self, id: i64, input: &ActorInput) -> Result<Option<Actor>, StoreError> {
        sqlx::query_as::<_, Actor>(&format!(
            r#"
            UPDATE actors
            SET name = $1, age = $2, gender = $3, bio = $4, updated_at = now()
            WHERE id = $5
            RETURNING {ACTOR_COLS}
            "#
        ))
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.gender)
        .bind(&input.bio)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn delete_actor(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn existing_actor_ids(&self, ids: &[i64]) -> Result<Vec<i64>, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM actors WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn linked_actor_ids(&self, movie_id: i64, ids: &[i64]) -> Result<Vec<i64>, StoreError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT actor_id FROM movie_actors WHERE movie_id = $1 AND actor_id = ANY($2)",
        )
        .bind(movie_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn insert_links(&self, movie_id: i64, actor_ids: &[i64]) -> Result<(), StoreError> {
        // One transaction so a multi-actor associate is all-or-nothing.
        // ON CONFLICT keeps concurrent identical requests idempotent.
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        for actor_id in actor_ids {
            sqlx::query(
                r#"
                INSERT INTO movie_actors (movie_id, actor_id)
                VALUES ($1, $2)
                ON CONFLICT (movie_id, actor_id) DO NOTHING
                "#,
            )
            .bind(movie_id)
            .bind(actor_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        }
        tx.commit().await.map_err(map_sqlx)
    }

    async fn delete_links(&self, movie_id: i64, actor_ids: &[i64]) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM movie_actors WHERE movie_id = $1 AND actor_id = ANY($2)")
            .bind(movie_id)
            .bind(actor_ids)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn list_links(&self) -> Result<Vec<(i64, i64)>, StoreError> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT movie_id, actor_id FROM movie_actors ORDER BY movie_id, actor_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn actors_for_movie(&self, movie_id: i64) -> Result<Vec<Actor>, StoreError> {
        sqlx::query_as::<_, Actor>(
            r#"
            SELECT a.id, a.name, a.age, a.gender, a.bio, a.created_at, a.updated_at
            FROM actors a
            JOIN movie_actors ma ON ma.actor_id = a.id
            WHERE ma.movie_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn movies_for_actor(&self, actor_id: i64) -> Result<Vec<Movie>, StoreError> {
        sqlx::query_as::<_, Movie>(
            r#"
            SELECT m.id, m.title, m.description, m.release_date, m.genre,
                   m.poster_url, m.created_by, m.created_at, m.updated_at
            FROM movies m
            JOIN movie_actors ma ON ma.movie_id = m.id
            WHERE ma.actor_id = $1
            ORDER BY m.id
            "#,
        )
        .bind(actor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn get_rating(&self, movie_id: i64, user_id: i64) -> Result<Option<Rating>, StoreError> {
        sqlx::query_as::<_, Rating>(
            r#"
            SELECT id, movie_id, user_id, rating, created_at
            FROM movie_ratings
            WHERE movie_id = $1 AND user_id = $2
            "#,
        )
        .bind(movie_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn upsert_rating(
        &self,
        movie_id: i64,
        user_id: i64,
        value: i32,
    ) -> Result<Rating, StoreError> {
        // The UNIQUE (movie_id, user_id) constraint makes this a pure
        // upsert: the update path leaves created_at untouched.
        sqlx::query_as::<_, Rating>(
            r#"
            INSERT INTO movie_ratings (movie_id, user_id, rating)
            VALUES ($1, $2, $3)
            ON CONFLICT (movie_id, user_id) DO UPDATE SET rating = EXCLUDED.rating
            RETURNING id, movie_id, user_id, rating, created_at
            "#,
        )
        .bind(movie_id)
        .bind(user_id)
        .bind(value)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn average_rating(&self, movie_id: i64) -> Result<Option<f64>, StoreError> {
        sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(rating)::FLOAT8 FROM movie_ratings WHERE movie_id = $1",
        )
        .bind(movie_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn movies_with_average(&self) -> Result<Vec<MovieWithRating>, StoreError> {
        sqlx::query_as::<_, MovieWithRating>(
            r#"
            SELECT m.id, m.title, m.description, m.release_date, m.genre,
                   m.poster_url, m.created_by, m.created_at, m.updated_at,
                   AVG(r.rating)::FLOAT8 AS rating
            FROM movies m
            LEFT JOIN movie_ratings r ON r.movie_id = m.id
            GROUP BY m.id
            ORDER BY m.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}
