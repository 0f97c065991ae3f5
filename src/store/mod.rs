#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod types;

use async_trait::async_trait;

use crate::error::StoreError;
use types::{Actor, ActorInput, Movie, MovieInput, MovieWithRating, Rating, User};

/// Data-access seam between the domain services and the backing store.
///
/// Held as `Arc<dyn CatalogStore>` in the application state so tests can
/// substitute the in-memory implementation. All operations are idempotent
/// at the row-key level; uniqueness constraints in the store are the
/// authoritative guard against check-then-insert races and surface as
/// `StoreError::Duplicate`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // users
    /// Looks up by username (as stored) or email. Emails are stored
    /// lowercased, so the email side matches case-insensitively.
    async fn find_user(&self, username_or_email: &str) -> Result<Option<User>, StoreError>;
    async fn user_exists(&self, username: &str, email: &str) -> Result<bool, StoreError>;
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError>;

    // movies
    async fn get_movie(&self, id: i64) -> Result<Option<Movie>, StoreError>;
    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError>;
    async fn create_movie(&self, input: &MovieInput) -> Result<Movie, StoreError>;
    async fn update_movie(&self, id: i64, input: &MovieInput) -> Result<Option<Movie>, StoreError>;
    async fn delete_movie(&self, id: i64) -> Result<bool, StoreError>;

    // actors
    async fn get_actor(&self, id: i64) -> Result<Option<Actor>, StoreError>;
    async fn list_actors(&self) -> Result<Vec<Actor>, StoreError>;
    async fn create_actor(&self, input: &ActorInput) -> Result<Actor, StoreError>;
    async fn update_actor(&self, id: i64, input: &ActorInput) -> Result<Option<Actor>, StoreError>;
    async fn delete_actor(&self, id: i64) -> Result<bool, StoreError>;

    // movie <-> actor links
    async fn existing_actor_ids(&self, ids: &[i64]) -> Result<Vec<i64>, StoreError>;
    async fn linked_actor_ids(&self, movie_id: i64, ids: &[i64]) -> Result<Vec<i64>, StoreError>;
    async fn insert_links(&self, movie_id: i64, actor_ids: &[i64]) -> Result<(), StoreError>;
    async fn delete_links(&self, movie_id: i64, actor_ids: &[i64]) -> Result<(), StoreError>;
    async fn list_links(&self) -> Result<Vec<(i64, i64)>, StoreError>;
    async fn actors_for_movie(&self, movie_id: i64) -> Result<Vec<Actor>, StoreError>;
    async fn movies_for_actor(&self, actor_id: i64) -> Result<Vec<Movie>, StoreError>;

    // ratings
    async fn get_rating(&self, movie_id: i64, user_id: i64) -> Result<Option<Rating>, StoreError>;
    async fn upsert_rating(
        &self,
        movie_id: i64,
        user_id: i64,
        value: i32,
    ) -> Result<Rating, StoreError>;
    async fn average_rating(&self, movie_id: i64) -> Result<Option<f64>, StoreError>;
    async fn movies_with_average(&self) -> Result<Vec<MovieWithRating>, StoreError>;
}
