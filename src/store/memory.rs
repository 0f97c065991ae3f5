//! In-memory `CatalogStore` used as a test double for the domain services.

use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::StoreError;
use crate::store::types::{Actor, ActorInput, Movie, MovieInput, MovieWithRating, Rating, User};
use crate::store::CatalogStore;

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    movies: Vec<Movie>,
    actors: Vec<Actor>,
    links: BTreeSet<(i64, i64)>,
    ratings: Vec<Rating>,
    next_id: i64,
}

impl Inner {
    fn alloc(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_user(&self, username_or_email: &str) -> Result<Option<User>, StoreError> {
        let email = username_or_email.to_lowercase();
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .find(|u| u.username == username_or_email || u.email == email)
            .cloned())
    }

    async fn user_exists(&self, username: &str, email: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .any(|u| u.username == username || u.email == email))
    }

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        // Mirrors the unique constraints on users(username) and users(email).
        if inner
            .users
            .iter()
            .any(|u| u.username == username || u.email == email)
        {
            return Err(StoreError::Duplicate);
        }
        let user = User {
            id: inner.alloc(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_movie(&self, id: i64) -> Result<Option<Movie>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.movies.iter().find(|m| m.id == id).cloned())
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.movies.clone())
    }

    async fn create_movie(&self, input: &MovieInput) -> Result<Movie, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let movie = Movie {
            id: inner.alloc(),
            title: input.title.clone(),
            description: input.description.clone(),
            release_date: input.release_date,
            genre: input.genre.clone(),
            poster_url: input.poster_url.clone(),
            created_by: None,
            created_at: now,
            updated_at: now,
        };
        inner.movies.push(movie.clone());
        Ok(movie)
    }

    async fn update_movie(&self, id: i64, input: &MovieInput) -> Result<Option<Movie>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(movie) = inner.movies.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        movie.title = input.title.clone();
        movie.description = input.description.clone();
        movie.release_date = input.release_date;
        movie.genre = input.genre.clone();
        movie.poster_url = input.poster_url.clone();
        movie.updated_at = OffsetDateTime::now_utc();
        Ok(Some(movie.clone()))
    }

    async fn delete_movie(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.movies.len();
        inner.movies.retain(|m| m.id != id);
        inner.links.retain(|(movie_id, _)| *movie_id != id);
        inner.ratings.retain(|r| r.movie_id != id);
        Ok(inner.movies.len() < before)
    }

    async fn get_actor(&self, id: i64) -> Result<Option<Actor>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.actors.iter().find(|a| a.id == id).cloned())
    }

    async fn list_actors(&self) -> Result<Vec<Actor>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.actors.clone())
    }

    async fn create_actor(&self, input: &ActorInput) -> Result<Actor, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let actor = Actor {
            id: inner.alloc(),
            name: input.name.clone(),
            age: input.age,
            gender: input.gender.clone(),
            bio: input.bio.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.actors.push(actor.clone());
        Ok(actor)
    }

    async fn update_actor(&self, id: i64, input: &ActorInput) -> Result<Option<Actor>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(actor) = inner.actors.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        actor.name = input.name.clone();
        actor.age = input.age;
        actor.gender = input.gender.clone();
        actor.bio = input.bio.clone();
        actor.updated_at = OffsetDateTime::now_utc();
        Ok(Some(actor.clone()))
    }

    async fn delete_actor(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.actors.len();
        inner.actors.retain(|a| a.id != id);
        inner.links.retain(|(_, actor_id)| *actor_id != id);
        Ok(inner.actors.len() < before)
    }

    async fn existing_actor_ids(&self, ids: &[i64]) -> Result<Vec<i64>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(ids
            .iter()
            .filter(|id| inner.actors.iter().any(|a| a.id == **id))
            .copied()
            .collect())
    }

    async fn linked_actor_ids(&self, movie_id: i64, ids: &[i64]) -> Result<Vec<i64>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(ids
            .iter()
            .filter(|id| inner.links.contains(&(movie_id, **id)))
            .copied()
            .collect())
    }

    async fn insert_links(&self, movie_id: i64, actor_ids: &[i64]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        for actor_id in actor_ids {
            inner.links.insert((movie_id, *actor_id));
        }
        Ok(())
    }

    async fn delete_links(&self, movie_id: i64, actor_ids: &[i64]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        for actor_id in actor_ids {
            inner.links.remove(&(movie_id, *actor_id));
        }
        Ok(())
    }

    async fn list_links(&self) -> Result<Vec<(i64, i64)>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.links.iter().copied().collect())
    }

    async fn actors_for_movie(&self, movie_id: i64) -> Result<Vec<Actor>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .actors
            .iter()
            .filter(|a| inner.links.contains(&(movie_id, a.id)))
            .cloned()
            .collect())
    }

    async fn movies_for_actor(&self, actor_id: i64) -> Result<Vec<Movie>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .movies
            .iter()
            .filter(|m| inner.links.contains(&(m.id, actor_id)))
            .cloned()
            .collect())
    }

    async fn get_rating(&self, movie_id: i64, user_id: i64) -> Result<Option<Rating>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .ratings
            .iter()
            .find(|r| r.movie_id == movie_id && r.user_id == user_id)
            .cloned())
    }

    async fn upsert_rating(
        &self,
        movie_id: i64,
        user_id: i64,
        value: i32,
    ) -> Result<Rating, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner
            .ratings
            .iter_mut()
            .find(|r| r.movie_id == movie_id && r.user_id == user_id)
        {
            // Overwrite the value only; created_at stays as inserted.
            existing.rating = value;
            return Ok(existing.clone());
        }
        let rating = Rating {
            id: inner.alloc(),
            movie_id,
            user_id,
            rating: value,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.ratings.push(rating.clone());
        Ok(rating)
    }

    async fn average_rating(&self, movie_id: i64) -> Result<Option<f64>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let values: Vec<i32> = inner
            .ratings
            .iter()
            .filter(|r| r.movie_id == movie_id)
            .map(|r| r.rating)
            .collect();
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            values.iter().map(|v| f64::from(*v)).sum::<f64>() / values.len() as f64,
        ))
    }

    async fn movies_with_average(&self) -> Result<Vec<MovieWithRating>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .movies
            .iter()
            .map(|m| {
                let values: Vec<i32> = inner
                    .ratings
                    .iter()
                    .filter(|r| r.movie_id == m.id)
                    .map(|r| r.rating)
                    .collect();
                let rating = if values.is_empty() {
                    None
                } else {
                    Some(values.iter().map(|v| f64::from(*v)).sum::<f64>() / values.len() as f64)
                };
                MovieWithRating {
                    movie: m.clone(),
                    rating,
                }
            })
            .collect())
    }
}
