use tracing::info;

use crate::error::ApiError;
use crate::store::types::{MovieWithRating, Rating};
use crate::store::CatalogStore;

/// Records one user's star rating for a movie as a pure upsert: exactly
/// one rating survives per (movie, user) pair however often it is called.
/// The returned flag is true when this call inserted the pair's first
/// rating rather than overwriting an existing one.
pub async fn rate(
    store: &dyn CatalogStore,
    movie_id: i64,
    user_id: i64,
    value: i32,
) -> Result<(Rating, bool), ApiError> {
    if !(1..=5).contains(&value) {
        return Err(ApiError::InvalidRating);
    }
    if store.get_movie(movie_id).await?.is_none() {
        return Err(ApiError::NotFound("Movie"));
    }
    let created = store.get_rating(movie_id, user_id).await?.is_none();
    let rating = store.upsert_rating(movie_id, user_id, value).await?;
    info!(movie_id, user_id, value, created, "rating recorded");
    Ok((rating, created))
}

/// Arithmetic mean of all ratings for a movie, `None` when nobody has
/// rated it. Full precision; rounding is a display concern.
pub async fn average(store: &dyn CatalogStore, movie_id: i64) -> Result<Option<f64>, ApiError> {
    if store.get_movie(movie_id).await?.is_none() {
        return Err(ApiError::NotFound("Movie"));
    }
    Ok(store.average_rating(movie_id).await?)
}

/// Every movie exactly once, with its average rating where one exists.
pub async fn movies_with_average(
    store: &dyn CatalogStore,
) -> Result<Vec<MovieWithRating>, ApiError> {
    Ok(store.movies_with_average().await?)
}

/// Rounds an average to 2 decimals and coerces "no ratings" to 0 for the
/// public listing wire format.
pub fn display_average(avg: Option<f64>) -> f64 {
    (avg.unwrap_or(0.0) * 100.0).round() / 100.0
}
