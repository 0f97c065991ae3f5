use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::movies::dto::{
    AssociateRequest, AssociationResponse, MessageResponse, MovieActorsResponse, MovieResponse,
    MoviesResponse, MoviesWithActorsResponse, PublicMovie, PublicMoviesResponse, RateRequest,
    RatingResponse, ReconcileRequest,
};
use crate::movies::{associations, ratings};
use crate::state::AppState;
use crate::store::types::MovieInput;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/:id", get(get_movie))
        .route("/movies/:id/actors", get(list_movie_actors))
        .route("/actors-movies", get(list_movies_with_actors))
        .route("/public/movies", get(list_public_movies))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", post(create_movie))
        .route("/movies/:id", put(update_movie).delete(delete_movie))
        .route(
            "/movies/:id/actors",
            post(associate_actors).put(reconcile_actors),
        )
        .route("/movies/:id/rating", post(rate_movie))
}

#[instrument(skip(state, payload))]
async fn create_movie(
    State(state): State<AppState>,
    Json(payload): Json<MovieInput>,
) -> Result<(StatusCode, Json<MovieResponse>), ApiError> {
    let movie = state.store.create_movie(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(MovieResponse {
            success: true,
            movie,
        }),
    ))
}

#[instrument(skip(state))]
async fn list_movies(State(state): State<AppState>) -> Result<Json<MoviesResponse>, ApiError> {
    let movies = state.store.list_movies().await?;
    Ok(Json(MoviesResponse {
        success: true,
        movies,
    }))
}

#[instrument(skip(state))]
async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MovieResponse>, ApiError> {
    let movie = state
        .store
        .get_movie(id)
        .await?
        .ok_or(ApiError::NotFound("Movie"))?;
    Ok(Json(MovieResponse {
        success: true,
        movie,
    }))
}

#[instrument(skip(state, payload))]
async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<MovieInput>,
) -> Result<Json<MovieResponse>, ApiError> {
    let movie = state
        .store
        .update_movie(id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Movie"))?;
    Ok(Json(MovieResponse {
        success: true,
        movie,
    }))
}

#[instrument(skip(state))]
async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.store.delete_movie(id).await? {
        return Err(ApiError::NotFound("Movie"));
    }
    Ok(Json(MessageResponse {
        success: true,
        message: "Movie deleted successfully",
    }))
}

#[instrument(skip(state, payload))]
async fn associate_actors(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AssociateRequest>,
) -> Result<(StatusCode, Json<AssociationResponse>), ApiError> {
    let outcome = associations::associate(state.store.as_ref(), id, &payload.actor_ids).await?;
    Ok((
        StatusCode::CREATED,
        Json(AssociationResponse {
            success: true,
            outcome,
        }),
    ))
}

#[instrument(skip(state, payload))]
async fn reconcile_actors(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReconcileRequest>,
) -> Result<Json<AssociationResponse>, ApiError> {
    let outcome = associations::reconcile(
        state.store.as_ref(),
        id,
        &payload.add_actor_ids,
        &payload.remove_actor_ids,
    )
    .await?;
    Ok(Json(AssociationResponse {
        success: true,
        outcome,
    }))
}

#[instrument(skip(state))]
async fn list_movie_actors(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MovieActorsResponse>, ApiError> {
    let (movie, actors) = associations::actors_for_movie(state.store.as_ref(), id).await?;
    Ok(Json(MovieActorsResponse {
        success: true,
        movie,
        actors,
    }))
}

#[instrument(skip(state))]
async fn list_movies_with_actors(
    State(state): State<AppState>,
) -> Result<Json<MoviesWithActorsResponse>, ApiError> {
    let movies_with_actors = associations::movies_with_actors(state.store.as_ref()).await?;
    Ok(Json(MoviesWithActorsResponse {
        success: true,
        movies_with_actors,
    }))
}

#[instrument(skip(state, payload))]
async fn rate_movie(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<RateRequest>,
) -> Result<(StatusCode, Json<RatingResponse>), ApiError> {
    let (rating, created) =
        ratings::rate(state.store.as_ref(), id, user_id, payload.rating).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(RatingResponse {
        success: true,
        rating,
    })))
}

#[instrument(skip(state))]
async fn list_public_movies(
    State(state): State<AppState>,
) -> Result<Json<PublicMoviesResponse>, ApiError> {
    let rows = ratings::movies_with_average(state.store.as_ref()).await?;
    let movies = rows
        .into_iter()
        .map(|row| PublicMovie {
            rating: ratings::display_average(row.rating),
            movie: row.movie,
        })
        .collect();
    Ok(Json(PublicMoviesResponse {
        success: true,
        movies,
    }))
}
