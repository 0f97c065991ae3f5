use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::actors::dto::{ActorMoviesResponse, ActorResponse, ActorsResponse, MessageResponse};
use crate::error::ApiError;
use crate::movies::associations;
use crate::state::AppState;
use crate::store::types::ActorInput;

pub fn actor_routes() -> Router<AppState> {
    Router::new()
        .route("/actors", get(list_actors).post(create_actor))
        .route(
            "/actors/:id",
            get(get_actor).put(update_actor).delete(delete_actor),
        )
        .route("/actors/:id/movies", get(list_actor_movies))
}

#[instrument(skip(state, payload))]
async fn create_actor(
    State(state): State<AppState>,
    Json(payload): Json<ActorInput>,
) -> Result<(StatusCode, Json<ActorResponse>), ApiError> {
    let actor = state.store.create_actor(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ActorResponse {
            success: true,
            actor,
        }),
    ))
}

#[instrument(skip(state))]
async fn list_actors(State(state): State<AppState>) -> Result<Json<ActorsResponse>, ApiError> {
    let actors = state.store.list_actors().await?;
    Ok(Json(ActorsResponse {
        success: true,
        actors,
    }))
}

#[instrument(skip(state))]
async fn get_actor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ActorResponse>, ApiError> {
    let actor = state
        .store
        .get_actor(id)
        .await?
        .ok_or(ApiError::NotFound("Actor"))?;
    Ok(Json(ActorResponse {
        success: true,
        actor,
    }))
}

#[instrument(skip(state, payload))]
async fn update_actor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ActorInput>,
) -> Result<Json<ActorResponse>, ApiError> {
    let actor = state
        .store
        .update_actor(id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Actor"))?;
    Ok(Json(ActorResponse {
        success: true,
        actor,
    }))
}

#[instrument(skip(state))]
async fn delete_actor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.store.delete_actor(id).await? {
        return Err(ApiError::NotFound("Actor"));
    }
    Ok(Json(MessageResponse {
        success: true,
        message: "Actor deleted successfully",
    }))
}

#[instrument(skip(state))]
async fn list_actor_movies(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ActorMoviesResponse>, ApiError> {
    let (actor, movies) = associations::movies_for_actor(state.store.as_ref(), id).await?;
    Ok(Json(ActorMoviesResponse {
        success: true,
        actor,
        movies,
    }))
}
