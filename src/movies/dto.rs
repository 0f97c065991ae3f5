use serde::{Deserialize, Serialize};

use crate::movies::associations::{AssociationOutcome, MovieWithActors};
use crate::store::types::{Actor, Movie, Rating};

#[derive(Debug, Deserialize)]
pub struct AssociateRequest {
    #[serde(rename = "actorIds")]
    pub actor_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    #[serde(rename = "addActorIds", default)]
    pub add_actor_ids: Vec<i64>,
    #[serde(rename = "removeActorIds", default)]
    pub remove_actor_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i32,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub success: bool,
    pub movie: Movie,
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub success: bool,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize)]
pub struct MovieActorsResponse {
    pub success: bool,
    pub movie: Movie,
    pub actors: Vec<Actor>,
}

#[derive(Debug, Serialize)]
pub struct MoviesWithActorsResponse {
    pub success: bool,
    #[serde(rename = "moviesWithActors")]
    pub movies_with_actors: Vec<MovieWithActors>,
}

#[derive(Debug, Serialize)]
pub struct AssociationResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: AssociationOutcome,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub success: bool,
    pub rating: Rating,
}

/// Movie row in the public listing; a never-rated movie shows 0.
#[derive(Debug, Serialize)]
pub struct PublicMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub rating: f64,
}

#[derive(Debug, Serialize)]
pub struct PublicMoviesResponse {
    pub success: bool,
    pub movies: Vec<PublicMovie>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}
