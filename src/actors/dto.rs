use serde::Serialize;

use crate::store::types::{Actor, Movie};

#[derive(Debug, Serialize)]
pub struct ActorResponse {
    pub success: bool,
    pub actor: Actor,
}

#[derive(Debug, Serialize)]
pub struct ActorsResponse {
    pub success: bool,
    pub actors: Vec<Actor>,
}

#[derive(Debug, Serialize)]
pub struct ActorMoviesResponse {
    pub success: bool,
    pub actor: Actor,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}
