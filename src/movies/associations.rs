use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::store::types::{Actor, Movie};
use crate::store::CatalogStore;

/// A movie and the actors linked to it, for the grouped catalog listing.
#[derive(Debug, Serialize)]
pub struct MovieWithActors {
    #[serde(flatten)]
    pub movie: Movie,
    pub actors: Vec<Actor>,
}

/// Result of an add-side association pass: which links were newly
/// inserted and which already existed.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AssociationOutcome {
    pub added: Vec<i64>,
    #[serde(rename = "alreadyPresent")]
    pub already_present: Vec<i64>,
}

fn dedupe(ids: &[i64]) -> Vec<i64> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}

async fn ensure_movie(store: &dyn CatalogStore, movie_id: i64) -> Result<Movie, ApiError> {
    store
        .get_movie(movie_id)
        .await?
        .ok_or(ApiError::NotFound("Movie"))
}

/// Validates and inserts links for `actor_ids`. All-or-nothing on the
/// validation side: if any requested actor is missing, nothing is
/// inserted and the missing ids are reported. Already-linked actors are
/// reported, not re-inserted.
async fn add_links(
    store: &dyn CatalogStore,
    movie_id: i64,
    actor_ids: &[i64],
) -> Result<AssociationOutcome, ApiError> {
    let requested = dedupe(actor_ids);
    if requested.is_empty() {
        return Ok(AssociationOutcome {
            added: vec![],
            already_present: vec![],
        });
    }

    let known = store.existing_actor_ids(&requested).await?;
    let missing: Vec<i64> = requested
        .iter()
        .filter(|id| !known.contains(id))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::ActorsNotFound(missing));
    }

    let linked = store.linked_actor_ids(movie_id, &requested).await?;
    let (already_present, added): (Vec<i64>, Vec<i64>) =
        requested.into_iter().partition(|id| linked.contains(id));

    if !added.is_empty() {
        store.insert_links(movie_id, &added).await?;
    }

    Ok(AssociationOutcome {
        added,
        already_present,
    })
}

/// Links a set of actors to a movie, idempotently.
pub async fn associate(
    store: &dyn CatalogStore,
    movie_id: i64,
    actor_ids: &[i64],
) -> Result<AssociationOutcome, ApiError> {
    ensure_movie(store, movie_id).await?;
    let outcome = add_links(store, movie_id, actor_ids).await?;
    info!(
        movie_id,
        added = outcome.added.len(),
        already_present = outcome.already_present.len(),
        "actors associated"
    );
    Ok(outcome)
}

/// Applies additions then removals in one logical operation. Removal is
/// always an idempotent no-op for absent links, and because it runs
/// after the add pass, an id present in both sets is a net removal.
pub async fn reconcile(
    store: &dyn CatalogStore,
    movie_id: i64,
    add_actor_ids: &[i64],
    remove_actor_ids: &[i64],
) -> Result<AssociationOutcome, ApiError> {
    ensure_movie(store, movie_id).await?;
    let outcome = add_links(store, movie_id, add_actor_ids).await?;
    if !remove_actor_ids.is_empty() {
        store
            .delete_links(movie_id, &dedupe(remove_actor_ids))
            .await?;
    }
    info!(
        movie_id,
        added = outcome.added.len(),
        removed = remove_actor_ids.len(),
        "associations reconciled"
    );
    Ok(outcome)
}

/// A movie together with its linked actors. A movie with zero links is a
/// valid answer (empty list); only an absent movie is `NotFound`.
pub async fn actors_for_movie(
    store: &dyn CatalogStore,
    movie_id: i64,
) -> Result<(Movie, Vec<Actor>), ApiError> {
    let movie = ensure_movie(store, movie_id).await?;
    let actors = store.actors_for_movie(movie_id).await?;
    Ok((movie, actors))
}

/// Every linked movie grouped with its actors, one entry per movie.
/// Inner-join semantics: movies with no associated actors are omitted.
pub async fn movies_with_actors(
    store: &dyn CatalogStore,
) -> Result<Vec<MovieWithActors>, ApiError> {
    let movies = store.list_movies().await?;
    let actors = store.list_actors().await?;
    let links = store.list_links().await?;

    let actor_by_id: HashMap<i64, &Actor> = actors.iter().map(|a| (a.id, a)).collect();
    let mut grouped: HashMap<i64, Vec<Actor>> = HashMap::new();
    for (movie_id, actor_id) in links {
        if let Some(actor) = actor_by_id.get(&actor_id) {
            grouped.entry(movie_id).or_default().push((*actor).clone());
        }
    }

    Ok(movies
        .into_iter()
        .filter_map(|movie| {
            grouped
                .remove(&movie.id)
                .map(|actors| MovieWithActors { movie, actors })
        })
        .collect())
}

/// Symmetric listing: an actor together with the movies they appear in.
pub async fn movies_for_actor(
    store: &dyn CatalogStore,
    actor_id: i64,
) -> Result<(Actor, Vec<Movie>), ApiError> {
    let actor = store
        .get_actor(actor_id)
        .await?
        .ok_or(ApiError::NotFound("Actor"))?;
    let movies = store.movies_for_actor(actor_id).await?;
    Ok((actor, movies))
}
