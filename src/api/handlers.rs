use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::models::{Actor, CatalogMovie, CatalogPerson, Film, SuggestionResponse};
use crate::services::movie_lookup;

use super::AppState;

const DEFAULT_DEBUG_MOVIE_ID: i32 = 10603;
const DEFAULT_DEBUG_PERSON_ID: i32 = 10980;

// Query types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameYearQuery {
    pub name_year: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorMovieQuery {
    pub actor_id: i32,
    pub movie_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i32,
}

#[derive(Debug, Deserialize)]
pub struct DebugQuery {
    pub id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: String,
}

// Handlers

/// Health check endpoint, with the number of actors resolved so far
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let cached_actors = state.actor_cache.len().await;
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "cachedActors": cached_actors })),
    )
}

/// Movie by `"Title (Year)"`, with its cast
pub async fn get_movie_by_name(
    State(state): State<AppState>,
    Query(params): Query<NameYearQuery>,
) -> AppResult<Json<Film>> {
    let film = movie_lookup::film_by_name(state.catalog.as_ref(), &params.name_year).await?;
    Ok(Json(film))
}

/// An actor's confirmed films, excluding the movie they were reached from
pub async fn get_links_for_actor(
    State(state): State<AppState>,
    Query(params): Query<ActorMovieQuery>,
) -> AppResult<Json<Actor>> {
    let actor = state
        .enrichment
        .resolve_links_for_actor(params.actor_id, params.movie_id)
        .await?;
    Ok(Json(actor))
}

/// Movie by `"Title (Year)"`, with every cast member's onward links
pub async fn get_links_by_name(
    State(state): State<AppState>,
    Query(params): Query<NameYearQuery>,
) -> AppResult<Json<Film>> {
    let film = match movie_lookup::find_movie_id(state.catalog.as_ref(), &params.name_year).await? {
        Some(movie_id) => links_for_movie(&state, movie_id).await?,
        None => Film::default(),
    };
    Ok(Json(film))
}

/// Movie by id, with every cast member's onward links
pub async fn get_links(
    State(state): State<AppState>,
    Query(params): Query<IdQuery>,
) -> AppResult<Json<Film>> {
    let film = links_for_movie(&state, params.id).await?;
    Ok(Json(film))
}

/// Movie by id, with its cast minus the actor it was reached from
pub async fn get_movie(
    State(state): State<AppState>,
    Query(params): Query<ActorMovieQuery>,
) -> AppResult<Json<Film>> {
    let film = movie_lookup::film_without_member(
        state.catalog.as_ref(),
        params.movie_id,
        params.actor_id,
    )
    .await?;
    Ok(Json(film))
}

/// Raw suggestion-service lookup
pub async fn get_suggestions(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<SuggestionResponse> {
    Json(state.suggestions.find_suggestions(&params.search).await)
}

/// Actor details without film resolution
pub async fn get_actor(
    State(state): State<AppState>,
    Query(params): Query<IdQuery>,
) -> AppResult<Json<Actor>> {
    let actor = state
        .catalog
        .get_person(params.id)
        .await?
        .map(Actor::from)
        .unwrap_or_default();
    Ok(Json(actor))
}

/// Catalog movie record as received, with credits
pub async fn debug_movie(
    State(state): State<AppState>,
    Query(params): Query<DebugQuery>,
) -> AppResult<Json<Option<CatalogMovie>>> {
    let movie_id = params.id.unwrap_or(DEFAULT_DEBUG_MOVIE_ID);
    let movie = state.catalog.get_movie(movie_id, true).await?;
    Ok(Json(movie))
}

/// Catalog person record as received, with movie credits
pub async fn debug_person(
    State(state): State<AppState>,
    Query(params): Query<DebugQuery>,
) -> AppResult<Json<Option<CatalogPerson>>> {
    let person_id = params.id.unwrap_or(DEFAULT_DEBUG_PERSON_ID);
    let person = state.catalog.get_person(person_id).await?;
    Ok(Json(person))
}

async fn links_for_movie(state: &AppState, movie_id: i32) -> AppResult<Film> {
    let film = movie_lookup::film_by_id(state.catalog.as_ref(), movie_id, true).await?;
    state.enrichment.resolve_links_for_film(film, movie_id).await
}
