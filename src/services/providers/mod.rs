/// External data providers
///
/// The catalog (TMDB) supplies movie and person records. The suggestion service is
/// used only to confirm that a movie title is known under an exact string.
use crate::{
    error::AppResult,
    models::{CatalogMovie, CatalogPerson, MovieSummary, SuggestionResponse},
};

pub mod suggestions;
pub mod tmdb;

/// Trait for movie metadata catalogs
///
/// `Ok(None)` and empty lists mean the catalog has no match, which is a normal
/// outcome. `Err` is reserved for transport failures and unexpected statuses.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch a movie by id, optionally with its cast and crew
    async fn get_movie(&self, id: i32, include_credits: bool) -> AppResult<Option<CatalogMovie>>;

    /// Search movies by title. A year of 0 leaves the search unfiltered.
    async fn search_movies(&self, name: &str, year: i32) -> AppResult<Vec<MovieSummary>>;

    /// Fetch a person together with their movie credit stubs
    async fn get_person(&self, id: i32) -> AppResult<Option<CatalogPerson>>;
}

/// Trait for the title suggestion service
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SuggestionClient: Send + Sync {
    /// Look up suggestions for a title
    ///
    /// Never fails: any error yields an empty response. Suggestions without a
    /// movie id are already removed.
    async fn find_suggestions(&self, search: &str) -> SuggestionResponse;
}
