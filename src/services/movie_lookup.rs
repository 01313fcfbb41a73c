use crate::{
    error::AppResult,
    models::Film,
    services::{name_year::parse_name_year, providers::CatalogClient},
};

/// Fetches a movie as a film, falling back to an empty film when the catalog has no match
pub async fn film_by_id(
    catalog: &dyn CatalogClient,
    movie_id: i32,
    include_credits: bool,
) -> AppResult<Film> {
    let film = catalog
        .get_movie(movie_id, include_credits)
        .await?
        .map(Film::from)
        .unwrap_or_default();

    Ok(film)
}

/// Fetches a movie with its credits, minus one person
pub async fn film_without_member(
    catalog: &dyn CatalogClient,
    movie_id: i32,
    actor_id: i32,
) -> AppResult<Film> {
    let mut film = film_by_id(catalog, movie_id, true).await?;
    film.remove_cast_member(actor_id);
    Ok(film)
}

/// Resolves a `"Title (Year)"` query to the id of the catalog's first match
pub async fn find_movie_id(catalog: &dyn CatalogClient, name_year: &str) -> AppResult<Option<i32>> {
    let query = parse_name_year(name_year)?;
    let results = catalog.search_movies(&query.name, query.year).await?;

    if results.is_empty() {
        tracing::info!(query = %name_year, "No catalog match");
    }

    Ok(results.first().map(|movie| movie.id))
}

/// Looks up a movie by `"Title (Year)"` and returns it with credits
pub async fn film_by_name(catalog: &dyn CatalogClient, name_year: &str) -> AppResult<Film> {
    match find_movie_id(catalog, name_year).await? {
        Some(movie_id) => film_by_id(catalog, movie_id, true).await,
        None => Ok(Film::default()),
    }
}
