/// TMDB (The Movie Database) catalog provider
///
/// API Flow:
/// 1. Movie lookup: /movie/{id} with optional `append_to_response=credits`
/// 2. Title search: /search/movie, first page only
/// 3. Person lookup: /person/{id} with `append_to_response=movie_credits`
///
/// A 404 from TMDB is reported as "no match", not as an error.
use crate::{
    error::{AppError, AppResult},
    models::{CatalogMovie, CatalogPerson, MovieSummary, SearchResults},
    services::providers::CatalogClient,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "TMDB API key cannot be empty".to_string(),
            ));
        }

        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a TMDB resource, mapping 404 to `None`
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<Option<T>> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(path = %path, "TMDB resource not found");
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let body = response.json::<T>().await?;
        Ok(Some(body))
    }
}

/// Query parameters for a title search
fn search_params(name: &str, year: i32) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("query", name.to_string()),
        ("page", "1".to_string()),
        ("include_adult", "false".to_string()),
    ];

    if year != 0 {
        params.push(("primary_release_year", year.to_string()));
    }

    params
}

#[async_trait::async_trait]
impl CatalogClient for TmdbProvider {
    async fn get_movie(&self, id: i32, include_credits: bool) -> AppResult<Option<CatalogMovie>> {
        let params = if include_credits {
            vec![("append_to_response", "credits".to_string())]
        } else {
            Vec::new()
        };

        let movie: Option<CatalogMovie> =
            self.get_json(&format!("/movie/{}", id), &params).await?;

        tracing::debug!(
            movie_id = id,
            found = movie.is_some(),
            include_credits,
            provider = "tmdb",
            "Movie fetched"
        );

        Ok(movie)
    }

    async fn search_movies(&self, name: &str, year: i32) -> AppResult<Vec<MovieSummary>> {
        let results: Option<SearchResults> = self
            .get_json("/search/movie", &search_params(name, year))
            .await?;

        let results = results.map(|r| r.results).unwrap_or_default();

        tracing::info!(
            query = %name,
            year,
            results = results.len(),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(results)
    }

    async fn get_person(&self, id: i32) -> AppResult<Option<CatalogPerson>> {
        let params = [("append_to_response", "movie_credits".to_string())];
        let person: Option<CatalogPerson> =
            self.get_json(&format!("/person/{}", id), &params).await?;

        if let Some(person) = &person {
            tracing::debug!(
                person_id = id,
                cast_credits = person.movie_credits.cast.len(),
                crew_credits = person.movie_credits.crew.len(),
                provider = "tmdb",
                "Person fetched"
            );
        }

        Ok(person)
    }
}
