use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::actor::Actor;
use super::catalog::{CatalogMovie, Credits, MovieCredit, MovieSummary};

/// CDN prefix for posters and profile pictures
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w154";

/// Crew jobs worth listing next to the cast
const HIGHLIGHTED_JOBS: [&str; 5] = [
    "Director",
    "Screenplay",
    "Original Music Composer",
    "Director of Photography",
    "Novel",
];

/// Builds a full image URL from a catalog path
pub fn image_url(path: Option<&str>) -> Option<String> {
    path.map(|p| format!("{}{}", IMAGE_BASE_URL, p))
}

/// A movie as presented to the client
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub release_date: Option<NaiveDate>,
    /// 0 when the release date is unknown
    pub release_year: i32,
    /// Notable crew then cast, only present when built from full credits
    pub cast: Option<Vec<Actor>>,
}

impl Film {
    /// Creates a film without cast information
    pub fn new(
        id: i32,
        name: String,
        poster_path: Option<&str>,
        release_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            name,
            image: image_url(poster_path),
            release_date,
            release_year: release_date.map(|d| d.year().max(0)).unwrap_or(0),
            cast: None,
        }
    }

    /// Removes a person from the cast list, if there is one
    pub fn remove_cast_member(&mut self, actor_id: i32) {
        if let Some(cast) = self.cast.as_mut() {
            cast.retain(|actor| actor.id != actor_id);
        }
    }
}

impl From<CatalogMovie> for Film {
    fn from(movie: CatalogMovie) -> Self {
        let mut film = Film::new(
            movie.id,
            movie.title,
            movie.poster_path.as_deref(),
            movie.release_date,
        );
        film.cast = movie.credits.map(rank_credits);
        film
    }
}

impl From<&MovieCredit> for Film {
    fn from(credit: &MovieCredit) -> Self {
        Film::new(
            credit.id,
            credit.title.clone(),
            credit.poster_path.as_deref(),
            credit.release_date,
        )
    }
}

impl From<MovieSummary> for Film {
    fn from(summary: MovieSummary) -> Self {
        Film::new(
            summary.id,
            summary.title,
            summary.poster_path.as_deref(),
            summary.release_date,
        )
    }
}

/// Orders a movie's credits into a single people list
///
/// Highlighted crew come first by descending popularity, then the whole cast by
/// descending popularity. Uncredited cast members are kept. A person appearing
/// twice keeps only their first entry.
fn rank_credits(credits: Credits) -> Vec<Actor> {
    let mut crew: Vec<_> = credits
        .crew
        .into_iter()
        .filter(|member| {
            member
                .job
                .as_deref()
                .is_some_and(|job| HIGHLIGHTED_JOBS.contains(&job))
        })
        .collect();
    crew.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));

    let mut cast = credits.cast;
    cast.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));

    let mut seen = HashSet::new();
    crew.into_iter()
        .map(Actor::from)
        .chain(cast.into_iter().map(Actor::from))
        .filter(|actor| seen.insert(actor.id))
        .collect()
}
