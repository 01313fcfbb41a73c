use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// TMDB API Types
// ============================================================================

/// Movie record from `GET /movie/{id}`
///
/// `credits` is only present when the request appended `credits`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogMovie {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_release_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

/// Cast and crew attached to a movie
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewMember {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

/// Row of a `GET /search/movie` response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_release_date")]
    pub release_date: Option<NaiveDate>,
}

/// Paged search envelope; only the first page is ever requested
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_results: u32,
}

/// Person record from `GET /person/{id}?append_to_response=movie_credits`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogPerson {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub movie_credits: PersonCredits,
}

/// A person's filmography, split by the kind of role held
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonCredits {
    #[serde(default)]
    pub cast: Vec<MovieCredit>,
    #[serde(default)]
    pub crew: Vec<MovieCredit>,
}

/// Credit stub: a movie from a person's filmography
///
/// Cast stubs carry `character`, crew stubs carry `job`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieCredit {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_release_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

/// TMDB sends unknown release dates as `""` as often as `null`.
fn deserialize_release_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}
