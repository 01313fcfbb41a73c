use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::catalog::{CastMember, CatalogPerson, CrewMember};
use super::film::{image_url, Film};

/// A person linked to films, as presented to the client
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: i32,
    pub name: Option<String>,
    /// Character played or job held, depending on where the actor came from
    pub title: Option<String>,
    pub image: Option<String>,
    /// Films confirmed by the suggestion service
    #[serde(rename = "movies")]
    pub films: Vec<Film>,
    /// Movie ids already cross-referenced for this instance
    #[serde(skip)]
    resolved: HashSet<i32>,
}

impl Actor {
    /// Creates an unresolved actor shell
    pub fn new(id: i32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    fn with_details(
        id: i32,
        name: String,
        profile_path: Option<&str>,
        title: Option<String>,
    ) -> Self {
        Self {
            id,
            name: Some(name),
            title,
            image: image_url(profile_path),
            films: Vec::new(),
            resolved: HashSet::new(),
        }
    }

    /// Marks a movie as looked up. Returns false if it already was.
    pub fn mark_resolved(&mut self, movie_id: i32) -> bool {
        self.resolved.insert(movie_id)
    }

    /// Dedupes films by id, keeping the first, then orders newest first
    ///
    /// Films with no release date sort last.
    pub fn normalize_films(&mut self) {
        let mut seen = HashSet::new();
        self.films.retain(|film| seen.insert(film.id));
        self.films.sort_by(|a, b| b.release_date.cmp(&a.release_date));
    }

    pub fn remove_film(&mut self, movie_id: i32) {
        self.films.retain(|film| film.id != movie_id);
    }

    /// Copy suitable for the actor cache: no role label, no lookup state
    pub fn snapshot(&self) -> Actor {
        Actor {
            id: self.id,
            name: self.name.clone(),
            title: None,
            image: self.image.clone(),
            films: self.films.clone(),
            resolved: HashSet::new(),
        }
    }

    /// Takes name, image and films from an already resolved actor
    pub fn adopt(&mut self, resolved: &Actor) {
        self.name = resolved.name.clone();
        self.image = resolved.image.clone();
        self.films = resolved.films.clone();
    }
}

impl From<CastMember> for Actor {
    fn from(member: CastMember) -> Self {
        Actor::with_details(
            member.id,
            member.name,
            member.profile_path.as_deref(),
            member.character,
        )
    }
}

impl From<CrewMember> for Actor {
    fn from(member: CrewMember) -> Self {
        Actor::with_details(member.id, member.name, member.profile_path.as_deref(), member.job)
    }
}

impl From<CatalogPerson> for Actor {
    fn from(person: CatalogPerson) -> Self {
        Actor::with_details(person.id, person.name, person.profile_path.as_deref(), None)
    }
}
