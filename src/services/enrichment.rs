use chrono::Datelike;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::{
    error::{AppError, AppResult},
    models::{Actor, Film, MovieCredit, PersonCredits},
    services::{
        actor_cache::ActorCache,
        providers::{CatalogClient, SuggestionClient},
    },
};

/// Cross-references actors and films between the catalog and the suggestion service
///
/// A credit from an actor's filmography is kept only when the suggestion service
/// knows its title under the exact search literal. Resolved actors are memoized
/// in the shared [`ActorCache`].
#[derive(Clone)]
pub struct EnrichmentService {
    catalog: Arc<dyn CatalogClient>,
    suggestions: Arc<dyn SuggestionClient>,
    cache: Arc<ActorCache>,
    lookup_permits: Arc<Semaphore>,
}

impl EnrichmentService {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        suggestions: Arc<dyn SuggestionClient>,
        cache: Arc<ActorCache>,
        max_concurrent_lookups: usize,
    ) -> Self {
        Self {
            catalog,
            suggestions,
            cache,
            lookup_permits: Arc::new(Semaphore::new(max_concurrent_lookups.max(1))),
        }
    }

    /// Fills in an actor's name, image and confirmed films
    ///
    /// The actor's own role label is kept. Cached actors are copied, never
    /// resolved twice.
    pub async fn resolve_actor(&self, mut actor: Actor) -> AppResult<Actor> {
        let actor_id = actor.id;
        let resolved = self
            .cache
            .get_or_try_insert_with(actor_id, || self.resolve_uncached(actor_id))
            .await?;

        actor.adopt(&resolved);
        Ok(actor)
    }

    /// Resolves an actor and drops `movie_id` from their films
    pub async fn resolve_links_for_actor(&self, actor_id: i32, movie_id: i32) -> AppResult<Actor> {
        let mut actor = self.resolve_actor(Actor::new(actor_id)).await?;
        actor.remove_film(movie_id);
        Ok(actor)
    }

    /// Resolves every cast entry of a film
    ///
    /// `movie_id` is removed from each actor's films, and actors left with no
    /// films are dropped. Cast order is preserved. The first failed resolution
    /// aborts the rest.
    pub async fn resolve_links_for_film(&self, mut film: Film, movie_id: i32) -> AppResult<Film> {
        let Some(cast) = film.cast.take() else {
            return Ok(film);
        };
        let cast_size = cast.len();

        let mut resolutions = JoinSet::new();
        for (index, actor) in cast.into_iter().enumerate() {
            let service = self.clone();
            resolutions.spawn(async move {
                service
                    .resolve_actor(actor)
                    .await
                    .map(|actor| (index, actor))
            });
        }

        let mut linked = Vec::with_capacity(cast_size);
        while let Some(joined) = resolutions.join_next().await {
            let (index, mut actor) = joined
                .map_err(|e| AppError::Internal(format!("Actor resolution task failed: {}", e)))??;

            actor.remove_film(movie_id);
            if !actor.films.is_empty() {
                linked.push((index, actor));
            }
        }
        linked.sort_by_key(|(index, _)| *index);

        tracing::info!(
            movie_id,
            cast = cast_size,
            linked = linked.len(),
            "Film links resolved"
        );

        film.cast = Some(linked.into_iter().map(|(_, actor)| actor).collect());
        Ok(film)
    }

    async fn resolve_uncached(&self, actor_id: i32) -> AppResult<Actor> {
        let Some(mut person) = self.catalog.get_person(actor_id).await? else {
            tracing::info!(actor_id, "Actor not found in catalog");
            return Ok(Actor::new(actor_id));
        };

        let credits = std::mem::take(&mut person.movie_credits);
        let mut actor = Actor::from(person);

        self.confirm_credits(&mut actor, credits).await?;
        actor.normalize_films();

        tracing::info!(
            actor_id,
            films = actor.films.len(),
            "Actor resolved"
        );

        Ok(actor)
    }

    /// Looks up every not-yet-resolved credit concurrently
    ///
    /// Confirmed films are appended in credit order (cast, then crew), whatever
    /// order the lookups finish in.
    async fn confirm_credits(&self, actor: &mut Actor, credits: PersonCredits) -> AppResult<()> {
        let mut lookups = JoinSet::new();

        for (index, credit) in credits.cast.into_iter().chain(credits.crew).enumerate() {
            if !actor.mark_resolved(credit.id) {
                continue;
            }

            let suggestions = self.suggestions.clone();
            let permits = self.lookup_permits.clone();
            lookups.spawn(async move {
                let _permit = permits.acquire().await;
                let film = confirm_credit(suggestions.as_ref(), &credit).await;
                (index, film)
            });
        }

        let mut confirmed = Vec::new();
        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok((index, Some(film))) => confirmed.push((index, film)),
                Ok((_, None)) => {}
                Err(e) => {
                    return Err(AppError::Internal(format!(
                        "Credit lookup task failed: {}",
                        e
                    )))
                }
            }
        }
        confirmed.sort_by_key(|(index, _)| *index);

        actor
            .films
            .extend(confirmed.into_iter().map(|(_, film)| film));
        Ok(())
    }
}

/// The title string the suggestion service is expected to know a movie by
///
/// `"{title} ({year})"` when the release date is known, otherwise `"{title}"`.
pub fn search_literal(credit: &MovieCredit) -> String {
    match credit.release_date {
        Some(date) => format!("{} ({})", credit.title, date.year()),
        None => credit.title.clone(),
    }
}

/// Returns the credit as a film if the suggestion service knows its exact title
pub async fn confirm_credit(
    suggestions: &dyn SuggestionClient,
    credit: &MovieCredit,
) -> Option<Film> {
    let literal = search_literal(credit);
    let mut response = suggestions.find_suggestions(&literal).await;
    response.purge_failures();

    response
        .has_exact_title(&literal)
        .then(|| Film::from(credit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CastMember, CatalogPerson, Credits, CrewMember, Suggestion, SuggestionResponse};
    use crate::services::providers::{MockCatalogClient, MockSuggestionClient};
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    fn credit(id: i32, title: &str, year: Option<i32>) -> MovieCredit {
        MovieCredit {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/{}.jpg", id)),
            release_date: year.and_then(|y| NaiveDate::from_ymd_opt(y, 6, 1)),
            character: None,
            job: None,
        }
    }

    fn person(id: i32, name: &str, cast: Vec<MovieCredit>, crew: Vec<MovieCredit>) -> CatalogPerson {
        CatalogPerson {
            id,
            name: name.to_string(),
            profile_path: Some(format!("/person{}.jpg", id)),
            movie_credits: PersonCredits { cast, crew },
        }
    }

    fn found(title: &str) -> SuggestionResponse {
        SuggestionResponse {
            suggestions: vec![Suggestion {
                movie_id: Some(1),
                title: Some(title.to_string()),
                popularity_rank: Some(1),
            }],
            message: String::new(),
        }
    }

    /// Suggestion service that knows exactly the given literals
    fn oracle(known: &'static [&'static str]) -> MockSuggestionClient {
        let mut suggestions = MockSuggestionClient::new();
        suggestions
            .expect_find_suggestions()
            .returning(move |search: &str| {
                if known.contains(&search) {
                    found(search)
                } else {
                    SuggestionResponse::default()
                }
            });
        suggestions
    }

    fn service(catalog: MockCatalogClient, suggestions: MockSuggestionClient) -> EnrichmentService {
        EnrichmentService::new(
            Arc::new(catalog),
            Arc::new(suggestions),
            Arc::new(ActorCache::new()),
            4,
        )
    }

    fn nolan() -> CatalogPerson {
        person(
            525,
            "Christopher Nolan",
            vec![credit(11660, "Following", Some(1998))],
            vec![
                credit(27205, "Inception", Some(2010)),
                credit(155, "The Dark Knight", Some(2008)),
                credit(999, "Untitled Project", None),
            ],
        )
    }

    #[test]
    fn test_search_literal_with_year() {
        assert_eq!(
            search_literal(&credit(27205, "Inception", Some(2010))),
            "Inception (2010)"
        );
    }

    #[test]
    fn test_search_literal_without_year() {
        assert_eq!(search_literal(&credit(1, "Untitled", None)), "Untitled");
    }

    #[tokio::test]
    async fn test_confirm_credit_ignores_failed_suggestions() {
        let mut suggestions = MockSuggestionClient::new();
        suggestions
            .expect_find_suggestions()
            .withf(|search: &str| search == "Inception (2010)")
            .times(1)
            .returning(|_| SuggestionResponse {
                suggestions: vec![
                    Suggestion {
                        movie_id: None,
                        title: Some("X".to_string()),
                        popularity_rank: None,
                    },
                    Suggestion {
                        movie_id: Some(5),
                        title: Some("Inception (2010)".to_string()),
                        popularity_rank: None,
                    },
                ],
                message: String::new(),
            });

        let film = confirm_credit(&suggestions, &credit(27205, "Inception", Some(2010))).await;

        let film = film.unwrap();
        assert_eq!(film.id, 27205);
        assert_eq!(film.release_year, 2010);
    }

    #[tokio::test]
    async fn test_confirm_credit_rejects_unmatched_id_only_entries() {
        let mut suggestions = MockSuggestionClient::new();
        suggestions.expect_find_suggestions().returning(|search: &str| SuggestionResponse {
            suggestions: vec![Suggestion {
                movie_id: None,
                title: Some(search.to_string()),
                popularity_rank: None,
            }],
            message: String::new(),
        });

        let film = confirm_credit(&suggestions, &credit(27205, "Inception", Some(2010))).await;
        assert!(film.is_none());
    }

    #[tokio::test]
    async fn test_resolve_keeps_confirmed_films_newest_first() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_get_person()
            .with(eq(525))
            .times(1)
            .returning(|_| Ok(Some(nolan())));

        let suggestions = oracle(&[
            "Following (1998)",
            "Inception (2010)",
            "Untitled Project",
        ]);

        let actor = service(catalog, suggestions)
            .resolve_actor(Actor::new(525))
            .await
            .unwrap();

        assert_eq!(actor.name.as_deref(), Some("Christopher Nolan"));
        assert_eq!(
            actor.image.as_deref(),
            Some("https://image.tmdb.org/t/p/w154/person525.jpg")
        );
        let ids: Vec<_> = actor.films.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![27205, 11660, 999]);
    }

    #[tokio::test]
    async fn test_second_resolution_hits_cache() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_get_person()
            .times(1)
            .returning(|_| Ok(Some(nolan())));

        let mut suggestions = MockSuggestionClient::new();
        suggestions
            .expect_find_suggestions()
            .times(4)
            .returning(|search: &str| found(search));

        let service = service(catalog, suggestions);
        let first = service.resolve_actor(Actor::new(525)).await.unwrap();
        let second = service.resolve_actor(Actor::new(525)).await.unwrap();

        assert_eq!(first.films, second.films);
        assert_eq!(first.films.len(), 4);
        assert_eq!(service.cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_movie_in_cast_and_crew_is_looked_up_once() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_get_person().returning(|_| {
            Ok(Some(person(
                525,
                "Christopher Nolan",
                vec![credit(11660, "Following", Some(1998))],
                vec![
                    credit(11660, "Following", Some(1998)),
                    credit(11660, "Following", Some(1998)),
                ],
            )))
        });

        let mut suggestions = MockSuggestionClient::new();
        suggestions
            .expect_find_suggestions()
            .withf(|search: &str| search == "Following (1998)")
            .times(1)
            .returning(|search: &str| found(search));

        let actor = service(catalog, suggestions)
            .resolve_actor(Actor::new(525))
            .await
            .unwrap();

        assert_eq!(actor.films.len(), 1);
    }

    #[tokio::test]
    async fn test_no_confirmed_credits_gives_empty_films() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_get_person().returning(|_| Ok(Some(nolan())));

        let actor = service(catalog, oracle(&[]))
            .resolve_actor(Actor::new(525))
            .await
            .unwrap();

        assert!(actor.films.is_empty());
        assert_eq!(actor.name.as_deref(), Some("Christopher Nolan"));
    }

    #[tokio::test]
    async fn test_unknown_person_resolves_to_empty_actor() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_get_person().returning(|_| Ok(None));

        let mut suggestions = MockSuggestionClient::new();
        suggestions.expect_find_suggestions().never();

        let actor = service(catalog, suggestions)
            .resolve_actor(Actor::new(1))
            .await
            .unwrap();

        assert_eq!(actor.id, 1);
        assert_eq!(actor.name, None);
        assert!(actor.films.is_empty());
    }

    #[tokio::test]
    async fn test_catalog_failure_propagates_and_is_not_cached() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_get_person()
            .times(2)
            .returning(|_| Err(AppError::ExternalApi("TMDB returned 503".to_string())));

        let service = service(catalog, oracle(&[]));

        assert!(service.resolve_actor(Actor::new(525)).await.is_err());
        assert!(service.resolve_actor(Actor::new(525)).await.is_err());
        assert!(service.cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_hit_keeps_callers_role_label() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_get_person().times(1).returning(|_| Ok(Some(nolan())));

        let service = service(catalog, oracle(&["Inception (2010)"]));
        service.resolve_actor(Actor::new(525)).await.unwrap();

        let mut director = Actor::new(525);
        director.title = Some("Director".to_string());
        let director = service.resolve_actor(director).await.unwrap();

        assert_eq!(director.title.as_deref(), Some("Director"));
        assert_eq!(director.films.len(), 1);
    }

    #[tokio::test]
    async fn test_links_for_actor_exclude_current_movie() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_get_person().returning(|_| Ok(Some(nolan())));

        let actor = service(catalog, oracle(&["Inception (2010)", "Following (1998)"]))
            .resolve_links_for_actor(525, 27205)
            .await
            .unwrap();

        let ids: Vec<_> = actor.films.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![11660]);
    }

    #[tokio::test]
    async fn test_links_for_film_drop_actors_without_other_films() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_get_person().returning(|id| {
            Ok(Some(match id {
                525 => nolan(),
                6193 => person(
                    6193,
                    "Leonardo DiCaprio",
                    vec![
                        credit(27205, "Inception", Some(2010)),
                        credit(597, "Titanic", Some(1997)),
                    ],
                    vec![],
                ),
                _ => person(id, "Extra", vec![credit(27205, "Inception", Some(2010))], vec![]),
            }))
        });

        let suggestions = oracle(&["Inception (2010)", "Titanic (1997)", "Following (1998)"]);

        let film = Film::from(crate::models::CatalogMovie {
            id: 27205,
            title: "Inception".to_string(),
            poster_path: None,
            release_date: NaiveDate::from_ymd_opt(2010, 7, 15),
            credits: Some(Credits {
                cast: vec![
                    CastMember {
                        id: 6193,
                        name: "Leonardo DiCaprio".to_string(),
                        profile_path: None,
                        character: Some("Cobb".to_string()),
                        popularity: 9.0,
                    },
                    CastMember {
                        id: 77,
                        name: "Extra".to_string(),
                        profile_path: None,
                        character: Some("Passenger (uncredited)".to_string()),
                        popularity: 0.1,
                    },
                ],
                crew: vec![CrewMember {
                    id: 525,
                    name: "Christopher Nolan".to_string(),
                    profile_path: None,
                    job: Some("Director".to_string()),
                    department: Some("Directing".to_string()),
                    popularity: 10.0,
                }],
            }),
        });

        let film = service(catalog, suggestions)
            .resolve_links_for_film(film, 27205)
            .await
            .unwrap();

        let cast = film.cast.unwrap();
        let ids: Vec<_> = cast.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![525, 6193]);
        assert_eq!(cast[0].title.as_deref(), Some("Director"));
        assert!(cast.iter().all(|a| a.films.iter().all(|f| f.id != 27205)));
    }

    #[tokio::test]
    async fn test_links_for_film_without_cast_is_unchanged() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_get_person().never();

        let film = Film::new(1, "Short".to_string(), None, None);
        let result = service(catalog, oracle(&[]))
            .resolve_links_for_film(film.clone(), 1)
            .await
            .unwrap();

        assert_eq!(result, film);
    }

    #[tokio::test]
    async fn test_links_for_film_fail_when_catalog_fails() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_get_person()
            .returning(|_| Err(AppError::ExternalApi("TMDB returned 500".to_string())));

        let mut film = Film::new(1, "Short".to_string(), None, None);
        film.cast = Some(vec![Actor::new(1), Actor::new(2)]);

        let result = service(catalog, oracle(&[]))
            .resolve_links_for_film(film, 1)
            .await;

        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
