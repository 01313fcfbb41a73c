use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::AppResult;
use crate::services::{
    providers::{
        suggestions::SuggestionServiceClient, tmdb::TmdbProvider, CatalogClient, SuggestionClient,
    },
    ActorCache, EnrichmentService,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogClient>,
    pub suggestions: Arc<dyn SuggestionClient>,
    pub enrichment: EnrichmentService,
    pub actor_cache: Arc<ActorCache>,
}

impl AppState {
    /// Wires the given clients to a fresh actor cache
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        suggestions: Arc<dyn SuggestionClient>,
        max_concurrent_lookups: usize,
    ) -> Self {
        let actor_cache = Arc::new(ActorCache::new());
        let enrichment = EnrichmentService::new(
            catalog.clone(),
            suggestions.clone(),
            actor_cache.clone(),
            max_concurrent_lookups,
        );

        Self {
            catalog,
            suggestions,
            enrichment,
            actor_cache,
        }
    }

    /// Builds the TMDB and suggestion clients described by the configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let timeout = Duration::from_secs(config.http_timeout_secs);

        let catalog = TmdbProvider::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            timeout,
        )?;
        let suggestions = SuggestionServiceClient::new(config.suggestion_api_url.clone(), timeout)?;

        Ok(Self::new(
            Arc::new(catalog),
            Arc::new(suggestions),
            config.max_concurrent_lookups,
        ))
    }
}
