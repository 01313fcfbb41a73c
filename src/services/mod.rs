pub mod actor_cache;
pub mod enrichment;
pub mod movie_lookup;
pub mod name_year;
pub mod providers;

pub use actor_cache::ActorCache;
pub use enrichment::EnrichmentService;
