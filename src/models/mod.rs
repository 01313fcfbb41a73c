pub mod actor;
pub mod catalog;
pub mod film;
pub mod suggestion;

pub use actor::Actor;
pub use catalog::{
    CastMember, CatalogMovie, CatalogPerson, Credits, CrewMember, MovieCredit, MovieSummary,
    PersonCredits, SearchResults,
};
pub use film::{image_url, Film, IMAGE_BASE_URL};
pub use suggestion::{Suggestion, SuggestionResponse};
