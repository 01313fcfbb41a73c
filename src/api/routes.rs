use axum::{
    http::{HeaderName, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{
    make_span_with_request_id, request_id_middleware, REQUEST_ID_HEADER,
};

/// Creates the main API router with all routes
///
/// `allowed_origin` is the single origin the CORS layer accepts, with any method
/// and any request header. An unparsable value disables cross-origin access.
pub fn create_router(state: AppState, allowed_origin: &str) -> Router {
    let cors = match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]),
        Err(_) => {
            tracing::warn!(origin = %allowed_origin, "Ignoring invalid CORS origin");
            CorsLayer::new()
        }
    };

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/MovieFun", movie_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(cors),
        )
        .with_state(state)
}

/// Movie and actor routes under /MovieFun
fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/GetMovieByName", get(handlers::get_movie_by_name))
        .route("/GetLinksForActor", get(handlers::get_links_for_actor))
        .route("/GetLinksByName", get(handlers::get_links_by_name))
        .route("/GetLinks", get(handlers::get_links))
        .route("/GetMovie", get(handlers::get_movie))
        .route("/GetSuggestions", get(handlers::get_suggestions))
        .route("/GetActor", get(handlers::get_actor))
        .route("/DebugMovie", get(handlers::debug_movie))
        .route("/DebugPerson", get(handlers::debug_person))
}
