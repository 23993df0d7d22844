use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::error::panic_response;
use crate::middleware::{make_span_with_session, session_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/movies", get(handlers::get_movie))
        .route("/movies/popular", get(handlers::popular_movies))
        // Recommendations, paginated per session
        .route("/recommendations", get(handlers::recommendations))
        .route("/recommendations/next", post(handlers::next_page))
        .route("/recommendations/previous", post(handlers::previous_page));

    with_middleware(routes).with_state(state)
}

/// Session, tracing, CORS and panic handling shared by every route
fn with_middleware(router: Router<AppState>) -> Router<AppState> {
    router.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(session_middleware))
            .layer(TraceLayer::new_for_http().make_span_with(make_span_with_session))
            .layer(CorsLayer::permissive())
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}
