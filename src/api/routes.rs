use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/movies/trending", get(handlers::trending))
        .route("/movies/popular", get(handlers::popular))
        .route("/movies/top-rated", get(handlers::top_rated))
        .route("/movies/now-playing", get(handlers::now_playing))
        .route("/movies/upcoming", get(handlers::upcoming))
        .route("/movies/search", get(handlers::search))
        .route("/movies/browse", get(handlers::browse))
        .route("/movies/:id", get(handlers::movie_details))
        .route("/movies/:id/recommendations", get(handlers::recommendations))
        .route("/movies/:id/similar", get(handlers::similar))
        .route("/genres", get(handlers::genres))
        .route("/genres/:id/movies", get(handlers::movies_by_genre))
        .route("/home", get(handlers::home))
        // Auth
        .route("/auth/sign-in", post(handlers::sign_in))
        .route("/auth/sign-up", post(handlers::sign_up))
        .route("/auth/sign-out", post(handlers::sign_out))
        // Profile
        .route("/profile", get(handlers::get_profile))
        .route("/profile/bookmarks", get(handlers::get_bookmarks))
        .route("/profile/bookmarks/movies", get(handlers::bookmarked_movies))
        .route("/profile/bookmarks/:id", get(handlers::bookmark_status))
        .route("/profile/bookmarks/:id/toggle", post(handlers::toggle_bookmark))
        .route("/profile/history", get(handlers::get_history))
        .route(
            "/profile/history/:id",
            get(handlers::get_progress).put(handlers::update_progress),
        )
        .route("/profile/preferences", put(handlers::update_preferences))
        .route("/profile/flush", post(handlers::flush))
}
