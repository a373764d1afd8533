//! API Routes
//!
//! Configures the Axum router with the listing endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, clear_cache_handler, health_handler, list_books_handler,
    listing_page_handler, listing_script_handler, load_more_handler, AppState, LOAD_MORE_PATH,
    REST_LIST_PATH,
};
use crate::listing::block::LISTING_SCRIPT_PATH;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET <listing_path>` - Listing page with filter form (default `/books`)
/// - `GET /books/v1/list` - Filtered page of books as JSON
/// - `POST /ajax/load-more-books` - Rendered items for the next page
/// - `GET /assets/book-listing.js` - Client script
/// - `GET /cache/stats` - Listing cache statistics
/// - `DELETE /cache` - Drop every cached listing
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let listing_path = state.listing.listing_path().to_string();

    Router::new()
        .route(&listing_path, get(listing_page_handler))
        .route(REST_LIST_PATH, get(list_books_handler))
        .route(LOAD_MORE_PATH, post(load_more_handler))
        .route(LISTING_SCRIPT_PATH, get(listing_script_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
