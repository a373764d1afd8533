//! API Handlers
//!
//! HTTP request handlers for the listing page, the REST list, the load-more
//! endpoint and cache administration.

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::header,
    response::{Html, IntoResponse},
    Form, Json,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::books::ContentStore;
use crate::cache::{CacheStore, ListingCache};
use crate::config::Config;
use crate::error::{ListingError, Result};
use crate::listing::block::render_listing_page;
use crate::listing::ListingService;
use crate::models::{
    ApiEnvelope, BookListData, CacheClearedResponse, CacheStatsResponse, HealthResponse,
    ListQuery, ListingPageQuery, LoadMoreData, LoadMoreForm,
};
use crate::nonce::{NonceIssuer, LOAD_MORE_ACTION};

/// Route of the load-more endpoint.
pub const LOAD_MORE_PATH: &str = "/ajax/load-more-books";

/// Route of the REST list endpoint.
pub const REST_LIST_PATH: &str = "/books/v1/list";

/// Client script driving the filter form and the load-more control.
pub const LISTING_SCRIPT: &str = include_str!("../../assets/book-listing.js");

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub listing: ListingService,
    pub nonces: Arc<NonceIssuer>,
}

impl AppState {
    pub fn new(listing: ListingService, nonces: NonceIssuer) -> Self {
        Self {
            listing,
            nonces: Arc::new(nonces),
        }
    }

    /// Wires the listing service, cache and token issuer from configuration.
    pub fn from_config(config: &Config, store: Arc<dyn ContentStore>) -> Result<Self> {
        let cache_store = Arc::new(RwLock::new(CacheStore::new(config.max_cache_entries)));
        let listing = ListingService::new(
            store,
            ListingCache::new(cache_store),
            config.listing_path.clone(),
        );
        let nonces = match &config.nonce_secret {
            Some(secret) => NonceIssuer::new(secret.as_bytes(), config.nonce_lifetime)?,
            None => NonceIssuer::random(config.nonce_lifetime)?,
        };
        Ok(Self::new(listing, nonces))
    }

    /// The transient store behind the listing cache.
    pub fn cache_store(&self) -> Arc<RwLock<CacheStore>> {
        self.listing.cache().store()
    }
}

/// Handler for GET /books
///
/// Serves the cached listing block inside a page carrying a fresh token.
pub async fn listing_page_handler(
    State(state): State<AppState>,
    Query(query): Query<ListingPageQuery>,
) -> Result<Html<String>> {
    let block = state.listing.render_listing(&query.into()).await?;
    let nonce = state.nonces.create(LOAD_MORE_ACTION);
    Ok(Html(render_listing_page(&block, LOAD_MORE_PATH, &nonce)?))
}

/// Handler for GET /books/v1/list
///
/// Returns a page of books as JSON. No matches is still a success.
pub async fn list_books_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiEnvelope<BookListData>>> {
    let page = state.listing.list_books(&query.into()).await?;
    Ok(Json(ApiEnvelope::ok(page.into())))
}

/// Handler for POST /ajax/load-more-books
///
/// Checks the anti-forgery token before any listing work, then returns the
/// rendered items of the requested page.
pub async fn load_more_handler(
    State(state): State<AppState>,
    form: std::result::Result<Form<LoadMoreForm>, FormRejection>,
) -> Result<Json<ApiEnvelope<LoadMoreData>>> {
    let Form(form) = form.map_err(|rejection| ListingError::Validation(rejection.body_text()))?;
    let (nonce, raw) = form.into_parts();

    state.nonces.verify(LOAD_MORE_ACTION, nonce.as_deref())?;

    let fragment = state.listing.load_more(&raw).await?;
    debug!(
        page = fragment.current_page,
        post_count = fragment.post_count,
        "load more served"
    );
    Ok(Json(ApiEnvelope::ok(fragment.into())))
}

/// Handler for GET /assets/book-listing.js
pub async fn listing_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        LISTING_SCRIPT,
    )
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(state.listing.cache().stats().await.into())
}

/// Handler for DELETE /cache
///
/// Drops every cached listing so the next requests re-query the store.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<CacheClearedResponse> {
    let cleared = state.listing.cache().clear_all().await;
    tracing::info!(cleared, "listing cache cleared");
    Json(CacheClearedResponse::new(cleared))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::{InMemoryBookStore, NewBook};

    async fn state() -> AppState {
        let store = InMemoryBookStore::new();
        store
            .insert(NewBook::new("It").author("King").price(120.0).published("2020-01-01"))
            .await
            .unwrap();
        let config = Config {
            nonce_secret: Some("handler-tests".into()),
            ..Config::default()
        };
        AppState::from_config(&config, Arc::new(store)).unwrap()
    }

    #[tokio::test]
    async fn test_list_books_handler() {
        let state = state().await;
        let Json(envelope) = list_books_handler(State(state), Query(ListQuery::default()))
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.data.total, 1);
        assert_eq!(envelope.data.books[0].title, "It");
    }

    #[tokio::test]
    async fn test_load_more_requires_token() {
        let state = state().await;
        let form = LoadMoreForm {
            page: Some("1".into()),
            ..LoadMoreForm::default()
        };

        let result = load_more_handler(State(state), Ok(Form(form))).await;
        assert!(matches!(result, Err(ListingError::Authenticity(_))));
    }

    #[tokio::test]
    async fn test_load_more_with_valid_token() {
        let state = state().await;
        let form = LoadMoreForm {
            nonce: Some(state.nonces.create(LOAD_MORE_ACTION)),
            page: Some("1".into()),
            ..LoadMoreForm::default()
        };

        let Json(envelope) = load_more_handler(State(state), Ok(Form(form)))
            .await
            .unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.found, 1);
        assert_eq!(envelope.data.post_count, 1);
        assert!(envelope.data.html.contains("book-item"));
    }

    #[tokio::test]
    async fn test_listing_page_embeds_block_and_token() {
        let state = state().await;
        let Html(page) = listing_page_handler(State(state), Query(ListingPageQuery::default()))
            .await
            .unwrap();

        assert!(page.contains("book-filters-form"));
        assert!(page.contains("data-nonce="));
    }

    #[tokio::test]
    async fn test_clear_cache_handler() {
        let state = state().await;
        listing_page_handler(State(state.clone()), Query(ListingPageQuery::default()))
            .await
            .unwrap();

        let Json(stats) = cache_stats_handler(State(state.clone())).await;
        assert_eq!(stats.count, 1);

        let Json(cleared) = clear_cache_handler(State(state)).await;
        assert_eq!(cleared.cleared, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
