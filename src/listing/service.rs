//! Listing Pipeline
//!
//! validate → (cache) → query → render, shared by the three front doors.
//! Each door is a profile of the same pipeline: the listing block reads and
//! fills the cache, the REST list and load-more doors always go to the store.

use std::sync::Arc;

use tracing::{debug, info};

use crate::books::ContentStore;
use crate::cache::ListingCache;
use crate::error::Result;
use crate::listing::block::render_listing_block;
use crate::listing::params::{validate, ListingParams, Profile, RawListingParams};
use crate::listing::query::QuerySpec;
use crate::listing::render::{item_renderer, BookView};

// == Results ==
/// One page of the REST list.
#[derive(Debug, Clone, PartialEq)]
pub struct BookPage {
    pub books: Vec<BookView>,
    pub total: u64,
    pub pages: u32,
    pub current_page: u32,
}

/// One page of rendered items for the load-more control.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadMoreFragment {
    pub html: String,
    pub max_pages: u32,
    pub current_page: u32,
    pub found: u64,
    pub post_count: usize,
}

// == Listing Service ==
#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn ContentStore>,
    cache: ListingCache,
    listing_path: String,
}

impl ListingService {
    pub fn new(store: Arc<dyn ContentStore>, cache: ListingCache, listing_path: impl Into<String>) -> Self {
        Self {
            store,
            cache,
            listing_path: listing_path.into(),
        }
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    pub fn store(&self) -> Arc<dyn ContentStore> {
        Arc::clone(&self.store)
    }

    pub fn listing_path(&self) -> &str {
        &self.listing_path
    }

    // == Listing Block ==
    /// Full listing block markup, served from the cache when possible.
    pub async fn render_listing(&self, raw: &RawListingParams) -> Result<String> {
        let params = validate(raw, Profile::ListingBlock)?;

        if let Some(markup) = self.cache.get(&params).await {
            debug!(page = params.page, "listing block served from cache");
            return Ok(markup);
        }

        let markup = self.render_block_uncached(&params).await?;
        self.cache.set(&params, markup.clone()).await;
        info!(
            author_letter = %params.author_letter,
            price_range = params.price_range.as_str(),
            sort_by = %params.sort_by,
            page = params.page,
            "listing block rendered and cached"
        );
        Ok(markup)
    }

    async fn render_block_uncached(&self, params: &ListingParams) -> Result<String> {
        let spec = QuerySpec::from_params(params);
        let result = self.store.query(&spec).await?;
        render_listing_block(params, &result, &self.listing_path, &item_renderer())
    }

    // == REST List ==
    /// Structured page of books; never cached.
    pub async fn list_books(&self, raw: &RawListingParams) -> Result<BookPage> {
        let params = validate(raw, Profile::RestList)?;
        let result = self.store.query(&QuerySpec::from_params(&params)).await?;

        let renderer = item_renderer();
        Ok(BookPage {
            books: result.books.iter().map(|book| renderer.view(book)).collect(),
            total: result.found,
            pages: result.max_pages,
            current_page: params.page,
        })
    }

    // == Load More ==
    /// Rendered items for one further page; never cached.
    ///
    /// A page below one fails validation before the store is touched.
    pub async fn load_more(&self, raw: &RawListingParams) -> Result<LoadMoreFragment> {
        let params = validate(raw, Profile::LoadMore)?;
        let result = self.store.query(&QuerySpec::from_params(&params)).await?;

        Ok(LoadMoreFragment {
            html: item_renderer().render_items(&result.books)?,
            max_pages: result.max_pages,
            current_page: params.page,
            found: result.found,
            post_count: result.post_count(),
        })
    }
}
