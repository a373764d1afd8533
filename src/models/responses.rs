//! Response DTOs for the listing endpoints
//!
//! JSON endpoints answer with a `{ success, data }` envelope.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::listing::{BookPage, BookView, LoadMoreFragment};

/// Message sent with every successful load-more response.
pub const BOOKS_LOADED_MESSAGE: &str = "Books loaded successfully.";

// == Envelopes ==
#[derive(Debug, Clone, Serialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorData {
    pub message: String,
}

/// Failure envelope: `{ success: false, data: { message } }`.
pub type ErrorEnvelope = ApiEnvelope<ErrorData>;

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: ErrorData {
                message: message.into(),
            },
        }
    }
}

// == REST List ==
#[derive(Debug, Clone, Serialize)]
pub struct BookJson {
    pub id: u64,
    pub title: String,
    pub permalink: String,
    pub thumbnail: Option<String>,
    pub excerpt: String,
    pub author_name: String,
    pub price: Option<f64>,
    pub publish_date: Option<String>,
    pub formatted_price: String,
    pub formatted_date: String,
}

impl From<BookView> for BookJson {
    fn from(view: BookView) -> Self {
        Self {
            id: view.id,
            title: view.title,
            permalink: view.permalink,
            thumbnail: view.thumbnail_url,
            excerpt: view.excerpt,
            author_name: view.author_name,
            price: view.price,
            publish_date: view.publish_date,
            formatted_price: view.formatted_price,
            formatted_date: view.formatted_date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookListData {
    pub books: Vec<BookJson>,
    pub total: u64,
    pub pages: u32,
    pub current_page: u32,
}

impl From<BookPage> for BookListData {
    fn from(page: BookPage) -> Self {
        Self {
            books: page.books.into_iter().map(BookJson::from).collect(),
            total: page.total,
            pages: page.pages,
            current_page: page.current_page,
        }
    }
}

// == Load More ==
#[derive(Debug, Clone, Serialize)]
pub struct LoadMoreData {
    pub html: String,
    pub max_pages: u32,
    pub current_page: u32,
    pub found: u64,
    pub post_count: usize,
    pub message: String,
}

impl From<LoadMoreFragment> for LoadMoreData {
    fn from(fragment: LoadMoreFragment) -> Self {
        Self {
            html: fragment.html,
            max_pages: fragment.max_pages,
            current_page: fragment.current_page,
            found: fragment.found,
            post_count: fragment.post_count,
            message: BOOKS_LOADED_MESSAGE.to_string(),
        }
    }
}

// == Cache Admin ==
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub count: usize,
    pub size: usize,
    pub size_human: String,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            size_human: stats.size_human(),
            hit_rate: stats.hit_rate(),
            count: stats.count,
            size: stats.size,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheClearedResponse {
    pub cleared: usize,
    pub message: String,
}

impl CacheClearedResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            cleared,
            message: format!("Cleared {} cached listings", cleared),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
