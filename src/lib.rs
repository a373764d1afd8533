//! Book Listing - a filterable, paginated book catalogue service
//!
//! Serves a cached listing block with author, price and sort filters, a JSON
//! list endpoint and a token-protected load-more endpoint over one shared
//! validate → query → render pipeline.

pub mod api;
pub mod books;
pub mod cache;
pub mod config;
pub mod error;
pub mod listing;
pub mod models;
pub mod nonce;
pub mod tasks;

pub use api::{create_router, AppState};
pub use books::{Book, ContentStore, InMemoryBookStore, NewBook};
pub use config::Config;
pub use error::{ListingError, Result};
pub use listing::{ItemRenderer, ListingService};
pub use nonce::NonceIssuer;
pub use tasks::spawn_cleanup_task;
