//! Request and Response models for the listing service
//!
//! DTOs used for serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

pub use requests::{ListQuery, ListingPageQuery, LoadMoreForm};
pub use responses::{
    ApiEnvelope, BookJson, BookListData, CacheClearedResponse, CacheStatsResponse, ErrorData,
    ErrorEnvelope, HealthResponse, LoadMoreData, BOOKS_LOADED_MESSAGE,
};
