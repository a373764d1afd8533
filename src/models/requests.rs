//! Request DTOs for the listing endpoints
//!
//! Every field arrives as an optional string; coercion happens in the
//! listing validator, not during deserialization.

use serde::Deserialize;

use crate::listing::RawListingParams;

/// Query string of `GET /books/v1/list`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub author_letter: Option<String>,
    pub price_range: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl From<ListQuery> for RawListingParams {
    fn from(query: ListQuery) -> Self {
        Self {
            author_letter: query.author_letter,
            price_range: query.price_range,
            sort_by: query.sort_by,
            page: query.page,
            per_page: query.per_page,
        }
    }
}

/// Query string of `GET /books`.
///
/// `paged` is the ambient current page and `posts_per_page` the block's
/// page-size option.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingPageQuery {
    pub author_letter: Option<String>,
    pub price_range: Option<String>,
    pub sort_by: Option<String>,
    pub paged: Option<String>,
    pub posts_per_page: Option<String>,
}

impl From<ListingPageQuery> for RawListingParams {
    fn from(query: ListingPageQuery) -> Self {
        Self {
            author_letter: query.author_letter,
            price_range: query.price_range,
            sort_by: query.sort_by,
            page: query.paged,
            per_page: query.posts_per_page,
        }
    }
}

/// Form body of `POST /ajax/load-more-books`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadMoreForm {
    pub nonce: Option<String>,
    pub page: Option<String>,
    pub author_letter: Option<String>,
    pub price_range: Option<String>,
    pub sort_by: Option<String>,
    pub posts_per_page: Option<String>,
}

impl LoadMoreForm {
    /// Splits the token from the listing parameters.
    pub fn into_parts(self) -> (Option<String>, RawListingParams) {
        let raw = RawListingParams {
            author_letter: self.author_letter,
            price_range: self.price_range,
            sort_by: self.sort_by,
            page: self.page,
            per_page: self.posts_per_page,
        };
        (self.nonce, raw)
    }
}
