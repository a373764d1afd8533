//! Listing Module
//!
//! The filter/sort/paginate/cache pipeline behind every front door.

pub mod block;
pub mod params;
pub mod query;
pub mod render;
pub mod service;

#[cfg(test)]
mod property_tests;

pub use params::{validate, ListingParams, PriceRange, Profile, RawListingParams, SortOrder};
pub use query::{MetaField, MetaPredicate, QuerySpec, SortDirection};
pub use render::{item_renderer, install_item_renderer, BookView, ItemRenderer};
pub use service::{BookPage, ListingService, LoadMoreFragment};
