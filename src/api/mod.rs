//! API Module
//!
//! HTTP handlers and routing for the book listing service.
//!
//! # Endpoints
//! - `GET /books` - Listing page (path configurable)
//! - `GET /books/v1/list` - REST list
//! - `POST /ajax/load-more-books` - Load-more fragment
//! - `GET /assets/book-listing.js` - Client script
//! - `GET /cache/stats`, `DELETE /cache` - Cache administration
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
