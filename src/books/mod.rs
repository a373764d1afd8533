//! Books Module
//!
//! The book record and the content store that owns it.

mod model;
mod store;

pub use model::{Book, BookMetaInput, NewBook};
pub use store::{ContentStore, InMemoryBookStore, QueryResult};
