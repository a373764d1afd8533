//! Content Store
//!
//! The system of record for books. The listing pipeline only talks to the
//! [`ContentStore`] trait; [`InMemoryBookStore`] is the implementation the
//! service ships with.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::books::model::{
    check_price, clean_optional_text, parse_price, Book, BookMetaInput, NewBook,
};
use crate::error::{ListingError, Result};
use crate::listing::query::{
    MetaField, MetaPredicate, QuerySpec, SortDirection, BOOK_CONTENT_TYPE,
};

// == Query Result ==
/// One page of matches plus the totals needed for pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub books: Vec<Book>,
    /// Matches across all pages
    pub found: u64,
    /// Pages needed to show every match at the requested page size
    pub max_pages: u32,
}

impl QueryResult {
    /// Number of books on this page.
    pub fn post_count(&self) -> usize {
        self.books.len()
    }
}

// == Content Store Trait ==
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Executes a query spec.
    async fn query(&self, spec: &QuerySpec) -> Result<QueryResult>;

    async fn get(&self, id: u64) -> Result<Book>;

    async fn insert(&self, book: NewBook) -> Result<Book>;

    /// Updates the custom fields of an existing book.
    async fn save_meta(&self, id: u64, meta: BookMetaInput) -> Result<Book>;
}

// == In-Memory Store ==
/// Books held in id order behind an async lock.
#[derive(Debug)]
pub struct InMemoryBookStore {
    books: RwLock<BTreeMap<u64, Book>>,
    next_id: AtomicU64,
    queries: AtomicU64,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self {
            books: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            queries: AtomicU64::new(0),
        }
    }

    /// Builds a store from a JSON array of books.
    pub async fn from_seed_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            ListingError::Internal(format!("reading seed file {}: {}", path.display(), e))
        })?;
        let seed: Vec<NewBook> = serde_json::from_str(&raw).map_err(|e| {
            ListingError::Internal(format!("parsing seed file {}: {}", path.display(), e))
        })?;

        let store = Self::new();
        let count = seed.len();
        for book in seed {
            store.insert(book).await?;
        }
        info!("Seeded {} books from {}", count, path.display());
        Ok(store)
    }

    /// How many queries have been executed, for observing cache behaviour.
    pub fn query_count(&self) -> u64 {
        self.queries.load(AtomicOrdering::Relaxed)
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }
}

impl Default for InMemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryBookStore {
    async fn query(&self, spec: &QuerySpec) -> Result<QueryResult> {
        self.queries.fetch_add(1, AtomicOrdering::Relaxed);

        let page_size = spec.pagination.page_size.max(1) as usize;
        if spec.content_type != BOOK_CONTENT_TYPE {
            return Ok(QueryResult {
                books: Vec::new(),
                found: 0,
                max_pages: 0,
            });
        }

        let books = self.books.read().await;
        let mut matches: Vec<&Book> = books
            .values()
            .filter(|book| spec.filters.iter().all(|p| predicate_matches(p, book)))
            .collect();

        matches.sort_by(|a, b| {
            let primary = sort_text(a, spec.sort.field).cmp(&sort_text(b, spec.sort.field));
            let primary = match spec.sort.direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });

        let found = matches.len();
        let max_pages = found.div_ceil(page_size) as u32;
        let offset = (spec.pagination.page.max(1) as usize - 1).saturating_mul(page_size);

        let page: Vec<Book> = matches
            .into_iter()
            .skip(offset)
            .take(page_size)
            .cloned()
            .collect();

        debug!(
            found,
            returned = page.len(),
            page = spec.pagination.page,
            "book query executed"
        );

        Ok(QueryResult {
            books: page,
            found: found as u64,
            max_pages,
        })
    }

    async fn get(&self, id: u64) -> Result<Book> {
        self.books
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| ListingError::NotFound(format!("book {}", id)))
    }

    async fn insert(&self, book: NewBook) -> Result<Book> {
        let title = clean_optional_text(&book.title)
            .ok_or_else(|| ListingError::Validation("Book title cannot be empty".into()))?;
        let price = check_price(book.price)?;

        let id = self.next_id.fetch_add(1, AtomicOrdering::Relaxed);
        let record = Book {
            id,
            title,
            excerpt: book.excerpt.trim().to_string(),
            permalink: book
                .permalink
                .unwrap_or_else(|| format!("/books/{}", id)),
            thumbnail_url: book.thumbnail_url.filter(|url| !url.trim().is_empty()),
            author_name: book
                .author_name
                .as_deref()
                .and_then(clean_optional_text)
                .unwrap_or_default(),
            price,
            publish_date: book.publish_date.as_deref().and_then(clean_optional_text),
        };

        self.books.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn save_meta(&self, id: u64, meta: BookMetaInput) -> Result<Book> {
        // Parse before taking the lock so a bad price leaves the record untouched.
        let price = meta.price.as_deref().map(parse_price).transpose()?;

        let mut books = self.books.write().await;
        let book = books
            .get_mut(&id)
            .ok_or_else(|| ListingError::NotFound(format!("book {}", id)))?;

        if let Some(author) = meta.author_name.as_deref() {
            book.author_name = clean_optional_text(author).unwrap_or_default();
        }
        if let Some(price) = price {
            book.price = price;
        }
        if let Some(date) = meta.publish_date.as_deref() {
            book.publish_date = clean_optional_text(date);
        }

        Ok(book.clone())
    }
}

// == Predicate Evaluation ==
fn field_text(book: &Book, field: MetaField) -> Option<String> {
    match field {
        MetaField::AuthorName => Some(book.author_name.clone()).filter(|s| !s.is_empty()),
        MetaField::Price => book.price.map(|p| p.to_string()),
        MetaField::PublishDate => book.publish_date.clone(),
    }
}

fn field_number(book: &Book, field: MetaField) -> Option<f64> {
    match field {
        MetaField::Price => book.price,
        other => field_text(book, other).and_then(|s| s.trim().parse().ok()),
    }
}

fn predicate_matches(predicate: &MetaPredicate, book: &Book) -> bool {
    match predicate {
        MetaPredicate::StartsWith { field, prefix } => {
            field_text(book, *field).is_some_and(|value| value.starts_with(prefix.as_str()))
        }
        MetaPredicate::Between { field, low, high } => field_number(book, *field)
            .is_some_and(|value| {
                value.partial_cmp(low) != Some(Ordering::Less)
                    && value.partial_cmp(high) != Some(Ordering::Greater)
            }),
    }
}

/// Missing values sort as the empty string.
fn sort_text(book: &Book, field: MetaField) -> String {
    field_text(book, field).unwrap_or_default()
}
