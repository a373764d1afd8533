//! Item Renderer
//!
//! Formats one book for display: a structured [`BookView`] for JSON callers
//! and an HTML fragment for the listing block and the load-more endpoint.
//! Missing optional fields simply drop their line.

use std::fmt::Write;
use std::sync::Arc;

use askama::Template;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::OnceCell;

use crate::books::Book;
use crate::error::{ListingError, Result};

/// Date format used when none is configured, e.g. `January 1, 2020`.
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

static ITEM_RENDERER: OnceCell<Arc<ItemRenderer>> = OnceCell::new();

/// Shared item renderer, built with defaults on first use unless
/// [`install_item_renderer`] ran earlier.
pub fn item_renderer() -> Arc<ItemRenderer> {
    Arc::clone(ITEM_RENDERER.get_or_init(|| Arc::new(ItemRenderer::default())))
}

/// Installs the process-wide renderer. Only the first call wins.
pub fn install_item_renderer(renderer: ItemRenderer) -> Result<()> {
    ITEM_RENDERER
        .set(Arc::new(renderer))
        .map_err(|_| ListingError::Internal("item renderer already initialised".into()))
}

// == Book View ==
/// Display-ready fields of one book.
#[derive(Debug, Clone, PartialEq)]
pub struct BookView {
    pub id: u64,
    pub title: String,
    pub permalink: String,
    pub thumbnail_url: Option<String>,
    pub excerpt: String,
    pub author_name: String,
    pub price: Option<f64>,
    pub publish_date: Option<String>,
    /// `"$"` plus two decimals, empty when there is no price
    pub formatted_price: String,
    /// Empty when there is no date
    pub formatted_date: String,
}

#[derive(Template)]
#[template(path = "book_item.html")]
struct BookItemTemplate<'a> {
    id: u64,
    title: &'a str,
    permalink: &'a str,
    thumbnail_url: &'a str,
    excerpt: &'a str,
    author_name: &'a str,
    formatted_price: &'a str,
    formatted_date: &'a str,
}

// == Item Renderer ==
#[derive(Debug, Clone)]
pub struct ItemRenderer {
    date_format: String,
}

impl ItemRenderer {
    /// Creates a renderer using a chrono strftime pattern for dates.
    pub fn new(date_format: impl Into<String>) -> Result<Self> {
        let date_format = date_format.into();
        let parses = !StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error));
        // Time and zone fields parse but cannot be applied to a bare date.
        if !parses || write_date(NaiveDate::default(), &date_format).is_none() {
            return Err(ListingError::Internal(format!(
                "invalid date format '{}'",
                date_format
            )));
        }
        Ok(Self { date_format })
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Structured view of a book.
    pub fn view(&self, book: &Book) -> BookView {
        BookView {
            id: book.id,
            title: book.title.clone(),
            permalink: book.permalink.clone(),
            thumbnail_url: book.thumbnail_url.clone(),
            excerpt: book.excerpt.clone(),
            author_name: book.author_name.clone(),
            price: book.price,
            publish_date: book.publish_date.clone(),
            formatted_price: format_price(book.price),
            formatted_date: self.format_date(book.publish_date.as_deref()),
        }
    }

    /// HTML fragment for one book.
    pub fn render_item(&self, book: &Book) -> Result<String> {
        let view = self.view(book);
        let template = BookItemTemplate {
            id: view.id,
            title: &view.title,
            permalink: &view.permalink,
            thumbnail_url: view.thumbnail_url.as_deref().unwrap_or_default(),
            excerpt: &view.excerpt,
            author_name: &view.author_name,
            formatted_price: &view.formatted_price,
            formatted_date: &view.formatted_date,
        };
        Ok(template.render()?)
    }

    /// Concatenated fragments for a page of books.
    pub fn render_items(&self, books: &[Book]) -> Result<String> {
        books.iter().try_fold(String::new(), |mut html, book| {
            html.push_str(&self.render_item(book)?);
            Ok(html)
        })
    }

    /// Formats a stored publish date, or returns it verbatim when it does not
    /// parse as a date.
    pub fn format_date(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return String::new();
        };
        parse_publish_date(raw)
            .and_then(|date| write_date(date, &self.date_format))
            .unwrap_or_else(|| raw.to_string())
    }
}

impl Default for ItemRenderer {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// `"$"` plus exactly two decimals; empty for a missing or zero price.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p > 0.0 => format!("${:.2}", p),
        _ => String::new(),
    }
}

fn write_date(date: NaiveDate, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).ok()?;
    Some(out)
}

fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
