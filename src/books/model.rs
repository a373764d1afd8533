//! Book records and the inputs that create or edit them.

use serde::{Deserialize, Serialize};

use crate::error::{ListingError, Result};
use crate::listing::params::sanitize_text;

// == Book ==
/// A stored book. `price` and `publish_date` are independently optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    pub permalink: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Empty when no author was entered
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub price: Option<f64>,
    /// `YYYY-MM-DD` as entered in the editor
    #[serde(default)]
    pub publish_date: Option<String>,
}

// == New Book ==
/// A book to insert, as read from a seed file or built in tests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    /// Defaults to `/books/{id}` when absent
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub publish_date: Option<String>,
}

impl NewBook {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author_name = Some(author.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn published(mut self, date: impl Into<String>) -> Self {
        self.publish_date = Some(date.into());
        self
    }
}

// == Meta Input ==
/// Custom field values as submitted by the book editor, unsanitized.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookMetaInput {
    pub author_name: Option<String>,
    pub price: Option<String>,
    pub publish_date: Option<String>,
}

/// Sanitized text, `None` once nothing is left.
pub(crate) fn clean_optional_text(raw: &str) -> Option<String> {
    let cleaned = sanitize_text(raw);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Parses an editor price field.
///
/// Blank clears the price; anything that is not a non-negative number is
/// rejected.
pub(crate) fn parse_price(raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(Some(price)),
        _ => Err(ListingError::Validation(format!(
            "Price must be a non-negative number, got '{}'",
            trimmed
        ))),
    }
}

/// Validates a price already given as a number.
pub(crate) fn check_price(price: Option<f64>) -> Result<Option<f64>> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err(ListingError::Validation(format!(
            "Price must be a non-negative number, got '{}'",
            p
        ))),
        other => Ok(other),
    }
}
