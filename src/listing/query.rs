//! Query Spec Builder
//!
//! Turns canonical parameters into a declarative description of what the
//! content store should fetch. Predicates carry their operands as data; no
//! pattern strings are assembled here.

use serde::Serialize;

use crate::listing::params::{ListingParams, SortOrder};

/// Content type every listing query targets.
pub const BOOK_CONTENT_TYPE: &str = "book";

// == Fields ==
/// Book meta fields a query can filter or sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaField {
    AuthorName,
    Price,
    PublishDate,
}

// == Predicates ==
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "compare", rename_all = "snake_case")]
pub enum MetaPredicate {
    /// Text field begins with `prefix` (case-sensitive, literal).
    StartsWith { field: MetaField, prefix: String },
    /// Numeric field lies in `[low, high]`.
    Between { field: MetaField, low: f64, high: f64 },
}

// == Sort ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: MetaField,
    pub direction: SortDirection,
}

// == Pagination ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

// == Query Spec ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    pub content_type: &'static str,
    pub filters: Vec<MetaPredicate>,
    pub sort: SortSpec,
    pub pagination: Pagination,
}

impl QuerySpec {
    /// Builds the query for a canonical parameter set.
    pub fn from_params(params: &ListingParams) -> Self {
        let mut filters = Vec::new();

        if !params.author_letter.is_empty() {
            filters.push(MetaPredicate::StartsWith {
                field: MetaField::AuthorName,
                prefix: params.author_letter.clone(),
            });
        }

        if let Some((low, high)) = params.price_range.bounds() {
            filters.push(MetaPredicate::Between {
                field: MetaField::Price,
                low,
                high,
            });
        }

        let direction = match params.sort_by {
            SortOrder::Newest => SortDirection::Desc,
            SortOrder::Oldest => SortDirection::Asc,
        };

        Self {
            content_type: BOOK_CONTENT_TYPE,
            filters,
            sort: SortSpec {
                field: MetaField::PublishDate,
                direction,
            },
            pagination: Pagination {
                page: params.page,
                page_size: params.per_page,
            },
        }
    }
}
