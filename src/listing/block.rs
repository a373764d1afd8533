//! Listing block and page shell markup.
//!
//! The block (filter form, items, load-more control) is what the listing
//! cache stores. The page shell wraps a block with per-request data such as
//! the anti-forgery token and is never cached.

use askama::Template;

use crate::books::QueryResult;
use crate::error::Result;
use crate::listing::params::{ListingParams, PriceRange, Profile, SortOrder};
use crate::listing::render::ItemRenderer;

/// Route of the client script served alongside the listing page.
pub const LISTING_SCRIPT_PATH: &str = "/assets/book-listing.js";

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectOption {
    value: String,
    label: String,
    selected: bool,
}

impl SelectOption {
    fn new(value: &str, label: &str, current: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected: value == current,
        }
    }
}

#[derive(Template)]
#[template(path = "listing_block.html")]
struct ListingBlockTemplate<'a> {
    form_action: &'a str,
    per_page: u32,
    author_options: Vec<SelectOption>,
    price_options: Vec<SelectOption>,
    sort_options: Vec<SelectOption>,
    show_reset: bool,
    reset_url: String,
    has_items: bool,
    items_html: String,
    show_load_more: bool,
    page: u32,
    max_pages: u32,
}

/// Renders the full listing block for one page of results.
pub fn render_listing_block(
    params: &ListingParams,
    result: &QueryResult,
    listing_path: &str,
    renderer: &ItemRenderer,
) -> Result<String> {
    let author_options = std::iter::once(SelectOption::new("", "All Authors", &params.author_letter))
        .chain(('A'..='Z').map(|letter| {
            let letter = letter.to_string();
            SelectOption::new(&letter, &letter, &params.author_letter)
        }))
        .collect();

    let price_options = std::iter::once(PriceRange::Any)
        .chain(PriceRange::BUCKETS)
        .map(|range| SelectOption::new(range.as_str(), range.label(), params.price_range.as_str()))
        .collect();

    let sort_options = [
        (SortOrder::Newest, "Newest First"),
        (SortOrder::Oldest, "Oldest First"),
    ]
    .into_iter()
    .map(|(order, label)| SelectOption::new(order.as_str(), label, params.sort_by.as_str()))
    .collect();

    let reset_url = if params.per_page == Profile::ListingBlock.default_per_page() {
        listing_path.to_string()
    } else {
        format!("{}?posts_per_page={}", listing_path, params.per_page)
    };

    let template = ListingBlockTemplate {
        form_action: listing_path,
        per_page: params.per_page,
        author_options,
        price_options,
        sort_options,
        show_reset: params.has_active_filters(),
        reset_url,
        has_items: !result.books.is_empty(),
        items_html: renderer.render_items(&result.books)?,
        show_load_more: result.max_pages > 1 && params.page < result.max_pages,
        page: params.page,
        max_pages: result.max_pages,
    };
    Ok(template.render()?)
}

// == Page Shell ==
#[derive(Template)]
#[template(path = "listing_page.html")]
struct ListingPageTemplate<'a> {
    block: &'a str,
    load_more_url: &'a str,
    nonce: &'a str,
    script_path: &'a str,
}

/// Wraps a (possibly cached) listing block in a complete HTML page.
pub fn render_listing_page(block: &str, load_more_url: &str, nonce: &str) -> Result<String> {
    let template = ListingPageTemplate {
        block,
        load_more_url,
        nonce,
        script_path: LISTING_SCRIPT_PATH,
    };
    Ok(template.render()?)
}
