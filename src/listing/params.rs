//! Parameter Validator
//!
//! Normalizes untrusted filter, sort and pagination input from any front door
//! into one canonical parameter set. The three front doors are profiles of
//! the same validator; they differ only in the default page size and in what
//! happens to a page number below one.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::{ListingError, Result};

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>?").expect("tag pattern is a valid regex"));

static WHITESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is a valid regex"));

// == Price Range ==
/// The fixed price buckets a listing can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PriceRange {
    #[default]
    Any,
    From50To100,
    From100To150,
    From150To200,
}

impl PriceRange {
    /// Every bucket a visitor can pick, in display order.
    pub const BUCKETS: [PriceRange; 3] = [
        PriceRange::From50To100,
        PriceRange::From100To150,
        PriceRange::From150To200,
    ];

    /// Exact-match parse; anything unrecognized means "no price filter".
    pub fn parse(raw: &str) -> Self {
        match raw {
            "50-100" => PriceRange::From50To100,
            "100-150" => PriceRange::From100To150,
            "150-200" => PriceRange::From150To200,
            _ => PriceRange::Any,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriceRange::Any => "",
            PriceRange::From50To100 => "50-100",
            PriceRange::From100To150 => "100-150",
            PriceRange::From150To200 => "150-200",
        }
    }

    /// Inclusive numeric bounds, `None` for [`PriceRange::Any`].
    pub fn bounds(self) -> Option<(f64, f64)> {
        match self {
            PriceRange::Any => None,
            PriceRange::From50To100 => Some((50.0, 100.0)),
            PriceRange::From100To150 => Some((100.0, 150.0)),
            PriceRange::From150To200 => Some((150.0, 200.0)),
        }
    }

    /// Label shown in the filter form.
    pub fn label(self) -> &'static str {
        match self {
            PriceRange::Any => "All Prices",
            PriceRange::From50To100 => "$50 - $100",
            PriceRange::From100To150 => "$100 - $150",
            PriceRange::From150To200 => "$150 - $200",
        }
    }
}

impl Serialize for PriceRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// == Sort Order ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "oldest" => SortOrder::Oldest,
            _ => SortOrder::Newest,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }
}

impl Serialize for SortOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Profiles ==
/// What a front door does with a page number below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePolicy {
    Clamp,
    Reject,
}

/// Per-front-door configuration of the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Embeddable listing block, cached HTML
    ListingBlock,
    /// REST list endpoint, JSON
    RestList,
    /// Load-more endpoint, HTML fragment
    LoadMore,
}

impl Profile {
    pub fn default_per_page(self) -> u32 {
        match self {
            Profile::ListingBlock => 3,
            Profile::RestList => 10,
            Profile::LoadMore => 6,
        }
    }

    pub fn page_policy(self) -> PagePolicy {
        match self {
            Profile::LoadMore => PagePolicy::Reject,
            Profile::ListingBlock | Profile::RestList => PagePolicy::Clamp,
        }
    }
}

// == Raw Input ==
/// Untrusted parameters as they arrived, before any coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListingParams {
    pub author_letter: Option<String>,
    pub price_range: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

// == Canonical Parameters ==
/// The normalized tuple that fully determines query results and cache identity.
///
/// Field order is part of the cache key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ListingParams {
    pub author_letter: String,
    pub price_range: PriceRange,
    pub sort_by: SortOrder,
    pub page: u32,
    pub per_page: u32,
}

impl ListingParams {
    /// True when any filter or sort differs from the defaults.
    pub fn has_active_filters(&self) -> bool {
        !self.author_letter.is_empty()
            || self.price_range != PriceRange::Any
            || self.sort_by != SortOrder::Newest
    }
}

/// Validates raw input under the given front-door profile.
pub fn validate(raw: &RawListingParams, profile: Profile) -> Result<ListingParams> {
    let author_letter = raw
        .author_letter
        .as_deref()
        .map(sanitize_text)
        .unwrap_or_default();

    let price_range = raw
        .price_range
        .as_deref()
        .map(PriceRange::parse)
        .unwrap_or_default();

    let sort_by = raw
        .sort_by
        .as_deref()
        .map(SortOrder::parse)
        .unwrap_or_default();

    let page = match raw.page.as_deref() {
        None => 1,
        Some(value) => {
            let page = parse_int(value);
            if page >= 1 {
                page.min(u32::MAX as i64) as u32
            } else {
                match profile.page_policy() {
                    PagePolicy::Clamp => 1,
                    PagePolicy::Reject => {
                        return Err(ListingError::Validation("Invalid page number.".into()))
                    }
                }
            }
        }
    };

    let per_page = raw
        .per_page
        .as_deref()
        .map(parse_int)
        .filter(|n| *n > 0)
        .map(|n| n.min(u32::MAX as i64) as u32)
        .unwrap_or_else(|| profile.default_per_page());

    Ok(ListingParams {
        author_letter,
        price_range,
        sort_by,
        page,
        per_page,
    })
}

/// Leading-integer parse: optional sign then digits, anything else yields 0.
///
/// `"12abc"` is 12, `"-3"` is -3, `"abc"` is 0.
pub fn parse_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add((d - b'0') as i64)
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Plain-text sanitizer for request parameters and stored meta.
///
/// Strips HTML tags and control characters, collapses whitespace runs into a
/// single space and trims the ends.
pub fn sanitize_text(raw: &str) -> String {
    let without_tags = TAG_PATTERN.replace_all(raw, "");
    let collapsed = WHITESPACE_PATTERN.replace_all(&without_tags, " ");
    collapsed
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawListingParams {
        RawListingParams::default()
    }

    #[test]
    fn test_defaults_per_profile() {
        let block = validate(&raw(), Profile::ListingBlock).unwrap();
        let rest = validate(&raw(), Profile::RestList).unwrap();
        let more = validate(&raw(), Profile::LoadMore).unwrap();

        assert_eq!(block.per_page, 3);
        assert_eq!(rest.per_page, 10);
        assert_eq!(more.per_page, 6);
        for params in [block, rest, more] {
            assert_eq!(params.page, 1);
            assert_eq!(params.sort_by, SortOrder::Newest);
            assert_eq!(params.price_range, PriceRange::Any);
            assert!(params.author_letter.is_empty());
        }
    }

    #[test]
    fn test_price_range_exact_match_only() {
        assert_eq!(PriceRange::parse("100-150"), PriceRange::From100To150);
        assert_eq!(PriceRange::parse("100-150 "), PriceRange::Any);
        assert_eq!(PriceRange::parse("0-50"), PriceRange::Any);
        assert_eq!(PriceRange::parse(""), PriceRange::Any);
    }

    #[test]
    fn test_sort_by_falls_back_to_newest() {
        assert_eq!(SortOrder::parse("oldest"), SortOrder::Oldest);
        assert_eq!(SortOrder::parse("OLDEST"), SortOrder::Newest);
        assert_eq!(SortOrder::parse("title"), SortOrder::Newest);
    }

    #[test]
    fn test_page_below_one_clamps_for_block_and_rest() {
        let input = RawListingParams {
            page: Some("0".into()),
            ..raw()
        };
        assert_eq!(validate(&input, Profile::ListingBlock).unwrap().page, 1);
        assert_eq!(validate(&input, Profile::RestList).unwrap().page, 1);

        let negative = RawListingParams {
            page: Some("-4".into()),
            ..raw()
        };
        assert_eq!(validate(&negative, Profile::RestList).unwrap().page, 1);
    }

    #[test]
    fn test_page_below_one_rejected_for_load_more() {
        for bad in ["0", "-1", "abc", ""] {
            let input = RawListingParams {
                page: Some(bad.into()),
                ..raw()
            };
            let err = validate(&input, Profile::LoadMore).unwrap_err();
            assert!(matches!(err, ListingError::Validation(ref msg) if msg == "Invalid page number."));
        }
    }

    #[test]
    fn test_per_page_zero_uses_default() {
        let input = RawListingParams {
            per_page: Some("0".into()),
            ..raw()
        };
        assert_eq!(validate(&input, Profile::RestList).unwrap().per_page, 10);

        let input = RawListingParams {
            per_page: Some("25".into()),
            ..raw()
        };
        assert_eq!(validate(&input, Profile::RestList).unwrap().per_page, 25);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42"), 42);
        assert_eq!(parse_int("  7 "), 7);
        assert_eq!(parse_int("12abc"), 12);
        assert_eq!(parse_int("-3"), -3);
        assert_eq!(parse_int("+5"), 5);
        assert_eq!(parse_int("abc"), 0);
        assert_eq!(parse_int(""), 0);
        assert_eq!(parse_int("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("K"), "K");
        assert_eq!(sanitize_text("  <b>K</b>\n"), "K");
        assert_eq!(sanitize_text("a\tb\r\n c"), "a b c");
        assert_eq!(sanitize_text("x\u{0}y"), "xy");
        assert_eq!(sanitize_text("<script>"), "");
    }

    #[test]
    fn test_author_letter_is_sanitized() {
        let input = RawListingParams {
            author_letter: Some(" <i>K</i> ".into()),
            ..raw()
        };
        assert_eq!(validate(&input, Profile::RestList).unwrap().author_letter, "K");
    }

    #[test]
    fn test_has_active_filters() {
        let mut params = validate(&raw(), Profile::ListingBlock).unwrap();
        assert!(!params.has_active_filters());

        params.sort_by = SortOrder::Oldest;
        assert!(params.has_active_filters());
    }
}
