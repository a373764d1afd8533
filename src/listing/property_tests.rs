//! Property-Based Tests for the listing pipeline
//!
//! Uses proptest to check the validator, query builder, renderer and cache
//! against arbitrary input.

use std::sync::Arc;

use proptest::prelude::*;
use tokio::sync::RwLock;

use crate::books::{Book, ContentStore, InMemoryBookStore, NewBook};
use crate::cache::{listing_cache_key, CacheStore, ListingCache};
use crate::listing::params::{validate, PriceRange, Profile, RawListingParams, SortOrder};
use crate::listing::query::{MetaPredicate, QuerySpec, SortDirection};
use crate::listing::render::{format_price, ItemRenderer};
use crate::listing::service::ListingService;

const PRICE_LABELS: [&str; 3] = ["50-100", "100-150", "150-200"];

// == Strategies ==
fn unknown_price_range() -> impl Strategy<Value = String> {
    ".{0,12}".prop_filter("must not be a bucket label", |s| {
        !PRICE_LABELS.contains(&s.as_str())
    })
}

fn unknown_sort() -> impl Strategy<Value = String> {
    ".{0,12}".prop_filter("must not be a sort keyword", |s| s != "newest" && s != "oldest")
}

fn any_raw() -> impl Strategy<Value = RawListingParams> {
    (
        proptest::option::of("[A-Za-z]{0,2}"),
        proptest::option::of(prop_oneof![
            Just("50-100".to_string()),
            Just("100-150".to_string()),
            Just("150-200".to_string()),
            ".{0,8}",
        ]),
        proptest::option::of(prop_oneof![
            Just("newest".to_string()),
            Just("oldest".to_string()),
            ".{0,8}",
        ]),
        proptest::option::of("-?[0-9]{1,4}"),
        proptest::option::of("-?[0-9]{1,3}"),
    )
        .prop_map(|(author_letter, price_range, sort_by, page, per_page)| RawListingParams {
            author_letter,
            price_range,
            sort_by,
            page,
            per_page,
        })
}

fn any_profile() -> impl Strategy<Value = Profile> {
    prop_oneof![
        Just(Profile::ListingBlock),
        Just(Profile::RestList),
        Just(Profile::LoadMore),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Unknown price ranges drop the price filter rather than rejecting.
    #[test]
    fn prop_unknown_price_range_has_no_price_predicate(range in unknown_price_range()) {
        let raw = RawListingParams { price_range: Some(range), ..RawListingParams::default() };
        let params = validate(&raw, Profile::RestList).unwrap();
        let spec = QuerySpec::from_params(&params);

        prop_assert_eq!(params.price_range, PriceRange::Any);
        let has_between = spec.filters.iter().any(|f| matches!(f, MetaPredicate::Between { .. }));
        prop_assert!(!has_between);
    }

    // Anything other than newest/oldest sorts descending.
    #[test]
    fn prop_unknown_sort_is_descending(sort in unknown_sort(), profile in any_profile()) {
        let raw = RawListingParams { sort_by: Some(sort), ..RawListingParams::default() };
        let params = validate(&raw, profile).unwrap();

        prop_assert_eq!(params.sort_by, SortOrder::Newest);
        prop_assert_eq!(QuerySpec::from_params(&params).sort.direction, SortDirection::Desc);
    }

    // Validation never yields a page or page size below one.
    #[test]
    fn prop_canonical_params_are_positive(raw in any_raw(), profile in any_profile()) {
        if let Ok(params) = validate(&raw, profile) {
            prop_assert!(params.page >= 1);
            prop_assert!(params.per_page >= 1);
        }
    }

    // Only the load-more profile can fail, and only on the page number.
    #[test]
    fn prop_only_load_more_rejects(raw in any_raw()) {
        prop_assert!(validate(&raw, Profile::ListingBlock).is_ok());
        prop_assert!(validate(&raw, Profile::RestList).is_ok());

        let page_ok = raw.page.as_deref().map_or(true, |p| p.parse::<i64>().map_or(false, |n| n >= 1));
        prop_assert_eq!(validate(&raw, Profile::LoadMore).is_ok(), page_ok);
    }

    // Validation is a pure function of its input, and so is the cache key.
    #[test]
    fn prop_validation_deterministic(raw in any_raw(), profile in any_profile()) {
        let a = validate(&raw, profile);
        let b = validate(&raw, profile);
        match (a, b) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(listing_cache_key(&a), listing_cache_key(&b));
                prop_assert_eq!(a, b);
            }
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "validation disagreed with itself"),
        }
    }

    // Positive prices render as "$" plus exactly two decimals.
    #[test]
    fn prop_price_line_has_two_decimals(cents in 1u64..100_000_000) {
        let price = cents as f64 / 100.0;
        let formatted = format_price(Some(price));

        prop_assert_eq!(&formatted, &format!("${:.2}", price));
        let decimals = formatted.rsplit('.').next().unwrap();
        prop_assert_eq!(decimals.len(), 2);
    }

    // Missing prices never produce a price line.
    #[test]
    fn prop_missing_price_has_no_line(title in "[A-Za-z ]{1,20}", author in "[A-Za-z]{0,10}") {
        let book = Book {
            id: 1,
            title,
            excerpt: String::new(),
            permalink: "/books/1".into(),
            thumbnail_url: None,
            author_name: author,
            price: None,
            publish_date: None,
        };
        let html = ItemRenderer::default().render_item(&book).unwrap();
        prop_assert!(!html.contains("book-price"));
    }

    // A repeated listing request is served byte-identically from the cache.
    #[test]
    fn prop_listing_block_cached(raw in any_raw()) {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(InMemoryBookStore::new());
            for (i, author) in ["King", "Knuth", "Austen", "Atwood"].iter().enumerate() {
                store
                    .insert(
                        NewBook::new(format!("Book {}", i))
                            .author(*author)
                            .price(60.0 + 40.0 * i as f64)
                            .published(format!("202{}-01-01", i)),
                    )
                    .await
                    .unwrap();
            }
            let cache = ListingCache::new(Arc::new(RwLock::new(CacheStore::new(100))));
            let service = ListingService::new(store.clone(), cache, "/books");

            let first = service.render_listing(&raw).await.unwrap();
            let queries = store.query_count();
            let second = service.render_listing(&raw).await.unwrap();

            assert_eq!(first, second);
            assert_eq!(store.query_count(), queries);
        });
    }
}
