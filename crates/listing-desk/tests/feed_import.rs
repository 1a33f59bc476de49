use chrono::{TimeZone, Utc};
use listing_desk::analytics::{ListingAnalytics, MetricValue};
use listing_desk::clock::FixedClock;
use listing_desk::config::{AnalyticsConfig, StorageConfig};
use listing_desk::feeds::{FeedImportError, FeedImporter, FeedKind};
use listing_desk::listings::{ListingFreshnessCalculator, ListingStatus};
use listing_desk::media::{DiskUrlMap, MediaUrlResolver};
use std::io::Cursor;

const PROPTX_EXPORT: &str = "\u{feff}ListingKey,StandardStatus,ListPrice,City,OriginalEntryTimestamp,DaysOnMarket,MediaURL,PreviewURL\n\
C100,Active,\"$899,000\",Toronto,2024-10-29T08:30:00-04:00,3,https://cdn.example.com/c100/tour.mp4|https://cdn.example.com/c100/front.jpg,\n\
C101,Pending,649000,Mississauga,,14,https://cdn.example.com/c101/1.jpg,https://cdn.example.com/c101/1-thumb.jpg\n\
C102,Closed,1200000,Toronto,2024-09-01,70,,\n\
C103,Active,,Toronto,2024-11-12,0,,\n";

#[test]
fn proptx_export_imports_every_status() {
    let import =
        FeedImporter::from_reader(Cursor::new(PROPTX_EXPORT), FeedKind::PropTx).expect("import");

    assert_eq!(import.kind, FeedKind::PropTx);
    assert_eq!(import.listings.len(), 4);
    assert_eq!(import.skipped.total(), 0);

    let closed = import
        .listings
        .iter()
        .find(|listing| listing.id.as_str() == "C102")
        .expect("closed listing kept");
    assert_eq!(closed.status, ListingStatus::Sold);
    assert_eq!(closed.list_price, Some(1_200_000));
}

#[test]
fn idx_export_hides_closed_inventory() {
    let import =
        FeedImporter::from_reader(Cursor::new(PROPTX_EXPORT), FeedKind::Idx).expect("import");

    assert_eq!(import.listings.len(), 3);
    assert_eq!(import.skipped.not_public, 1);
    assert!(import
        .listings
        .iter()
        .all(|listing| listing.status.is_on_market()));
}

#[test]
fn imported_listings_feed_freshness_and_photos() {
    let now = Utc
        .with_ymd_and_hms(2024, 11, 10, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let import =
        FeedImporter::from_reader(Cursor::new(PROPTX_EXPORT), FeedKind::Vow).expect("import");
    let freshness = ListingFreshnessCalculator::new(FixedClock(now));
    let resolver = MediaUrlResolver::new(DiskUrlMap::from_config(&StorageConfig::default()));

    let by_key = |key: &str| {
        import
            .listings
            .iter()
            .find(|listing| listing.id.as_str() == key)
            .expect("listing present")
    };

    // Listed 2024-10-29 12:30 UTC, half an hour short of twelve days.
    assert_eq!(freshness.for_listing(by_key("C100")), 11);
    assert_eq!(freshness.for_listing(by_key("C101")), 14);
    assert_eq!(freshness.for_listing(by_key("C103")), 0);

    assert_eq!(
        resolver.primary_photo(by_key("C100").gallery()),
        Some("https://cdn.example.com/c100/front.jpg".to_string())
    );
    assert_eq!(
        resolver.primary_photo(by_key("C101").gallery()),
        Some("https://cdn.example.com/c101/1-thumb.jpg".to_string())
    );
    assert_eq!(resolver.primary_photo(by_key("C102").gallery()), None);

    let analytics = ListingAnalytics::new(AnalyticsConfig::default(), FixedClock(now));
    let summary = analytics.summarize(&import.listings);
    assert_eq!(summary.metric("active_listings"), Some(&MetricValue::Integer(3)));
    assert_eq!(summary.metric("sold_listings"), Some(&MetricValue::Integer(1)));
    assert_eq!(
        summary.metric("top_city"),
        Some(&MetricValue::Text("Toronto".to_string()))
    );
}

#[test]
fn malformed_price_reports_the_row() {
    let csv = "ListingKey,ListPrice\nC200,Call agent\n";
    let error =
        FeedImporter::from_reader(Cursor::new(csv), FeedKind::Vow).expect_err("price rejected");

    assert!(matches!(
        error,
        FeedImportError::InvalidValue {
            line: 2,
            field: "list price",
            ..
        }
    ));
    assert_eq!(error.to_string(), "line 2: 'Call agent' is not a valid list price");
}
