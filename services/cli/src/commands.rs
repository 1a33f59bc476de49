use crate::infra::{clock_for, parse_feed_kind, parse_instant};
use chrono::{DateTime, Utc};
use clap::Args;
use listing_desk::analytics::{AnalyticsSummaryView, ListingAnalytics};
use listing_desk::clock::Clock;
use listing_desk::config::{AnalyticsConfig, AppConfig};
use listing_desk::error::AppError;
use listing_desk::feeds::{FeedImporter, FeedKind, SkippedRows};
use listing_desk::listings::{days_on_market, ListingFreshnessCalculator, ListingStatus};
use listing_desk::media::{DiskUrlMap, MediaUrlResolver, StorageUrlResolver};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DaysOnMarketArgs {
    /// Listing date (RFC 3339 or YYYY-MM-DD); omit to use the stored value
    #[arg(long, value_parser = parse_instant)]
    pub(crate) listed_at: Option<DateTime<Utc>>,
    /// Days on market persisted for the listing
    #[arg(long, default_value_t = 0)]
    pub(crate) stored: u32,
    /// Evaluation instant (defaults to now)
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub(crate) struct MediaUrlArgs {
    /// Storage disk holding a local copy
    #[arg(long)]
    pub(crate) disk: Option<String>,
    /// Path of the local copy on the disk
    #[arg(long)]
    pub(crate) path: Option<String>,
    /// Preview (thumbnail) URL
    #[arg(long)]
    pub(crate) preview_url: Option<String>,
    /// Original source URL
    #[arg(long)]
    pub(crate) url: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct FeedImportArgs {
    /// Feed flavour: idx, vow or proptx
    #[arg(long, value_parser = parse_feed_kind)]
    pub(crate) kind: FeedKind,
    /// CSV export to import
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Evaluation instant for days on market (defaults to now)
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print JSON instead of a text table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyticsSummaryArgs {
    /// Feed flavour: idx, vow or proptx
    #[arg(long, value_parser = parse_feed_kind)]
    pub(crate) kind: FeedKind,
    /// CSV export to summarize
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Refresh instant (defaults to now)
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListingRow {
    pub(crate) id: String,
    pub(crate) status: ListingStatus,
    pub(crate) status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) list_price: Option<u64>,
    pub(crate) days_on_market: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) primary_photo: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FeedImportView {
    pub(crate) kind: FeedKind,
    pub(crate) listings: Vec<ListingRow>,
    pub(crate) skipped: SkippedRows,
}

pub(crate) fn run_days_on_market(args: DaysOnMarketArgs) -> Result<(), AppError> {
    let now = clock_for(args.now).now();
    println!("{}", days_on_market(args.listed_at, args.stored, now));
    Ok(())
}

pub(crate) fn run_media_url(args: MediaUrlArgs, config: &AppConfig) -> Result<(), AppError> {
    let resolver = MediaUrlResolver::new(DiskUrlMap::from_config(&config.storage));
    let url = resolve_media_url(&resolver, &args)?;
    println!("{url}");
    Ok(())
}

pub(crate) fn run_feed_import(args: FeedImportArgs, config: &AppConfig) -> Result<(), AppError> {
    let file = std::fs::File::open(&args.csv)?;
    let clock = clock_for(args.now);
    let storage = DiskUrlMap::from_config(&config.storage);
    let view = build_feed_view(file, args.kind, &clock, &storage)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        render_feed_view(&view);
    }
    Ok(())
}

pub(crate) fn run_analytics_summary(
    args: AnalyticsSummaryArgs,
    config: &AppConfig,
) -> Result<(), AppError> {
    let file = std::fs::File::open(&args.csv)?;
    let clock = clock_for(args.now);
    let view = build_analytics_view(file, args.kind, config.analytics, &clock)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        render_analytics_view(&view);
    }
    Ok(())
}

pub(crate) fn resolve_media_url<S: StorageUrlResolver>(
    resolver: &MediaUrlResolver<S>,
    args: &MediaUrlArgs,
) -> Result<String, AppError> {
    let url = resolver.resolve_parts(
        args.disk.as_deref(),
        args.path.as_deref(),
        args.preview_url.as_deref(),
        args.url.as_deref(),
    )?;
    Ok(url)
}

pub(crate) fn build_feed_view<R, C, S>(
    reader: R,
    kind: FeedKind,
    clock: C,
    storage: S,
) -> Result<FeedImportView, AppError>
where
    R: Read,
    C: Clock,
    S: StorageUrlResolver,
{
    let import = FeedImporter::from_reader(reader, kind)?;
    let freshness = ListingFreshnessCalculator::new(clock);
    let resolver = MediaUrlResolver::new(storage);

    let listings = import
        .listings
        .iter()
        .map(|listing| ListingRow {
            id: listing.id.to_string(),
            status: listing.status,
            status_label: listing.status.label(),
            city: listing.city.clone(),
            list_price: listing.list_price,
            days_on_market: freshness.for_listing(listing),
            primary_photo: resolver.primary_photo(listing.gallery()),
        })
        .collect();

    Ok(FeedImportView {
        kind: import.kind,
        listings,
        skipped: import.skipped,
    })
}

pub(crate) fn build_analytics_view<R, C>(
    reader: R,
    kind: FeedKind,
    config: AnalyticsConfig,
    clock: C,
) -> Result<AnalyticsSummaryView, AppError>
where
    R: Read,
    C: Clock,
{
    let import = FeedImporter::from_reader(reader, kind)?;
    let summary = ListingAnalytics::new(config, clock).summarize(&import.listings);
    Ok(summary.view())
}

fn render_feed_view(view: &FeedImportView) {
    println!("{} feed import", view.kind);
    println!(
        "{} listings imported, {} rows skipped",
        view.listings.len(),
        view.skipped.total()
    );

    if view.skipped.total() > 0 {
        println!(
            "- blank key: {}, duplicate: {}, not public: {}",
            view.skipped.blank_key, view.skipped.duplicate, view.skipped.not_public
        );
    }

    for row in &view.listings {
        let price = row
            .list_price
            .map(|price| format!("${price}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "- {} | {} | {} | {} | {} days | {}",
            row.id,
            row.status_label,
            row.city.as_deref().unwrap_or("-"),
            price,
            row.days_on_market,
            row.primary_photo.as_deref().unwrap_or("no photo")
        );
    }
}

fn render_analytics_view(view: &AnalyticsSummaryView) {
    println!("Listing analytics (refreshed {})", view.refreshed_at.format("%Y-%m-%d %H:%M UTC"));

    if !view.configured {
        println!("Unavailable: {}", view.message.as_deref().unwrap_or_default());
        return;
    }

    println!("Range: {}", view.range_label);
    for (key, value) in &view.metrics {
        println!("- {}: {}", key, value);
    }
}
