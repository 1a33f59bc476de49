use crate::commands::{
    run_analytics_summary, run_days_on_market, run_feed_import, run_media_url, AnalyticsSummaryArgs,
    DaysOnMarketArgs, FeedImportArgs, MediaUrlArgs,
};
use clap::{Parser, Subcommand};
use listing_desk::config::AppConfig;
use listing_desk::error::AppError;
use listing_desk::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "listing-desk",
    about = "Inspect listing freshness, media URLs, feed exports and dashboard analytics",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Listing-level derivations
    Listing {
        #[command(subcommand)]
        command: ListingCommand,
    },
    /// Media record helpers
    Media {
        #[command(subcommand)]
        command: MediaCommand,
    },
    /// IDX / VOW / PropTx feed exports
    Feed {
        #[command(subcommand)]
        command: FeedCommand,
    },
    /// Dashboard analytics
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ListingCommand {
    /// Compute days on market from a listing date or the stored value
    DaysOnMarket(DaysOnMarketArgs),
}

#[derive(Subcommand, Debug)]
enum MediaCommand {
    /// Resolve the public URL for a media record
    Url(MediaUrlArgs),
}

#[derive(Subcommand, Debug)]
enum FeedCommand {
    /// Import a feed CSV export and list the resulting listings
    Import(FeedImportArgs),
}

#[derive(Subcommand, Debug)]
enum AnalyticsCommand {
    /// Summarize listing activity over the configured lookback window
    Summary(AnalyticsSummaryArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(?config.environment, "configuration loaded");

    match cli.command {
        Command::Listing {
            command: ListingCommand::DaysOnMarket(args),
        } => run_days_on_market(args),
        Command::Media {
            command: MediaCommand::Url(args),
        } => run_media_url(args, &config),
        Command::Feed {
            command: FeedCommand::Import(args),
        } => run_feed_import(args, &config),
        Command::Analytics {
            command: AnalyticsCommand::Summary(args),
        } => run_analytics_summary(args, &config),
    }
}
