mod aggregate;
mod range;
pub mod summary;

pub use aggregate::ListingAnalytics;
pub use range::ReportingRange;
pub use summary::{
    AnalyticsSummary, AnalyticsSummaryView, EmptyMessage, MetricValue, Metrics,
    UnavailableMessage,
};
