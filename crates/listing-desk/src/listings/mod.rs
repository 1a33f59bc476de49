pub mod domain;
mod freshness;

pub use domain::{Listing, ListingId, ListingStatus};
pub use freshness::{days_on_market, ListingFreshnessCalculator};
