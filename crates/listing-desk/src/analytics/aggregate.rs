use super::range::ReportingRange;
use super::summary::{AnalyticsSummary, MetricValue, Metrics, UnavailableMessage};
use crate::clock::Clock;
use crate::config::AnalyticsConfig;
use crate::listings::{Listing, ListingFreshnessCalculator};
use std::collections::BTreeMap;
use tracing::debug;

/// Builds the dashboard summary from imported listings.
#[derive(Debug, Clone)]
pub struct ListingAnalytics<C: Clock> {
    config: AnalyticsConfig,
    clock: C,
}

impl<C: Clock> ListingAnalytics<C> {
    pub fn new(config: AnalyticsConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn summarize(&self, listings: &[Listing]) -> AnalyticsSummary {
        let now = self.clock.now();
        let range = ReportingRange::trailing_days(now, self.config.lookback_days);

        if !self.config.enabled {
            debug!("analytics disabled; returning placeholder summary");
            return AnalyticsSummary::unavailable(
                range.start,
                range.end,
                now,
                UnavailableMessage::analytics_disabled(),
            );
        }

        if listings.is_empty() {
            debug!("no listings available for analytics");
            return AnalyticsSummary::unavailable(
                range.start,
                range.end,
                now,
                UnavailableMessage::no_listing_data(),
            );
        }

        let freshness = ListingFreshnessCalculator::new(&self.clock);
        let metrics = collect_metrics(listings, &range, &freshness);
        AnalyticsSummary::make(range.start, range.end, now, metrics, range.label())
    }
}

fn collect_metrics<C: Clock>(
    listings: &[Listing],
    range: &ReportingRange,
    freshness: &ListingFreshnessCalculator<C>,
) -> Metrics {
    let active: Vec<&Listing> = listings
        .iter()
        .filter(|listing| listing.status.is_on_market())
        .collect();
    let new_listings = listings
        .iter()
        .filter(|listing| listing.listed_at.is_some_and(|at| range.contains(at)))
        .count();
    let sold_listings = listings
        .iter()
        .filter(|listing| listing.status.is_closed())
        .count();

    let mut metrics = Metrics::new();
    metrics.insert("active_listings".into(), count_metric(active.len()));
    metrics.insert("new_listings".into(), count_metric(new_listings));
    metrics.insert("sold_listings".into(), count_metric(sold_listings));

    if !active.is_empty() {
        let total: u64 = active
            .iter()
            .map(|listing| u64::from(freshness.for_listing(listing)))
            .sum();
        let average = total as f64 / active.len() as f64;
        metrics.insert(
            "average_days_on_market".into(),
            MetricValue::Float((average * 10.0).round() / 10.0),
        );
    }

    let mut prices: Vec<u64> = active
        .iter()
        .filter_map(|listing| listing.list_price)
        .collect();
    if let Some(median) = median(&mut prices) {
        metrics.insert(
            "median_list_price".into(),
            MetricValue::Integer(i64::try_from(median).unwrap_or(i64::MAX)),
        );
    }

    if let Some(city) = busiest_city(&active) {
        metrics.insert("top_city".into(), MetricValue::Text(city));
    }

    metrics
}

fn count_metric(count: usize) -> MetricValue {
    MetricValue::Integer(i64::try_from(count).unwrap_or(i64::MAX))
}

fn median(values: &mut [u64]) -> Option<u64> {
    if values.is_empty() {
        return None;
    }

    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        let sum = u128::from(values[mid - 1]) + u128::from(values[mid]);
        Some((sum / 2) as u64)
    }
}

fn busiest_city(active: &[&Listing]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for city in active.iter().filter_map(|listing| listing.city.as_deref()) {
        let city = city.trim();
        if !city.is_empty() {
            *counts.entry(city).or_default() += 1;
        }
    }

    // Ties go to the alphabetically first city.
    counts
        .into_iter()
        .max_by(|(a_city, a_count), (b_city, b_count)| {
            a_count.cmp(b_count).then_with(|| b_city.cmp(a_city))
        })
        .map(|(city, _)| city.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_handles_odd_and_even_counts() {
        assert_eq!(median(&mut []), None);
        assert_eq!(median(&mut [300, 100, 200]), Some(200));
        assert_eq!(median(&mut [400, 100, 300, 200]), Some(250));
        assert_eq!(median(&mut [1, 2]), Some(1));
        assert_eq!(median(&mut [3, 5]), Some(4));
    }
}
