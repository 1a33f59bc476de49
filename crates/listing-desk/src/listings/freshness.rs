use super::domain::Listing;
use crate::clock::Clock;
use chrono::{DateTime, Utc};

/// Whole days a listing has been on market.
///
/// With no `listed_at` the persisted value is returned as-is. Otherwise the
/// elapsed time is truncated to whole days and floored at zero, so a listing
/// dated in the future reports `0`.
pub fn days_on_market(
    listed_at: Option<DateTime<Utc>>,
    stored_days_on_market: u32,
    now: DateTime<Utc>,
) -> u32 {
    let Some(listed_at) = listed_at else {
        return stored_days_on_market;
    };

    let elapsed = now.signed_duration_since(listed_at).num_days();
    if elapsed < 0 {
        return 0;
    }

    u32::try_from(elapsed).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone)]
pub struct ListingFreshnessCalculator<C: Clock> {
    clock: C,
}

impl<C: Clock> ListingFreshnessCalculator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn days_on_market(
        &self,
        listed_at: Option<DateTime<Utc>>,
        stored_days_on_market: u32,
    ) -> u32 {
        days_on_market(listed_at, stored_days_on_market, self.clock.now())
    }

    pub fn for_listing(&self, listing: &Listing) -> u32 {
        self.days_on_market(listing.listed_at, listing.days_on_market)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::listings::ListingStatus;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 10, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn elapsed_days_win_over_stored_value() {
        assert_eq!(days_on_market(Some(now() - Duration::days(12)), 4, now()), 12);
    }

    #[test]
    fn stored_value_used_without_listing_date() {
        assert_eq!(days_on_market(None, 9, now()), 9);
    }

    #[test]
    fn future_listing_date_floors_at_zero() {
        assert_eq!(days_on_market(Some(now() + Duration::days(1)), 7, now()), 0);
        assert_eq!(days_on_market(Some(now() + Duration::hours(3)), 7, now()), 0);
    }

    #[test]
    fn partial_days_truncate() {
        let listed_at = now() - Duration::days(12) - Duration::hours(23);
        assert_eq!(days_on_market(Some(listed_at), 0, now()), 12);
        assert_eq!(days_on_market(Some(now() - Duration::hours(23)), 5, now()), 0);
    }

    #[test]
    fn calculator_reads_listing_fields_without_writing_back() {
        let calculator = ListingFreshnessCalculator::new(FixedClock(now()));
        let listing = Listing::new("N1", ListingStatus::Active)
            .with_listed_at(now() - Duration::days(30))
            .with_days_on_market(2);

        assert_eq!(calculator.for_listing(&listing), 30);
        assert_eq!(listing.days_on_market, 2);
    }
}
