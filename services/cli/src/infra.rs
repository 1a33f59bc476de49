use chrono::{DateTime, Utc};
use listing_desk::clock::{Clock, FixedClock, SystemClock};
use listing_desk::feeds::{parse_timestamp, FeedKind};

pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(raw).ok_or_else(|| {
        format!("failed to parse '{raw}' as an RFC 3339 timestamp or YYYY-MM-DD date")
    })
}

pub(crate) fn parse_feed_kind(raw: &str) -> Result<FeedKind, String> {
    raw.parse::<FeedKind>().map_err(|err| err.to_string())
}

/// `--now` pins the clock; otherwise the wall clock is used.
pub(crate) fn clock_for(now: Option<DateTime<Utc>>) -> Box<dyn Clock> {
    match now {
        Some(instant) => Box::new(FixedClock(instant)),
        None => Box::new(SystemClock),
    }
}
