use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportingRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Windows reaching past the earliest representable instant start there.
    pub fn trailing_days(end: DateTime<Utc>, days: u32) -> Self {
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%b %-d, %Y"),
            self.end.format("%b %-d, %Y")
        )
    }
}
