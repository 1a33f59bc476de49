use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(value) => write!(f, "{value}"),
            MetricValue::Float(value) => write!(f, "{value:.1}"),
            MetricValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

pub type Metrics = BTreeMap<String, MetricValue>;

static NO_METRICS: Metrics = BTreeMap::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("an unavailable analytics summary needs a non-empty message")]
pub struct EmptyMessage;

/// Reason shown in place of metrics. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UnavailableMessage(String);

impl UnavailableMessage {
    pub fn new(message: impl Into<String>) -> Result<Self, EmptyMessage> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(EmptyMessage);
        }
        Ok(Self(message))
    }

    pub fn analytics_disabled() -> Self {
        Self("Listing analytics is disabled. Set ANALYTICS_ENABLED=true to turn it on.".to_string())
    }

    pub fn no_listing_data() -> Self {
        Self("No listing data has been imported yet.".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnavailableMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SummaryState {
    Configured { metrics: Metrics, range_label: String },
    Unavailable { message: UnavailableMessage },
}

/// Point-in-time snapshot of dashboard metrics over a date range, or a
/// placeholder explaining why none could be computed.
///
/// Only [`AnalyticsSummary::make`] and [`AnalyticsSummary::unavailable`]
/// build one, and nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSummary {
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    refreshed_at: DateTime<Utc>,
    state: SummaryState,
}

impl AnalyticsSummary {
    pub fn make(
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        refreshed_at: DateTime<Utc>,
        metrics: Metrics,
        range_label: impl Into<String>,
    ) -> Self {
        Self {
            range_start,
            range_end,
            refreshed_at,
            state: SummaryState::Configured {
                metrics,
                range_label: range_label.into(),
            },
        }
    }

    pub fn unavailable(
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        refreshed_at: DateTime<Utc>,
        message: UnavailableMessage,
    ) -> Self {
        Self {
            range_start,
            range_end,
            refreshed_at,
            state: SummaryState::Unavailable { message },
        }
    }

    pub fn configured(&self) -> bool {
        matches!(self.state, SummaryState::Configured { .. })
    }

    pub fn range_start(&self) -> DateTime<Utc> {
        self.range_start
    }

    pub fn range_end(&self) -> DateTime<Utc> {
        self.range_end
    }

    pub fn refreshed_at(&self) -> DateTime<Utc> {
        self.refreshed_at
    }

    pub fn metrics(&self) -> &Metrics {
        match &self.state {
            SummaryState::Configured { metrics, .. } => metrics,
            SummaryState::Unavailable { .. } => &NO_METRICS,
        }
    }

    pub fn metric(&self, key: &str) -> Option<&MetricValue> {
        self.metrics().get(key)
    }

    pub fn message(&self) -> Option<&str> {
        match &self.state {
            SummaryState::Configured { .. } => None,
            SummaryState::Unavailable { message } => Some(message.as_str()),
        }
    }

    pub fn range_label(&self) -> &str {
        match &self.state {
            SummaryState::Configured { range_label, .. } => range_label,
            SummaryState::Unavailable { .. } => "",
        }
    }

    pub fn view(&self) -> AnalyticsSummaryView {
        AnalyticsSummaryView {
            configured: self.configured(),
            range_start: self.range_start,
            range_end: self.range_end,
            refreshed_at: self.refreshed_at,
            metrics: self.metrics().clone(),
            message: self.message().map(str::to_string),
            range_label: self.range_label().to_string(),
        }
    }
}

/// Flat shape handed to dashboards and JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummaryView {
    pub configured: bool,
    pub range_start: DateTime<Utc>,
    pub range_end: DateTime<Utc>,
    pub refreshed_at: DateTime<Utc>,
    pub metrics: Metrics,
    pub message: Option<String>,
    pub range_label: String,
}
