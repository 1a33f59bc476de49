use crate::media::ListingMedia;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Active,
    Pending,
    Sold,
    Leased,
    Expired,
    Withdrawn,
}

impl ListingStatus {
    /// Maps the status vocabulary used by MLS exports. Unknown values are
    /// treated as active, matching how boards publish "Coming Soon" or "New".
    pub fn from_feed(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "under contract" | "active under contract" | "sc" => Self::Pending,
            "sold" | "closed" | "sld" => Self::Sold,
            "leased" | "lsd" | "rented" => Self::Leased,
            "expired" | "exp" => Self::Expired,
            "withdrawn" | "canceled" | "cancelled" | "terminated" | "ter" => Self::Withdrawn,
            _ => Self::Active,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Pending => "Pending",
            Self::Sold => "Sold",
            Self::Leased => "Leased",
            Self::Expired => "Expired",
            Self::Withdrawn => "Withdrawn",
        }
    }

    pub const fn is_on_market(self) -> bool {
        matches!(self, Self::Active | Self::Pending)
    }

    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Sold | Self::Leased)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub status: ListingStatus,
    pub list_price: Option<u64>,
    pub city: Option<String>,
    pub listed_at: Option<DateTime<Utc>>,
    /// Value persisted by the feed; used when `listed_at` is unknown.
    pub days_on_market: u32,
    #[serde(default)]
    pub media: Vec<ListingMedia>,
}

impl Listing {
    pub fn new(id: impl Into<String>, status: ListingStatus) -> Self {
        Self {
            id: ListingId::new(id),
            status,
            list_price: None,
            city: None,
            listed_at: None,
            days_on_market: 0,
            media: Vec::new(),
        }
    }

    pub fn with_listed_at(mut self, listed_at: DateTime<Utc>) -> Self {
        self.listed_at = Some(listed_at);
        self
    }

    pub fn with_days_on_market(mut self, days: u32) -> Self {
        self.days_on_market = days;
        self
    }

    pub fn with_list_price(mut self, price: u64) -> Self {
        self.list_price = Some(price);
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_media(mut self, media: ListingMedia) -> Self {
        self.media.push(media);
        self
    }

    /// Media in gallery order.
    pub fn gallery(&self) -> Vec<&ListingMedia> {
        let mut ordered: Vec<&ListingMedia> = self.media.iter().collect();
        ordered.sort_by_key(|media| media.position);
        ordered
    }
}
