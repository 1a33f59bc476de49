use super::normalizer::normalize_header;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum FeedField {
    ListingKey,
    Status,
    ListPrice,
    City,
    ListedAt,
    DaysOnMarket,
    MediaUrls,
    PreviewUrl,
}

impl FeedField {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::ListingKey => "listing key",
            Self::Status => "status",
            Self::ListPrice => "list price",
            Self::City => "city",
            Self::ListedAt => "listed at",
            Self::DaysOnMarket => "days on market",
            Self::MediaUrls => "media urls",
            Self::PreviewUrl => "preview url",
        }
    }
}

static HEADER_MAP: OnceLock<HashMap<String, FeedField>> = OnceLock::new();

pub(crate) fn field_for_header(header: &str) -> Option<FeedField> {
    header_map().get(&normalize_header(header)).copied()
}

fn header_map() -> &'static HashMap<String, FeedField> {
    HEADER_MAP.get_or_init(|| {
        const HEADER_TO_FIELD: &[(&str, FeedField)] = &[
            // RESO Web API / PropTx names
            ("ListingKey", FeedField::ListingKey),
            ("ListingId", FeedField::ListingKey),
            ("StandardStatus", FeedField::Status),
            ("MlsStatus", FeedField::Status),
            ("ListPrice", FeedField::ListPrice),
            ("City", FeedField::City),
            ("OriginalEntryTimestamp", FeedField::ListedAt),
            ("ListingContractDate", FeedField::ListedAt),
            ("DaysOnMarket", FeedField::DaysOnMarket),
            ("MediaURL", FeedField::MediaUrls),
            ("PreviewURL", FeedField::PreviewUrl),
            // Legacy IDX/VOW spreadsheet exports
            ("Listing ID", FeedField::ListingKey),
            ("MLS #", FeedField::ListingKey),
            ("MLS Number", FeedField::ListingKey),
            ("Status", FeedField::Status),
            ("List Price", FeedField::ListPrice),
            ("Price", FeedField::ListPrice),
            ("List Date", FeedField::ListedAt),
            ("Listed At", FeedField::ListedAt),
            ("DOM", FeedField::DaysOnMarket),
            ("Days On Market", FeedField::DaysOnMarket),
            ("Media", FeedField::MediaUrls),
            ("Photos", FeedField::MediaUrls),
            ("Photo URLs", FeedField::MediaUrls),
            ("Thumbnail", FeedField::PreviewUrl),
            ("Thumbnail URL", FeedField::PreviewUrl),
        ];

        HEADER_TO_FIELD
            .iter()
            .map(|(header, field)| (normalize_header(header), *field))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_reso_and_legacy_headers() {
        assert_eq!(field_for_header("ListingKey"), Some(FeedField::ListingKey));
        assert_eq!(field_for_header(" mls  # "), Some(FeedField::ListingKey));
        assert_eq!(field_for_header("\u{feff}DOM"), Some(FeedField::DaysOnMarket));
        assert_eq!(field_for_header("OriginalEntryTimestamp"), Some(FeedField::ListedAt));
        assert_eq!(field_for_header("photos"), Some(FeedField::MediaUrls));
        assert_eq!(field_for_header("Bedrooms"), None);
    }
}
