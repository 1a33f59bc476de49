mod mapping;
mod normalizer;
mod parser;

use crate::listings::{Listing, ListingId, ListingStatus};
use crate::media::ListingMedia;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

pub use parser::parse_timestamp;

use parser::{FeedRecord, FeedRows};

/// MLS data-feed flavours. IDX feeds back public search pages and may only
/// show listings that are still on market; VOW and PropTx feeds are
/// delivered to registered consumers and keep every status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Idx,
    Vow,
    PropTx,
}

impl FeedKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idx => "IDX",
            Self::Vow => "VOW",
            Self::PropTx => "PropTx",
        }
    }

    pub const fn permits(self, status: ListingStatus) -> bool {
        match self {
            Self::Idx => status.is_on_market(),
            Self::Vow | Self::PropTx => true,
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feed kind '{0}' (expected idx, vow or proptx)")]
pub struct UnknownFeedKind(pub String);

impl FromStr for FeedKind {
    type Err = UnknownFeedKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "idx" => Ok(Self::Idx),
            "vow" => Ok(Self::Vow),
            "proptx" | "prop_tx" | "prop-tx" => Ok(Self::PropTx),
            _ => Err(UnknownFeedKind(value.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum FeedImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
    InvalidValue {
        line: u64,
        field: &'static str,
        value: String,
    },
}

impl fmt::Display for FeedImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedImportError::Io(err) => write!(f, "failed to read feed export: {}", err),
            FeedImportError::Csv(err) => write!(f, "invalid feed CSV data: {}", err),
            FeedImportError::MissingColumn(field) => {
                write!(f, "feed export has no {} column", field)
            }
            FeedImportError::InvalidValue { line, field, value } => {
                write!(f, "line {}: '{}' is not a valid {}", line, value, field)
            }
        }
    }
}

impl std::error::Error for FeedImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedImportError::Io(err) => Some(err),
            FeedImportError::Csv(err) => Some(err),
            FeedImportError::MissingColumn(_) | FeedImportError::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for FeedImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for FeedImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Rows dropped during an import, by reason.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedRows {
    pub blank_key: usize,
    pub duplicate: usize,
    pub not_public: usize,
}

impl SkippedRows {
    pub fn total(&self) -> usize {
        self.blank_key + self.duplicate + self.not_public
    }
}

#[derive(Debug, Clone)]
pub struct FeedImport {
    pub kind: FeedKind,
    pub listings: Vec<Listing>,
    pub skipped: SkippedRows,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeedImporter;

impl FeedImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        kind: FeedKind,
    ) -> Result<FeedImport, FeedImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, kind)
    }

    pub fn from_reader<R: Read>(reader: R, kind: FeedKind) -> Result<FeedImport, FeedImportError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut skipped = SkippedRows::default();
        let mut listings = Vec::new();

        let rows = FeedRows::read(reader)?;
        for row in rows.iter() {
            let Some(key) = rows.key(row) else {
                warn!(feed = %kind, "skipping feed row without a listing key");
                skipped.blank_key += 1;
                continue;
            };

            if !seen.insert(key.to_string()) {
                skipped.duplicate += 1;
                continue;
            }

            let status = feed_status(rows.status(row));
            if !kind.permits(status) {
                skipped.not_public += 1;
                continue;
            }

            listings.push(to_listing(key.to_string(), rows.record(row)?));
        }

        info!(
            feed = %kind,
            listings = listings.len(),
            skipped = skipped.total(),
            "feed import complete"
        );

        Ok(FeedImport {
            kind,
            listings,
            skipped,
        })
    }
}

/// Rows without a status are treated as active.
fn feed_status(raw: Option<&str>) -> ListingStatus {
    raw.map(ListingStatus::from_feed).unwrap_or(ListingStatus::Active)
}

fn to_listing(key: String, record: FeedRecord) -> Listing {
    let FeedRecord {
        status,
        list_price,
        city,
        listed_at,
        days_on_market,
        media_urls,
        preview_url,
    } = record;

    let mut media: Vec<ListingMedia> = media_urls
        .into_iter()
        .enumerate()
        .map(|(index, url)| {
            ListingMedia::remote(url).at_position(u16::try_from(index).unwrap_or(u16::MAX))
        })
        .collect();

    if let Some(preview_url) = preview_url {
        match media.first_mut() {
            Some(first) => first.preview_url = Some(preview_url),
            None => media.push(ListingMedia::default().with_preview(preview_url)),
        }
    }

    Listing {
        id: ListingId::new(key),
        status: feed_status(status.as_deref()),
        list_price,
        city,
        listed_at,
        days_on_market,
        media,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn feed_kind_parses_case_insensitively() {
        assert_eq!("IDX".parse::<FeedKind>(), Ok(FeedKind::Idx));
        assert_eq!(" PropTx ".parse::<FeedKind>(), Ok(FeedKind::PropTx));
        assert_eq!(
            "rets".parse::<FeedKind>(),
            Err(UnknownFeedKind("rets".to_string()))
        );
    }

    #[test]
    fn idx_feed_drops_closed_listings() {
        let csv = "ListingKey,StandardStatus\nA1,Active\nA2,Closed\nA3,Pending\n";
        let import = FeedImporter::from_reader(Cursor::new(csv), FeedKind::Idx).expect("import");
        let keys: Vec<_> = import.listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(keys, vec!["A1", "A3"]);
        assert_eq!(import.skipped.not_public, 1);

        let import = FeedImporter::from_reader(Cursor::new(csv), FeedKind::Vow).expect("import");
        assert_eq!(import.listings.len(), 3);
    }

    #[test]
    fn blank_and_duplicate_keys_are_skipped() {
        let csv = "ListingKey,City\nA1,Toronto\n,Ottawa\nA1,Hamilton\n";
        let import = FeedImporter::from_reader(Cursor::new(csv), FeedKind::PropTx).expect("import");
        assert_eq!(import.listings.len(), 1);
        assert_eq!(import.listings[0].city.as_deref(), Some("Toronto"));
        assert_eq!(
            import.skipped,
            SkippedRows {
                blank_key: 1,
                duplicate: 1,
                not_public: 0
            }
        );
    }

    #[test]
    fn skipped_rows_are_not_validated() {
        let csv = "ListingKey,StandardStatus,ListPrice\n\
A1,Active,100\n\
,Active,Call agent\n\
A1,Active,Call agent\n\
A2,Closed,Call agent\n";
        let import = FeedImporter::from_reader(Cursor::new(csv), FeedKind::Idx).expect("import");
        assert_eq!(import.listings.len(), 1);
        assert_eq!(import.listings[0].list_price, Some(100));
        assert_eq!(
            import.skipped,
            SkippedRows {
                blank_key: 1,
                duplicate: 1,
                not_public: 1
            }
        );
    }

    #[test]
    fn kept_rows_with_bad_cells_fail_the_import() {
        let csv = "ListingKey,ListPrice\nA1,100\nA2,Call agent\n";
        let error = FeedImporter::from_reader(Cursor::new(csv), FeedKind::Vow)
            .expect_err("invalid price");
        assert!(matches!(
            error,
            FeedImportError::InvalidValue { line: 3, field: "list price", .. }
        ));
    }

    #[test]
    fn preview_attaches_to_first_media_entry() {
        let csv = "ListingKey,MediaURL,PreviewURL\n\
A1,https://cdn.example.com/1.jpg|https://cdn.example.com/2.jpg,https://cdn.example.com/1-thumb.jpg\n\
A2,,https://cdn.example.com/only-thumb.jpg\n";
        let import = FeedImporter::from_reader(Cursor::new(csv), FeedKind::Vow).expect("import");

        let first = &import.listings[0].media;
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].preview_url.as_deref(), Some("https://cdn.example.com/1-thumb.jpg"));
        assert_eq!(first[1].position, 1);
        assert!(first[1].preview_url.is_none());

        let second = &import.listings[1].media;
        assert_eq!(second.len(), 1);
        assert!(second[0].url.is_none());
        assert_eq!(
            second[0].preview_url.as_deref(),
            Some("https://cdn.example.com/only-thumb.jpg")
        );
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = FeedImporter::from_path("./does-not-exist.csv", FeedKind::Idx)
            .expect_err("expected io error");

        match error {
            FeedImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
