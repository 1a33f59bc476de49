use super::mapping::{field_for_header, FeedField};
use super::FeedImportError;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::io::Read;

#[derive(Debug, Default)]
pub(crate) struct FeedRecord {
    pub(crate) status: Option<String>,
    pub(crate) list_price: Option<u64>,
    pub(crate) city: Option<String>,
    pub(crate) listed_at: Option<DateTime<Utc>>,
    pub(crate) days_on_market: u32,
    pub(crate) media_urls: Vec<String>,
    pub(crate) preview_url: Option<String>,
}

struct Columns(HashMap<FeedField, usize>);

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut columns = HashMap::new();
        for (index, header) in headers.iter().enumerate() {
            if let Some(field) = field_for_header(header) {
                columns.entry(field).or_insert(index);
            }
        }
        Self(columns)
    }

    fn has(&self, field: FeedField) -> bool {
        self.0.contains_key(&field)
    }

    fn value<'r>(&self, record: &'r csv::StringRecord, field: FeedField) -> Option<&'r str> {
        let index = *self.0.get(&field)?;
        record
            .get(index)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Raw feed rows with their resolved column layout. The key and status are
/// read as-is; the remaining cells are validated when `record` is called.
pub(crate) struct FeedRows {
    columns: Columns,
    rows: Vec<csv::StringRecord>,
}

impl FeedRows {
    pub(crate) fn read<R: Read>(reader: R) -> Result<Self, FeedImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let columns = Columns::from_headers(csv_reader.headers()?);
        if !columns.has(FeedField::ListingKey) {
            return Err(FeedImportError::MissingColumn(FeedField::ListingKey.label()));
        }

        let rows = csv_reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { columns, rows })
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &csv::StringRecord> {
        self.rows.iter()
    }

    pub(crate) fn key<'r>(&self, row: &'r csv::StringRecord) -> Option<&'r str> {
        self.columns.value(row, FeedField::ListingKey)
    }

    pub(crate) fn status<'r>(&self, row: &'r csv::StringRecord) -> Option<&'r str> {
        self.columns.value(row, FeedField::Status)
    }

    pub(crate) fn record(&self, row: &csv::StringRecord) -> Result<FeedRecord, FeedImportError> {
        let columns = &self.columns;
        let line = row.position().map(|position| position.line()).unwrap_or_default();

        let list_price = columns
            .value(row, FeedField::ListPrice)
            .map(|raw| parse_amount(raw).ok_or_else(|| invalid(line, FeedField::ListPrice, raw)))
            .transpose()?;
        let days_on_market = columns
            .value(row, FeedField::DaysOnMarket)
            .map(|raw| {
                parse_whole(raw).ok_or_else(|| invalid(line, FeedField::DaysOnMarket, raw))
            })
            .transpose()?
            .unwrap_or_default();
        let listed_at = columns
            .value(row, FeedField::ListedAt)
            .map(|raw| parse_timestamp(raw).ok_or_else(|| invalid(line, FeedField::ListedAt, raw)))
            .transpose()?;
        let media_urls = columns
            .value(row, FeedField::MediaUrls)
            .map(split_media)
            .unwrap_or_default();

        Ok(FeedRecord {
            status: columns.value(row, FeedField::Status).map(str::to_string),
            list_price,
            city: columns.value(row, FeedField::City).map(str::to_string),
            listed_at,
            days_on_market,
            media_urls,
            preview_url: columns.value(row, FeedField::PreviewUrl).map(str::to_string),
        })
    }
}

fn invalid(line: u64, field: FeedField, raw: &str) -> FeedImportError {
    FeedImportError::InvalidValue {
        line,
        field: field.label(),
        value: raw.to_string(),
    }
}

fn strip_decorations(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect()
}

fn parse_amount(raw: &str) -> Option<u64> {
    let cleaned = strip_decorations(raw);
    if let Ok(value) = cleaned.parse::<u64>() {
        return Some(value);
    }

    let value = cleaned.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value <= u64::MAX as f64 {
        Some(value.round() as u64)
    } else {
        None
    }
}

fn parse_whole(raw: &str) -> Option<u32> {
    strip_decorations(raw).parse::<u32>().ok()
}

fn split_media(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

/// RFC 3339 instants or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    None
}
