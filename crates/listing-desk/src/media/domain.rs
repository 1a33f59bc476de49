use serde::{Deserialize, Serialize};
use url::Url;

/// Locally stored copy of a media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCopy {
    pub disk: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingMedia {
    /// Original source URL as delivered by the feed.
    pub url: Option<String>,
    pub preview_url: Option<String>,
    pub stored: Option<StoredCopy>,
    #[serde(default)]
    pub position: u16,
}

impl ListingMedia {
    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Builds a record from loosely populated columns. A stored copy is only
    /// recorded when both the disk and the path are known.
    pub fn from_parts(
        stored_disk: Option<String>,
        stored_path: Option<String>,
        preview_url: Option<String>,
        url: Option<String>,
    ) -> Self {
        let stored = match (stored_disk, stored_path) {
            (Some(disk), Some(path)) => Some(StoredCopy { disk, path }),
            _ => None,
        };

        Self {
            url,
            preview_url,
            stored,
            position: 0,
        }
    }

    pub fn with_preview(mut self, preview_url: impl Into<String>) -> Self {
        self.preview_url = Some(preview_url.into());
        self
    }

    pub fn with_stored_copy(mut self, disk: impl Into<String>, path: impl Into<String>) -> Self {
        self.stored = Some(StoredCopy {
            disk: disk.into(),
            path: path.into(),
        });
        self
    }

    pub fn at_position(mut self, position: u16) -> Self {
        self.position = position;
        self
    }

    pub fn stored_disk(&self) -> Option<&str> {
        self.stored.as_ref().map(|copy| copy.disk.as_str())
    }

    pub fn stored_path(&self) -> Option<&str> {
        self.stored.as_ref().map(|copy| copy.path.as_str())
    }

    /// Best-effort guess from the file extension of any known location.
    /// Records without an extension are assumed to be photos, since MLS
    /// photo endpoints rarely carry one.
    pub fn is_image(&self) -> bool {
        let candidates = [
            self.stored_path(),
            self.preview_url.as_deref(),
            self.url.as_deref(),
        ];

        for candidate in candidates.into_iter().flatten() {
            if let Some(guess) = mime_guess::from_path(path_of(candidate)).first() {
                return guess.type_() == mime::IMAGE;
            }
        }

        true
    }
}

/// Path component of an absolute URL; stored paths are relative and only
/// lose their query or fragment.
fn path_of(location: &str) -> String {
    match Url::parse(location) {
        Ok(url) => url.path().to_string(),
        Err(_) => location
            .split(['?', '#'])
            .next()
            .unwrap_or(location)
            .to_string(),
    }
}
