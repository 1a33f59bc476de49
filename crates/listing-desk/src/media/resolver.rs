use super::domain::ListingMedia;
use super::storage::StorageUrlResolver;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaUrlError {
    #[error("media record has no stored copy, preview url or source url")]
    Unresolvable,
}

/// Picks the public URL for a media record: stored copy, then preview,
/// then the original source URL.
#[derive(Debug, Clone)]
pub struct MediaUrlResolver<S: StorageUrlResolver> {
    storage: S,
}

impl<S: StorageUrlResolver> MediaUrlResolver<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn resolve(&self, media: &ListingMedia) -> Result<String, MediaUrlError> {
        self.resolve_parts(
            media.stored_disk(),
            media.stored_path(),
            media.preview_url.as_deref(),
            media.url.as_deref(),
        )
    }

    pub fn resolve_parts(
        &self,
        stored_disk: Option<&str>,
        stored_path: Option<&str>,
        preview_url: Option<&str>,
        original_url: Option<&str>,
    ) -> Result<String, MediaUrlError> {
        if let (Some(disk), Some(path)) = (stored_disk, stored_path) {
            return Ok(self.storage.public_url(disk, path));
        }

        preview_url
            .or(original_url)
            .map(str::to_string)
            .ok_or(MediaUrlError::Unresolvable)
    }

    /// URL of the first photo in the gallery that resolves.
    pub fn primary_photo<'a, I>(&self, gallery: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a ListingMedia>,
    {
        gallery
            .into_iter()
            .filter(|media| media.is_image())
            .find_map(|media| self.resolve(media).ok())
    }
}
