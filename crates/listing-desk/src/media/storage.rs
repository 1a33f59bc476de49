use crate::config::StorageConfig;
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::warn;

/// Maps a stored `(disk, path)` reference to the URL clients should load.
pub trait StorageUrlResolver: Debug + Send + Sync {
    fn public_url(&self, disk: &str, path: &str) -> String;
}

impl<S: StorageUrlResolver + ?Sized> StorageUrlResolver for &S {
    fn public_url(&self, disk: &str, path: &str) -> String {
        (**self).public_url(disk, path)
    }
}

impl<S: StorageUrlResolver + ?Sized> StorageUrlResolver for Box<S> {
    fn public_url(&self, disk: &str, path: &str) -> String {
        (**self).public_url(disk, path)
    }
}

/// Disk name to public base URL table built from [`StorageConfig`].
#[derive(Debug, Clone)]
pub struct DiskUrlMap {
    default_disk: String,
    disks: BTreeMap<String, String>,
}

impl DiskUrlMap {
    pub fn new(default_disk: impl Into<String>, default_base_url: impl Into<String>) -> Self {
        let default_disk = default_disk.into();
        let mut disks = BTreeMap::new();
        disks.insert(default_disk.clone(), normalize_base(default_base_url.into()));
        Self {
            default_disk,
            disks,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        let mut map = Self::new(config.default_disk.clone(), config.public_base_url.clone());
        for (disk, base_url) in &config.disks {
            map = map.with_disk(disk.clone(), base_url.clone());
        }
        map
    }

    pub fn with_disk(mut self, disk: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.disks.insert(disk.into(), normalize_base(base_url.into()));
        self
    }

    pub fn disks(&self) -> impl Iterator<Item = (&str, &str)> {
        self.disks
            .iter()
            .map(|(disk, base)| (disk.as_str(), base.as_str()))
    }

    fn base_for(&self, disk: &str) -> &str {
        if let Some(base) = self.disks.get(disk) {
            return base;
        }

        warn!(disk, fallback = %self.default_disk, "unknown storage disk; using default base url");
        self.disks
            .get(&self.default_disk)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

impl StorageUrlResolver for DiskUrlMap {
    fn public_url(&self, disk: &str, path: &str) -> String {
        let base = self.base_for(disk);
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

fn normalize_base(value: String) -> String {
    value.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path_without_duplicate_slashes() {
        let map = DiskUrlMap::new("public", "https://homes.example.com/storage/");
        assert_eq!(
            map.public_url("public", "/listings/1/1.jpg"),
            "https://homes.example.com/storage/listings/1/1.jpg"
        );
    }

    #[test]
    fn unknown_disk_falls_back_to_default() {
        let map = DiskUrlMap::new("public", "http://localhost/storage")
            .with_disk("s3", "https://bucket.s3.amazonaws.com");
        assert_eq!(
            map.public_url("s3", "listings/9/2.jpg"),
            "https://bucket.s3.amazonaws.com/listings/9/2.jpg"
        );
        assert_eq!(
            map.public_url("archive", "listings/9/2.jpg"),
            "http://localhost/storage/listings/9/2.jpg"
        );
    }

    #[test]
    fn config_disks_are_registered() {
        let config = StorageConfig {
            default_disk: "public".to_string(),
            public_base_url: "http://localhost/storage".to_string(),
            disks: vec![("media".to_string(), "https://media.example.com/".to_string())],
        };
        let map = DiskUrlMap::from_config(&config);
        let disks: Vec<_> = map.disks().collect();
        assert_eq!(
            disks,
            vec![
                ("media", "https://media.example.com"),
                ("public", "http://localhost/storage"),
            ]
        );
    }
}
