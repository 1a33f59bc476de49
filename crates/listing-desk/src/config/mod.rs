use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub storage: StorageConfig,
    pub analytics: AnalyticsConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let public_base_url = env::var("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|_| StorageConfig::DEFAULT_PUBLIC_URL.to_string());
        let disks = match env::var("STORAGE_DISKS") {
            Ok(raw) => parse_disks(&raw)?,
            Err(_) => Vec::new(),
        };

        let enabled = match env::var("ANALYTICS_ENABLED") {
            Ok(raw) => parse_flag("ANALYTICS_ENABLED", &raw)?,
            Err(_) => true,
        };
        let lookback_days = match env::var("ANALYTICS_LOOKBACK_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|days| (1..=AnalyticsConfig::MAX_LOOKBACK_DAYS).contains(days))
                .ok_or(ConfigError::InvalidLookback)?,
            Err(_) => AnalyticsConfig::DEFAULT_LOOKBACK_DAYS,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            storage: StorageConfig {
                default_disk: StorageConfig::DEFAULT_DISK.to_string(),
                public_base_url,
                disks,
            },
            analytics: AnalyticsConfig {
                enabled,
                lookback_days,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where stored media is served from.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub default_disk: String,
    pub public_base_url: String,
    /// Additional `(disk, base url)` pairs.
    pub disks: Vec<(String, String)>,
}

impl StorageConfig {
    pub const DEFAULT_DISK: &'static str = "public";
    pub const DEFAULT_PUBLIC_URL: &'static str = "http://localhost/storage";
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            default_disk: Self::DEFAULT_DISK.to_string(),
            public_base_url: Self::DEFAULT_PUBLIC_URL.to_string(),
            disks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub enabled: bool,
    pub lookback_days: u32,
}

impl AnalyticsConfig {
    pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;
    /// Ten years.
    pub const MAX_LOOKBACK_DAYS: u32 = 3_650;
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lookback_days: Self::DEFAULT_LOOKBACK_DAYS,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn parse_disks(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (disk, url) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidDiskMapping(entry.to_string()))?;
            let (disk, url) = (disk.trim(), url.trim());
            if disk.is_empty() || url.is_empty() {
                return Err(ConfigError::InvalidDiskMapping(entry.to_string()));
            }
            Ok((disk.to_string(), url.to_string()))
        })
        .collect()
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDiskMapping(String),
    InvalidFlag { name: &'static str },
    InvalidLookback,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDiskMapping(entry) => write!(
                f,
                "STORAGE_DISKS entry '{}' must look like name=https://base.url",
                entry
            ),
            ConfigError::InvalidFlag { name } => {
                write!(f, "{} must be one of true/false/1/0/yes/no", name)
            }
            ConfigError::InvalidLookback => {
                write!(
                    f,
                    "ANALYTICS_LOOKBACK_DAYS must be a whole number between 1 and {}",
                    AnalyticsConfig::MAX_LOOKBACK_DAYS
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("STORAGE_PUBLIC_URL");
        env::remove_var("STORAGE_DISKS");
        env::remove_var("ANALYTICS_ENABLED");
        env::remove_var("ANALYTICS_LOOKBACK_DAYS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.storage.default_disk, "public");
        assert_eq!(config.storage.public_base_url, "http://localhost/storage");
        assert!(config.storage.disks.is_empty());
        assert_eq!(config.analytics, AnalyticsConfig::default());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_storage_and_analytics_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("STORAGE_PUBLIC_URL", "https://homes.example.com/storage");
        env::set_var(
            "STORAGE_DISKS",
            "s3=https://bucket.example.com, media = https://media.example.com",
        );
        env::set_var("ANALYTICS_ENABLED", "no");
        env::set_var("ANALYTICS_LOOKBACK_DAYS", "7");

        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.storage.public_base_url, "https://homes.example.com/storage");
        assert_eq!(
            config.storage.disks,
            vec![
                ("s3".to_string(), "https://bucket.example.com".to_string()),
                ("media".to_string(), "https://media.example.com".to_string()),
            ]
        );
        assert!(!config.analytics.enabled);
        assert_eq!(config.analytics.lookback_days, 7);
    }

    #[test]
    fn rejects_malformed_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("STORAGE_DISKS", "s3");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidDiskMapping(entry)) if entry == "s3"
        ));

        reset_env();
        env::set_var("ANALYTICS_LOOKBACK_DAYS", "0");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidLookback)));

        reset_env();
        env::set_var("ANALYTICS_LOOKBACK_DAYS", "4000000000");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidLookback)));

        reset_env();
        env::set_var("ANALYTICS_LOOKBACK_DAYS", "3651");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidLookback)));

        reset_env();
        env::set_var("ANALYTICS_LOOKBACK_DAYS", "3650");
        let config = AppConfig::load().expect("upper bound is accepted");
        assert_eq!(config.analytics.lookback_days, AnalyticsConfig::MAX_LOOKBACK_DAYS);

        reset_env();
        env::set_var("ANALYTICS_ENABLED", "maybe");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidFlag { name: "ANALYTICS_ENABLED" })
        ));
        reset_env();
    }
}
