pub mod analytics;
pub mod clock;
pub mod config;
pub mod error;
pub mod feeds;
pub mod listings;
pub mod media;
pub mod telemetry;
