//! Domain layer: ingest configuration and the freshness policy.  No I/O.

pub mod config;
pub mod freshness;

pub use config::IngestConfig;
pub use freshness::{FreshnessWindow, StaleMessageError};
