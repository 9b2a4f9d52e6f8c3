//! Error types for rule loading and classification.

use thiserror::Error;

/// Errors that can occur while loading rules or the GeoIP database.
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("geoip error: {0}")]
    GeoIp(String),
}
