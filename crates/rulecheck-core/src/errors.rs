//! Error kind labels for logging and run reports.
//!
//! These constants keep failure classification consistent between the
//! resolver, the classifier, and the output stage.

/// Malformed rule line (non-fatal, line dropped).
pub const ERROR_PARSE: &str = "parse";
/// A single domain failed to resolve within one tier.
pub const ERROR_RESOLUTION: &str = "resolution";
/// A tier's resolver could not be constructed.
pub const ERROR_TIER_CONFIG: &str = "tier_config";
/// GeoIP database missing or unreadable.
pub const ERROR_CLASSIFICATION: &str = "classification_unavailable";
/// I/O error (input or output file).
pub const ERROR_IO: &str = "io";
/// Per-query timeout.
pub const ERROR_TIMEOUT: &str = "timeout";
/// Configuration error.
pub const ERROR_CONFIG: &str = "config";
