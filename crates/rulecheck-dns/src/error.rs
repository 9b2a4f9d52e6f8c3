//! DNS resolver errors.

/// Errors from DNS resolution.
#[derive(Debug, thiserror::Error)]
pub enum DnsError {
    /// The name exists but has no records of the requested type, or does
    /// not exist at all.
    #[error("dns lookup returned no records for {0}")]
    NoRecords(String),

    /// The query did not complete within the tier's time budget.
    #[error("dns lookup timed out for {0}")]
    Timeout(String),

    /// DNS lookup failed.
    #[error("dns lookup failed: {0}")]
    Lookup(#[from] hickory_resolver::ResolveError),

    /// Invalid DNS server address.
    #[error("invalid dns server: {0}")]
    InvalidServer(String),
}

