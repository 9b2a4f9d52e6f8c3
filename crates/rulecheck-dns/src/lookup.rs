//! Record lookup abstraction.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DnsError;

/// A/AAAA lookups against one nameserver tier.
///
/// Implementations must be thread-safe (`Send + Sync`); the engine shares
/// one instance across all in-flight tasks of a tier.
#[async_trait]
pub trait RecordLookup: Send + Sync {
    /// Resolve A records. An empty vector or [`DnsError::NoRecords`] both
    /// mean the name has no IPv4 address.
    async fn lookup_a(&self, domain: &str) -> Result<Vec<Ipv4Addr>, DnsError>;

    /// Resolve AAAA records.
    async fn lookup_aaaa(&self, domain: &str) -> Result<Vec<Ipv6Addr>, DnsError>;
}

#[async_trait]
impl<L: RecordLookup + ?Sized> RecordLookup for Arc<L> {
    #[inline]
    async fn lookup_a(&self, domain: &str) -> Result<Vec<Ipv4Addr>, DnsError> {
        (**self).lookup_a(domain).await
    }

    #[inline]
    async fn lookup_aaaa(&self, domain: &str) -> Result<Vec<Ipv6Addr>, DnsError> {
        (**self).lookup_aaaa(domain).await
    }
}

#[async_trait]
impl<L: RecordLookup + ?Sized> RecordLookup for Box<L> {
    #[inline]
    async fn lookup_a(&self, domain: &str) -> Result<Vec<Ipv4Addr>, DnsError> {
        (**self).lookup_a(domain).await
    }

    #[inline]
    async fn lookup_aaaa(&self, domain: &str) -> Result<Vec<Ipv6Addr>, DnsError> {
        (**self).lookup_aaaa(domain).await
    }
}
