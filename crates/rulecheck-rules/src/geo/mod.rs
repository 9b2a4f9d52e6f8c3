//! Country classification of resolved addresses.
//!
//! `GeoClassifier` walks each domain's IPv4 addresses in order and stops at
//! the first one located in the target country. Lookups go through the
//! [`CountryLookup`] trait so any offline database can back it.

#[cfg(feature = "geoip")]
mod db;

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

#[cfg(feature = "geoip")]
pub use db::GeoipDb;

/// IP → ISO country code lookup.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait CountryLookup: Send + Sync {
    /// Uppercase ISO 3166-1 alpha-2 code, or `None` if the address is unknown.
    fn country_code(&self, ip: IpAddr) -> Option<String>;
}

impl<L: CountryLookup + ?Sized> CountryLookup for Arc<L> {
    #[inline]
    fn country_code(&self, ip: IpAddr) -> Option<String> {
        (**self).country_code(ip)
    }
}

impl<L: CountryLookup + ?Sized> CountryLookup for Box<L> {
    #[inline]
    fn country_code(&self, ip: IpAddr) -> Option<String> {
        (**self).country_code(ip)
    }
}

/// Result of classifying a set of domains against one country.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    target: String,
    region: FxHashSet<String>,
    countries: FxHashMap<String, String>,
}

impl Classification {
    /// Target country code (uppercase).
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Domains with at least one address in the target country.
    pub fn region(&self) -> &FxHashSet<String> {
        &self.region
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.region.contains(domain)
    }

    /// Country recorded for a domain: the target if it matched, otherwise
    /// the first country any of its addresses mapped to.
    pub fn country_of(&self, domain: &str) -> Option<&str> {
        self.countries.get(domain).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.region.len()
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }
}

/// Maps domains to a region set using a [`CountryLookup`].
#[derive(Debug)]
pub struct GeoClassifier<L> {
    lookup: L,
}

impl<L: CountryLookup> GeoClassifier<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Classify domains by their resolved IPv4 addresses.
    ///
    /// Domains without addresses are skipped. Addresses missing from the
    /// database are ignored.
    pub fn classify<'a, I>(&self, addresses: I, target: &str) -> Classification
    where
        I: IntoIterator<Item = (&'a str, &'a [Ipv4Addr])>,
    {
        let mut result = Classification {
            target: target.to_ascii_uppercase(),
            ..Default::default()
        };

        for (domain, addrs) in addresses {
            let mut first_seen: Option<String> = None;
            for ip in addrs {
                let Some(code) = self.lookup.country_code(IpAddr::V4(*ip)) else {
                    continue;
                };
                if code.eq_ignore_ascii_case(target) {
                    result.region.insert(domain.to_string());
                    first_seen = Some(code);
                    break;
                }
                first_seen.get_or_insert(code);
            }
            if let Some(code) = first_seen {
                result.countries.insert(domain.to_string(), code);
            }
        }

        debug!(
            target = %result.target,
            matched = result.region.len(),
            located = result.countries.len(),
            "geo classification finished"
        );
        result
    }
}
