//! Tier and engine configuration.

use rulecheck_core::defaults;
use serde::{Deserialize, Serialize};

/// One nameserver tier.
///
/// Tiers are queried strictly in order; a later tier only sees domains that
/// no earlier tier validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Name used in logs and reports.
    pub name: String,

    /// Nameserver addresses.
    ///
    /// Supported formats:
    /// - `"8.8.8.8"` or `"8.8.8.8:5353"`: plain UDP
    /// - `"udp://8.8.8.8"`, `"tcp://1.1.1.1:53"`: explicit transport
    /// - `"[2001:4860:4860::8888]:53"`: IPv6 literals must be bracketed
    ///   when a port is given
    ///
    /// When a port is omitted, `port` is used.
    pub servers: Vec<String>,

    /// Port for servers listed without one.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-query timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per query against the server group.
    #[serde(default = "default_attempts")]
    pub attempts: usize,
}

impl TierConfig {
    /// Tier with default port, timeout and attempts.
    pub fn new<I, S>(name: impl Into<String>, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            servers: servers.into_iter().map(Into::into).collect(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            attempts: default_attempts(),
        }
    }

    /// The default two-tier layout: regional resolvers, then global ones.
    pub fn default_tiers() -> Vec<Self> {
        vec![
            Self::new(
                defaults::DEFAULT_REGIONAL_TIER,
                defaults::DEFAULT_REGIONAL_SERVERS.iter().copied(),
            ),
            Self::new(
                defaults::DEFAULT_GLOBAL_TIER,
                defaults::DEFAULT_GLOBAL_SERVERS.iter().copied(),
            ),
        ]
    }
}

/// Resolution engine limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on in-flight queries (capped at
    /// [`MAX_CONCURRENCY_CAP`](defaults::MAX_CONCURRENCY_CAP)).
    pub max_concurrency: usize,
    /// Log progress every N completed lookups.
    pub progress_interval: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: defaults::DEFAULT_MAX_CONCURRENCY,
            progress_interval: defaults::DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

fn default_port() -> u16 {
    defaults::DEFAULT_DNS_PORT
}

fn default_timeout_secs() -> u64 {
    defaults::DEFAULT_QUERY_TIMEOUT_SECS
}

fn default_attempts() -> usize {
    defaults::DEFAULT_QUERY_ATTEMPTS
}
