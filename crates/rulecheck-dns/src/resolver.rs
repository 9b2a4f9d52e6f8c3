//! Per-tier resolver backed by hickory-resolver.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use hickory_proto::ProtoErrorKind;
use hickory_proto::xfer::Protocol;
use hickory_resolver::config::{
    NameServerConfig, NameServerConfigGroup, ResolverConfig, ResolverOpts,
};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::{ResolveError, ResolveErrorKind, Resolver};
use tracing::debug;

use crate::config::TierConfig;
use crate::error::DnsError;
use crate::lookup::RecordLookup;

/// Resolver bound to one tier's nameserver group.
///
/// The hickory cache is disabled: the engine keeps its own success cache
/// and negative answers must not survive into later tiers.
pub struct TierResolver {
    name: String,
    resolver: Resolver<TokioConnectionProvider>,
    deadline: Duration,
}

impl std::fmt::Debug for TierResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TierResolver")
            .field("name", &self.name)
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl TierResolver {
    /// Build a resolver from a tier definition.
    ///
    /// Fails with [`DnsError::InvalidServer`] when the server list is empty
    /// or an entry cannot be parsed.
    pub fn new(tier: &TierConfig) -> Result<Self, DnsError> {
        let name_servers = parse_server_urls(&tier.servers, tier.port)?;
        let server_count = name_servers.len();
        let resolver_config = ResolverConfig::from_parts(None, vec![], name_servers);

        let timeout = Duration::from_secs(tier.timeout_secs.max(1));
        let attempts = tier.attempts.max(1);
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = attempts;
        opts.cache_size = 0;

        let mut builder =
            Resolver::builder_with_config(resolver_config, TokioConnectionProvider::default());
        *builder.options_mut() = opts;

        // Hard stop in case the resolver walks every server in turn.
        let rounds = u32::try_from(attempts.saturating_mul(server_count)).unwrap_or(u32::MAX);
        let deadline = timeout
            .saturating_mul(rounds)
            .saturating_add(Duration::from_secs(1));

        debug!(tier = %tier.name, servers = server_count, ?deadline, "tier resolver built");
        Ok(Self {
            name: tier.name.clone(),
            resolver: builder.build(),
            deadline,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl RecordLookup for TierResolver {
    async fn lookup_a(&self, domain: &str) -> Result<Vec<Ipv4Addr>, DnsError> {
        let fqdn = format!("{domain}.");
        let lookup = tokio::time::timeout(self.deadline, self.resolver.ipv4_lookup(fqdn))
            .await
            .map_err(|_| DnsError::Timeout(domain.to_string()))?
            .map_err(|e| map_resolve_error(domain, e))?;
        Ok(lookup.iter().map(|a| a.0).collect())
    }

    async fn lookup_aaaa(&self, domain: &str) -> Result<Vec<Ipv6Addr>, DnsError> {
        let fqdn = format!("{domain}.");
        let lookup = tokio::time::timeout(self.deadline, self.resolver.ipv6_lookup(fqdn))
            .await
            .map_err(|_| DnsError::Timeout(domain.to_string()))?
            .map_err(|e| map_resolve_error(domain, e))?;
        Ok(lookup.iter().map(|aaaa| aaaa.0).collect())
    }
}

/// Separate "no such records" and timeouts from transport failures.
fn map_resolve_error(domain: &str, err: ResolveError) -> DnsError {
    if err.is_no_records_found() {
        return DnsError::NoRecords(domain.to_string());
    }
    if let ResolveErrorKind::Proto(proto) = err.kind()
        && matches!(proto.kind(), ProtoErrorKind::Timeout)
    {
        return DnsError::Timeout(domain.to_string());
    }
    DnsError::Lookup(err)
}

/// Parse nameserver strings into a hickory `NameServerConfigGroup`.
fn parse_server_urls(
    urls: &[String],
    default_port: u16,
) -> Result<NameServerConfigGroup, DnsError> {
    if urls.is_empty() {
        return Err(DnsError::InvalidServer("no nameservers configured".to_string()));
    }

    let mut configs = Vec::with_capacity(urls.len());
    for url in urls {
        let (protocol, rest) = match url.split_once("://") {
            Some(("udp", rest)) => (Protocol::Udp, rest),
            Some(("tcp", rest)) => (Protocol::Tcp, rest),
            Some((scheme, _)) => {
                return Err(DnsError::InvalidServer(format!(
                    "unsupported scheme '{scheme}': {url}"
                )));
            }
            None => (Protocol::Udp, url.as_str()),
        };
        if rest.contains('/') {
            return Err(DnsError::InvalidServer(format!("unexpected path: {url}")));
        }

        configs.push(NameServerConfig {
            socket_addr: parse_socket_addr(rest, default_port)?,
            protocol,
            tls_dns_name: None,
            http_endpoint: None,
            trust_negative_responses: false,
            bind_addr: None,
        });
    }

    Ok(NameServerConfigGroup::from(configs))
}

/// Parse `"ip"`, `"ip:port"`, `"[v6]"` or `"[v6]:port"`.
fn parse_socket_addr(s: &str, default_port: u16) -> Result<SocketAddr, DnsError> {
    if let Ok(sa) = s.parse::<SocketAddr>() {
        return Ok(sa);
    }
    if let Ok(ip) = s.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, default_port));
    }
    if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']'))
        && let Ok(ip) = inner.parse::<Ipv6Addr>()
    {
        return Ok(SocketAddr::new(IpAddr::V6(ip), default_port));
    }
    Err(DnsError::InvalidServer(format!(
        "nameserver must be an IP address with optional port: {s}"
    )))
}
