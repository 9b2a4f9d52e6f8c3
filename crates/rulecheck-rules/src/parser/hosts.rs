//! Hosts-file entries (`0.0.0.0 ads.example.com`).

use std::net::IpAddr;

use crate::domain::normalize_domain;
use crate::rule::RuleKind;

/// Host names that appear in stock hosts files and never name a real target.
const RESERVED_HOSTS: &[&str] = &[
    "localhost",
    "localhost.localdomain",
    "local",
    "broadcasthost",
    "ip6-localhost",
    "ip6-loopback",
    "ip6-localnet",
    "ip6-mcastprefix",
    "ip6-allnodes",
    "ip6-allrouters",
    "ip6-allhosts",
];

/// Parse a two-token hosts line, ignoring an inline `#` comment.
///
/// Returns `None` unless the line has exactly two tokens. The second token
/// is the domain; reserved names and address literals are `Invalid`.
pub fn parse_hosts_line(line: &str) -> Option<RuleKind> {
    let content = line.split_once('#').map_or(line, |(content, _)| content);
    let mut tokens = content.split_whitespace();
    let (Some(_address), Some(host), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return None;
    };

    if host.parse::<IpAddr>().is_ok() || RESERVED_HOSTS.contains(&host) {
        return Some(RuleKind::Invalid);
    }
    Some(normalize_domain(host).map_or(RuleKind::Invalid, RuleKind::PlainDomain))
}
