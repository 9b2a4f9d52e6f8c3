//! dnsmasq directives: `address=/domain/ip`, `local=/domain/`,
//! `server=/domain/upstream`.

use crate::rule::RuleKind;

use super::target_kind;

const DIRECTIVES: [&str; 3] = ["address=/", "local=/", "server=/"];

/// Parse a dnsmasq directive, taking the first domain between slashes.
pub fn parse_directive(line: &str) -> Option<RuleKind> {
    let rest = DIRECTIVES
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))?;
    let kind = match rest.split_once('/') {
        Some((domain, _)) => match target_kind(domain, RuleKind::Dnsmasq) {
            // address literals are not dnsmasq domain keys
            RuleKind::IpLiteral => RuleKind::Invalid,
            kind => kind,
        },
        None => RuleKind::Invalid,
    };
    Some(kind)
}
