//! Line classifier for merged ad-block lists.
//!
//! Understands adblock DNS syntax (`||domain^`, `@@||domain^`, `/regex/`),
//! hosts files (`0.0.0.0 domain`), and dnsmasq directives
//! (`address=/domain/ip`).

pub mod adblock;
pub mod dnsmasq;
pub mod hosts;

use std::net::IpAddr;

use crate::domain::normalize_domain;
use crate::rule::RuleKind;

/// Line prefixes treated as comments (`!` adblock, `#` hosts/dnsmasq).
pub const COMMENT_MARKERS: [char; 2] = ['!', '#'];

/// Check if a trimmed line is blank or a comment.
pub fn is_comment(line: &str) -> bool {
    line.is_empty() || line.starts_with(COMMENT_MARKERS)
}

/// Classify a single line.
///
/// The line is trimmed first. Checks run in order: comment, regex, wildcard,
/// adblock network rule, dnsmasq directive, hosts entry. Anything left over
/// is [`RuleKind::Invalid`].
pub fn classify_line(line: &str) -> RuleKind {
    let line = line.trim();
    if is_comment(line) {
        return RuleKind::Comment;
    }
    if is_regex(line) {
        return RuleKind::Regex;
    }
    if line.contains('*') {
        return RuleKind::Wildcard;
    }
    adblock::parse_network_rule(line)
        .or_else(|| dnsmasq::parse_directive(line))
        .or_else(|| hosts::parse_hosts_line(line))
        .unwrap_or(RuleKind::Invalid)
}

/// `/…/`, optionally followed by `$options`.
fn is_regex(line: &str) -> bool {
    line.starts_with('/') && line.rfind('/').is_some_and(|end| end > 0)
}

/// Build a domain-bearing kind from a rule target.
///
/// IP literals become [`RuleKind::IpLiteral`]; names failing validation
/// become [`RuleKind::Invalid`].
fn target_kind(target: &str, make: fn(String) -> RuleKind) -> RuleKind {
    if target.parse::<IpAddr>().is_ok() {
        return RuleKind::IpLiteral;
    }
    normalize_domain(target).map_or(RuleKind::Invalid, make)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blank_lines() {
        assert_eq!(classify_line(""), RuleKind::Comment);
        assert_eq!(classify_line("   "), RuleKind::Comment);
        assert_eq!(classify_line("! Title: x"), RuleKind::Comment);
        assert_eq!(classify_line("# hosts comment"), RuleKind::Comment);
    }

    #[test]
    fn regex_rules() {
        assert_eq!(classify_line(r"/^ad[0-9]+\./"), RuleKind::Regex);
        assert_eq!(classify_line(r"/banner/$important"), RuleKind::Regex);
        assert_eq!(classify_line("/"), RuleKind::Invalid);
    }

    #[test]
    fn wildcard_rules() {
        assert_eq!(classify_line("||ad*.example.com^"), RuleKind::Wildcard);
        assert_eq!(classify_line("@@||*.cdn.example.com^"), RuleKind::Wildcard);
    }

    #[test]
    fn regex_wins_over_wildcard() {
        assert_eq!(classify_line(r"/ads?.*\.example/"), RuleKind::Regex);
    }

    #[test]
    fn network_rules() {
        assert_eq!(
            classify_line("||ads.example^"),
            RuleKind::Blacklist("ads.example".into())
        );
        assert_eq!(
            classify_line("@@||good.example^"),
            RuleKind::Whitelist("good.example".into())
        );
    }

    #[test]
    fn dnsmasq_and_hosts() {
        assert_eq!(
            classify_line("address=/ads.example.com/0.0.0.0"),
            RuleKind::Dnsmasq("ads.example.com".into())
        );
        assert_eq!(
            classify_line("0.0.0.0 tracker.example.com"),
            RuleKind::PlainDomain("tracker.example.com".into())
        );
    }

    #[test]
    fn everything_else_is_invalid() {
        assert_eq!(classify_line("example.com"), RuleKind::Invalid);
        assert_eq!(classify_line("##.banner"), RuleKind::Comment);
        assert_eq!(classify_line("example.com##.banner"), RuleKind::Invalid);
        assert_eq!(classify_line("a b c"), RuleKind::Invalid);
    }

    #[test]
    fn ip_literal_targets() {
        assert_eq!(classify_line("||10.0.0.1^"), RuleKind::IpLiteral);
        assert_eq!(classify_line("@@||192.168.1.1^"), RuleKind::IpLiteral);
    }
}
