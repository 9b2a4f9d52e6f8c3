//! Rule type definitions.

use crate::parser::classify_line;

/// Classification of a single input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// Blank line or a line starting with a comment marker.
    Comment,
    /// `/…/` regular-expression rule. Never resolved, always kept.
    Regex,
    /// Rule containing a `*` wildcard. Never resolved, always kept.
    Wildcard,
    /// `@@||domain^` exception rule.
    Whitelist(String),
    /// `||domain^` blocking rule.
    Blacklist(String),
    /// Hosts-style `address domain` line.
    PlainDomain(String),
    /// dnsmasq `address=/domain/…`, `local=/domain/` or `server=/domain/…`.
    Dnsmasq(String),
    /// Network rule whose target is an IP address rather than a name.
    IpLiteral,
    /// Unrecognized or malformed line. Dropped.
    Invalid,
}

impl RuleKind {
    /// Domain referenced by this rule, if any.
    pub fn domain(&self) -> Option<&str> {
        match self {
            RuleKind::Whitelist(d)
            | RuleKind::Blacklist(d)
            | RuleKind::PlainDomain(d)
            | RuleKind::Dnsmasq(d) => Some(d),
            _ => None,
        }
    }

    /// Check if this is a comment line.
    pub fn is_comment(&self) -> bool {
        matches!(self, RuleKind::Comment)
    }

    /// Check if this line was rejected by the parser.
    pub fn is_invalid(&self) -> bool {
        matches!(self, RuleKind::Invalid)
    }

    /// Short label for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::Comment => "comment",
            RuleKind::Regex => "regex",
            RuleKind::Wildcard => "wildcard",
            RuleKind::Whitelist(_) => "whitelist",
            RuleKind::Blacklist(_) => "blacklist",
            RuleKind::PlainDomain(_) => "hosts",
            RuleKind::Dnsmasq(_) => "dnsmasq",
            RuleKind::IpLiteral => "ip",
            RuleKind::Invalid => "invalid",
        }
    }
}

/// A rule line together with its classification.
///
/// The text is kept verbatim (minus surrounding whitespace) so output
/// artifacts reproduce the input exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    text: String,
    kind: RuleKind,
}

impl Rule {
    pub fn new(text: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// Trim and classify a raw input line.
    pub fn parse(line: &str) -> Self {
        let text = line.trim();
        Self::new(text, classify_line(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn domain(&self) -> Option<&str> {
        self.kind.domain()
    }
}
