//! Adblock DNS network rules (`||domain^`, `@@||domain^$important`).

use crate::rule::RuleKind;

use super::target_kind;

/// Parse an adblock network rule.
///
/// Returns `None` when the line is not a network rule at all, so the caller
/// can try other dialects. The target runs up to the first `^` or `$`; a
/// `^` may only be followed by an option list (`$…`). Without a terminator
/// the remainder of the line is the target.
pub fn parse_network_rule(line: &str) -> Option<RuleKind> {
    if let Some(body) = line.strip_prefix("@@||") {
        return Some(parse_body(body, RuleKind::Whitelist));
    }
    if let Some(body) = line.strip_prefix("||") {
        return Some(parse_body(body, RuleKind::Blacklist));
    }
    None
}

fn parse_body(body: &str, make: fn(String) -> RuleKind) -> RuleKind {
    let end = body.find(['^', '$']).unwrap_or(body.len());
    let (target, tail) = body.split_at(end);
    if let Some(after_caret) = tail.strip_prefix('^')
        && !(after_caret.is_empty() || after_caret.starts_with('$'))
    {
        return RuleKind::Invalid;
    }
    target_kind(target, make)
}
