//! Domain name helpers.
//!
//! Domains are handled as lowercase ASCII strings. Labels are counted from the
//! right, so `suffix("a.b.example.com", 2)` is `"example.com"`.

/// Maximum length of a domain name in presentation format.
pub const MAX_DOMAIN_LEN: usize = 253;
/// Maximum length of a single label.
pub const MAX_LABEL_LEN: usize = 63;

/// Validate and normalize a domain extracted from a rule.
///
/// Strips one trailing dot and lowercases the name. Returns `None` for
/// empty names, empty labels, over-long names or labels, and any character
/// outside `[A-Za-z0-9_-]`. Non-ASCII names are rejected; punycode labels
/// (`xn--…`) pass through unchanged.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let name = raw.strip_suffix('.').unwrap_or(raw);
    if name.is_empty() || name.len() > MAX_DOMAIN_LEN || !name.is_ascii() {
        return None;
    }

    let labels_ok = name.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && label
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    });
    labels_ok.then(|| name.to_ascii_lowercase())
}

/// Number of dot-separated labels.
pub fn label_count(domain: &str) -> usize {
    domain.split('.').count()
}

/// The last `labels` labels of `domain`, or the whole name if it has fewer.
pub fn suffix(domain: &str, labels: usize) -> &str {
    if labels == 0 {
        return "";
    }
    let mut remaining = labels;
    for (pos, byte) in domain.bytes().enumerate().rev() {
        if byte == b'.' {
            remaining -= 1;
            if remaining == 0 {
                return &domain[pos + 1..];
            }
        }
    }
    domain
}

/// Canonical aggregation parent: the last two labels.
///
/// This approximates the registrable domain without a public-suffix list,
/// so `a.example.co.uk` maps to `co.uk`.
pub fn canonical_parent(domain: &str) -> &str {
    suffix(domain, 2)
}
