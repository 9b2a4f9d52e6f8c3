//! Rule index: ordered rules, header comments, and the domain → rules map.

use std::path::Path;

use rulecheck_core::errors::ERROR_PARSE;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use crate::error::RulesError;
use crate::rule::{Rule, RuleKind};

/// Leading comment block of the merged input.
///
/// Entries are unique by exact text and kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct HeaderMetadata {
    entries: Vec<String>,
    seen: FxHashSet<String>,
}

impl HeaderMetadata {
    /// Append a comment unless the same text was already collected.
    ///
    /// Returns `true` if the entry was added.
    pub fn insert(&mut self, line: &str) -> bool {
        if self.seen.contains(line) {
            return false;
        }
        self.seen.insert(line.to_string());
        self.entries.push(line.to_string());
        true
    }

    pub fn contains(&self, line: &str) -> bool {
        self.seen.contains(line)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parsed view of one input snapshot.
///
/// Rules keep their input order. Comment lines before the first rule form
/// the [`HeaderMetadata`]; later comments stay in the body unless their text
/// was already seen. Invalid lines are counted and dropped.
#[derive(Debug, Default)]
pub struct RuleIndex {
    rules: Vec<Rule>,
    header: HeaderMetadata,
    header_closed: bool,
    body_comments: FxHashSet<String>,
    domains: FxHashMap<String, Vec<usize>>,
    total_rules: usize,
    invalid_rules: usize,
}

impl RuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole input buffer.
    pub fn parse(content: &str) -> Self {
        let mut index = Self::new();
        for line in content.lines() {
            index.push_line(line);
        }
        index
    }

    /// Read and parse a rule file.
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let content = std::fs::read_to_string(path)?;
        let index = Self::parse(&content);
        info!(
            path = %path.display(),
            total = index.total_rules(),
            valid = index.valid_rules(),
            domains = index.domain_count(),
            "parsed rule file"
        );
        Ok(index)
    }

    /// Classify one line and record it.
    pub fn push_line(&mut self, line: &str) {
        let rule = Rule::parse(line);
        if rule.text().is_empty() {
            return;
        }
        if rule.kind().is_comment() {
            self.push_comment(rule.text());
            return;
        }

        self.header_closed = true;
        self.total_rules += 1;

        if rule.kind().is_invalid() {
            self.invalid_rules += 1;
            debug!(line = %rule.text(), error_type = ERROR_PARSE, "dropping invalid rule");
            return;
        }

        if let Some(domain) = rule.domain() {
            self.domains
                .entry(domain.to_string())
                .or_default()
                .push(self.rules.len());
        }
        self.rules.push(rule);
    }

    fn push_comment(&mut self, text: &str) {
        if !self.header_closed {
            self.header.insert(text);
            return;
        }
        if self.header.contains(text) || !self.body_comments.insert(text.to_string()) {
            return;
        }
        self.rules.push(Rule::new(text, RuleKind::Comment));
    }

    /// Retained rules in input order (header comments excluded).
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn header(&self) -> &HeaderMetadata {
        &self.header
    }

    /// Non-comment lines seen, including invalid ones.
    pub fn total_rules(&self) -> usize {
        self.total_rules
    }

    /// Non-comment lines that were kept.
    pub fn valid_rules(&self) -> usize {
        self.total_rules - self.invalid_rules
    }

    pub fn invalid_rules(&self) -> usize {
        self.invalid_rules
    }

    /// Distinct domains referenced by rules.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    /// Indices into [`rules`](Self::rules) of the rules referencing `domain`.
    pub fn rules_for(&self, domain: &str) -> &[usize] {
        self.domains.get(domain).map(Vec::as_slice).unwrap_or_default()
    }

    /// Count of retained rules per kind label, sorted by label.
    pub fn kind_counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts: FxHashMap<&'static str, usize> = FxHashMap::default();
        for rule in &self.rules {
            *counts.entry(rule.kind().label()).or_default() += 1;
        }
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_unstable();
        counts
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn header_collected_until_first_rule() {
        let index = RuleIndex::parse(
            "! Title: upstream\n! Expires: 1 day\n||ads.example.com^\n! Late comment\n",
        );
        assert_eq!(
            index.header().entries(),
            ["! Title: upstream", "! Expires: 1 day"]
        );
        let texts: Vec<_> = index.rules().iter().map(Rule::text).collect();
        assert_eq!(texts, ["||ads.example.com^", "! Late comment"]);
    }

    #[test]
    fn header_deduplicated_in_first_seen_order() {
        let index = RuleIndex::parse("! a\n! b\n! a\n# c\n! b\n");
        assert_eq!(index.header().entries(), ["! a", "! b", "# c"]);
        assert!(index.rules().is_empty());
    }

    #[test]
    fn later_duplicate_comments_dropped() {
        let index = RuleIndex::parse("! a\n||x.example.com^\n! a\n! b\n! b\n");
        let texts: Vec<_> = index.rules().iter().map(Rule::text).collect();
        assert_eq!(texts, ["||x.example.com^", "! b"]);
    }

    #[test]
    fn blank_lines_ignored() {
        let index = RuleIndex::parse("! a\n\n   \n! b\n||x.example.com^\n\n");
        assert_eq!(index.header().entries(), ["! a", "! b"]);
        assert_eq!(index.total_rules(), 1);
        assert_eq!(index.rules().len(), 1);
    }

    #[test]
    fn counters_include_invalid_lines() {
        let index = RuleIndex::parse("||a.example.com^\nnot a rule at all\n/re/\nexample.com\n");
        assert_eq!(index.total_rules(), 4);
        assert_eq!(index.invalid_rules(), 2);
        assert_eq!(index.valid_rules(), 2);
        assert_eq!(index.rules().len(), 2);
    }

    #[test]
    fn domain_index_points_at_rules() {
        let index = RuleIndex::parse(
            "||ads.example.com^\n@@||ads.example.com^\n0.0.0.0 other.example.org\n",
        );
        assert_eq!(index.domain_count(), 2);
        assert_eq!(index.rules_for("ads.example.com"), [0, 1]);
        assert_eq!(index.rules_for("other.example.org"), [2]);
        assert!(index.rules_for("missing.example").is_empty());
    }

    #[test]
    fn empty_input() {
        let index = RuleIndex::parse("");
        assert_eq!(index.total_rules(), 0);
        assert!(index.rules().is_empty());
        assert!(index.header().is_empty());
    }

    #[test]
    fn kind_counts_sorted() {
        let index = RuleIndex::parse("||a.example.com^\n||b.example.com^\n/re/\n");
        assert_eq!(index.kind_counts(), [("blacklist", 2), ("regex", 1)]);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "! Title: file").unwrap();
        writeln!(file, "||ads.example.com^").unwrap();
        let index = RuleIndex::load(file.path()).unwrap();
        assert_eq!(index.valid_rules(), 1);
        assert_eq!(index.header().len(), 1);
    }

    #[test]
    fn load_missing_file() {
        let err = RuleIndex::load(Path::new("/nonexistent/rules.txt")).unwrap_err();
        assert!(matches!(err, RulesError::Io(_)));
    }
}
