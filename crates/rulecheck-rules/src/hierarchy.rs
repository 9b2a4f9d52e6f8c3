//! Parent/child domain aggregation.
//!
//! Every domain is grouped under its canonical parent (last two labels).
//! For label counts `3..=depth`, the matching suffixes are registered as the
//! parent's descendants, so a single successful parent query can validate
//! them all. This assumes descendants share the parent's DNS fate, which is
//! an approximation: it is configurable and can be disabled.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::domain::{canonical_parent, label_count, suffix};

/// Domains grouped under their canonical parents.
#[derive(Debug, Clone, Default)]
pub struct DomainHierarchy {
    depth: usize,
    parents: FxHashMap<String, FxHashSet<String>>,
}

impl DomainHierarchy {
    /// Build the hierarchy for a domain set.
    ///
    /// `depth` is the deepest label count registered as a descendant;
    /// values below 3 register parents only.
    pub fn build<'a, I>(domains: I, depth: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut parents: FxHashMap<String, FxHashSet<String>> = FxHashMap::default();
        for domain in domains {
            let descendants = parents
                .entry(canonical_parent(domain).to_string())
                .or_default();
            let labels = label_count(domain);
            for n in 3..=depth.min(labels) {
                descendants.insert(suffix(domain, n).to_string());
            }
        }
        Self { depth, parents }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_parent(&self, domain: &str) -> bool {
        self.parents.contains_key(domain)
    }

    pub fn parent_count(&self) -> usize {
        self.parents.len()
    }

    /// Registered parents, in no particular order.
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.parents.keys().map(String::as_str)
    }

    /// Descendants registered under `parent` (empty if it is not a parent).
    pub fn descendants(&self, parent: &str) -> impl Iterator<Item = &str> {
        self.parents
            .get(parent)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Check if a resolved parent would validate `domain`.
    pub fn covers(&self, domain: &str) -> bool {
        self.is_parent(domain)
            || self
                .parents
                .get(canonical_parent(domain))
                .is_some_and(|set| set.contains(domain))
    }

    /// Split `domains` into the queries to run.
    ///
    /// `primary` is every parent. `residual` holds the remaining domains:
    /// all of them when `query_leaves` is set (only those left unresolved
    /// after `primary` are queried), otherwise only the ones no parent
    /// covers. Both lists are sorted.
    pub fn query_plan<'a, I>(&self, domains: I, query_leaves: bool) -> QueryPlan
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut primary: Vec<String> = self.parents.keys().cloned().collect();
        let mut residual: Vec<String> = domains
            .into_iter()
            .filter(|d| !self.is_parent(d))
            .filter(|d| query_leaves || !self.covers(d))
            .map(str::to_string)
            .collect();
        primary.sort_unstable();
        residual.sort_unstable();
        residual.dedup();
        QueryPlan { primary, residual }
    }
}

/// Ordered query stages for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPlan {
    /// Queried first in every tier.
    pub primary: Vec<String>,
    /// Queried afterwards, skipping domains already validated.
    pub residual: Vec<String>,
}

impl QueryPlan {
    /// Plan without aggregation: every domain queried directly.
    pub fn flat<'a, I>(domains: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut primary: Vec<String> = domains.into_iter().map(str::to_string).collect();
        primary.sort_unstable();
        primary.dedup();
        Self {
            primary,
            residual: Vec::new(),
        }
    }

    /// Total number of planned domains across both stages.
    pub fn len(&self) -> usize {
        self.primary.len() + self.residual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.residual.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted<'a>(iter: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
        let mut v: Vec<_> = iter.collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn parents_and_descendants() {
        let h = DomainHierarchy::build(
            ["sub.cdn.example.com", "ads.example.com", "example.org"],
            4,
        );
        assert_eq!(sorted(h.parents()), ["example.com", "example.org"]);
        assert_eq!(
            sorted(h.descendants("example.com")),
            ["ads.example.com", "cdn.example.com", "sub.cdn.example.com"]
        );
        assert_eq!(h.descendants("example.org").count(), 0);
        assert_eq!(h.descendants("missing.net").count(), 0);
    }

    #[test]
    fn depth_caps_registration() {
        let h = DomainHierarchy::build(["a.b.c.example.com"], 4);
        assert_eq!(
            sorted(h.descendants("example.com")),
            ["b.c.example.com", "c.example.com"]
        );
        assert!(!h.covers("a.b.c.example.com"));
        assert!(h.covers("b.c.example.com"));
    }

    #[test]
    fn depth_below_three_registers_parents_only() {
        let h = DomainHierarchy::build(["ads.example.com"], 2);
        assert!(h.is_parent("example.com"));
        assert_eq!(h.descendants("example.com").count(), 0);
    }

    #[test]
    fn short_domains_are_their_own_parent() {
        let h = DomainHierarchy::build(["localhost", "example.com"], 4);
        assert!(h.is_parent("localhost"));
        assert!(h.is_parent("example.com"));
        assert_eq!(h.parent_count(), 2);
    }

    #[test]
    fn query_plan_with_leaf_fallback() {
        let domains = ["sub.cdn.example.com", "example.com", "a.b.c.d.example.net"];
        let h = DomainHierarchy::build(domains, 4);
        let plan = h.query_plan(domains, true);
        assert_eq!(plan.primary, ["example.com", "example.net"]);
        assert_eq!(plan.residual, ["a.b.c.d.example.net", "sub.cdn.example.com"]);
    }

    #[test]
    fn query_plan_without_leaf_fallback() {
        let domains = ["sub.cdn.example.com", "a.b.c.d.example.net"];
        let h = DomainHierarchy::build(domains, 4);
        let plan = h.query_plan(domains, false);
        assert_eq!(plan.primary, ["example.com", "example.net"]);
        // too deep to be covered by example.net
        assert_eq!(plan.residual, ["a.b.c.d.example.net"]);
    }

    #[test]
    fn flat_plan() {
        let plan = QueryPlan::flat(["b.example.com", "a.example.com", "b.example.com"]);
        assert_eq!(plan.primary, ["a.example.com", "b.example.com"]);
        assert!(plan.residual.is_empty());
        assert_eq!(plan.len(), 2);
    }
}
