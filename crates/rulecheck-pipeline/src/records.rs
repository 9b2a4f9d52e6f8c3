//! Per-domain run records.

use std::net::Ipv4Addr;

use rulecheck_dns::{RecordKind, ResolutionEngine, ValidationSource};
use rulecheck_rules::domain::canonical_parent;
use rulecheck_rules::{Classification, RuleIndex};
use serde::Serialize;

/// Final resolution state of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainState {
    Unresolved,
    ResolvedA,
    ResolvedAaaa,
    ResolvedViaParent,
}

/// Everything known about one referenced domain after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainRecord {
    pub domain: String,
    /// Indices into the parsed rule list.
    pub rules: Vec<usize>,
    pub parent: String,
    pub state: DomainState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Ipv4Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Index of the tier that validated the domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<usize>,
}

impl DomainRecord {
    pub fn is_valid(&self) -> bool {
        self.state != DomainState::Unresolved
    }
}

/// One record per indexed domain, sorted by domain.
pub fn build_records(
    index: &RuleIndex,
    engine: &ResolutionEngine,
    classification: Option<&Classification>,
) -> Vec<DomainRecord> {
    let mut records: Vec<DomainRecord> = index
        .domains()
        .map(|domain| {
            let validation = engine.validity().get(domain);
            let state = match validation.map(|v| v.source) {
                None => DomainState::Unresolved,
                Some(ValidationSource::Direct(RecordKind::A)) => DomainState::ResolvedA,
                Some(ValidationSource::Direct(RecordKind::Aaaa)) => DomainState::ResolvedAaaa,
                Some(ValidationSource::Parent) => DomainState::ResolvedViaParent,
            };
            DomainRecord {
                domain: domain.to_string(),
                rules: index.rules_for(domain).to_vec(),
                parent: canonical_parent(domain).to_string(),
                state,
                addresses: engine
                    .cached()
                    .get(domain)
                    .map(|r| r.addresses.clone())
                    .unwrap_or_default(),
                country: classification
                    .and_then(|c| c.country_of(domain))
                    .map(str::to_string),
                tier: validation.map(|v| v.tier),
            }
        })
        .collect();
    records.sort_unstable_by(|a, b| a.domain.cmp(&b.domain));
    records
}
