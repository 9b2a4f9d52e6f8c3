//! Tiered resolution engine.
//!
//! One [`ResolutionEngine`] owns all per-run state: the success cache, the
//! validity map, and the per-tier reports. Within a stage every domain is a
//! task on a [`JoinSet`], gated by a shared [`Semaphore`]; tasks only return
//! their [`Resolution`] and the single consumer loop below applies it, so no
//! state is shared across tasks.

use std::net::Ipv4Addr;
use std::sync::Arc;

use rulecheck_core::defaults::MAX_CONCURRENCY_CAP;
use rulecheck_core::errors::{ERROR_RESOLUTION, ERROR_TIER_CONFIG, ERROR_TIMEOUT};
use rulecheck_rules::{DomainHierarchy, QueryPlan};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, TierConfig};
use crate::error::DnsError;
use crate::lookup::RecordLookup;
use crate::progress::Progress;
use crate::resolver::TierResolver;

/// Record type that answered a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    A,
    Aaaa,
}

/// Why a query produced no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupErrorKind {
    Timeout,
    Transport,
    /// The query task itself failed (panic or cancellation).
    Task,
}

impl LookupErrorKind {
    /// Stable label for logs and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Timeout => ERROR_TIMEOUT,
            Self::Transport | Self::Task => ERROR_RESOLUTION,
        }
    }
}

/// Outcome of querying one domain against one tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A or AAAA answered; `addresses` holds the IPv4 set for A answers and
    /// is empty for AAAA.
    Resolved {
        kind: RecordKind,
        addresses: Vec<Ipv4Addr>,
    },
    /// Both record types returned nothing.
    Unresolved,
    /// The lookup failed without a definitive answer.
    Error(LookupErrorKind),
}

/// How a domain became valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "via", content = "record", rename_all = "lowercase")]
pub enum ValidationSource {
    /// Queried and answered.
    Direct(RecordKind),
    /// Descendant of a parent that answered.
    Parent,
}

/// Validity of a domain: the first tier that validated it, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub tier: usize,
    pub source: ValidationSource,
}

/// Success cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDomain {
    pub kind: RecordKind,
    pub addresses: Vec<Ipv4Addr>,
    pub tier: usize,
}

/// Counters for one tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TierReport {
    pub name: String,
    /// Domains actually queried.
    pub queried: usize,
    pub resolved: usize,
    pub via_a: usize,
    pub via_aaaa: usize,
    /// Both record types empty.
    pub unresolved: usize,
    /// Timeouts and transport failures.
    pub errors: usize,
    /// Planned domains skipped because they were already valid.
    pub skipped: usize,
    /// Domains validated through a resolved parent.
    pub aggregated: usize,
    pub elapsed_ms: u64,
    /// Set when the tier could not be used at all.
    pub failure: Option<String>,
}

impl TierReport {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn merge(&mut self, other: TierReport) {
        self.queried += other.queried;
        self.resolved += other.resolved;
        self.via_a += other.via_a;
        self.via_aaaa += other.via_aaaa;
        self.unresolved += other.unresolved;
        self.errors += other.errors;
        self.skipped += other.skipped;
        self.aggregated += other.aggregated;
        self.elapsed_ms += other.elapsed_ms;
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Multi-tier DNS validation with a run-wide success cache.
#[derive(Debug)]
pub struct ResolutionEngine {
    max_concurrency: usize,
    progress_interval: usize,
    cache: FxHashMap<String, ResolvedDomain>,
    validity: FxHashMap<String, Validation>,
    queried: FxHashSet<String>,
    reports: Vec<TierReport>,
}

impl ResolutionEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrency.clamp(1, MAX_CONCURRENCY_CAP),
            progress_interval: config.progress_interval,
            cache: FxHashMap::default(),
            validity: FxHashMap::default(),
            queried: FxHashSet::default(),
            reports: Vec::new(),
        }
    }

    /// Effective in-flight limit.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Run every tier in order using hickory resolvers.
    pub async fn resolve_tiers(
        &mut self,
        tiers: &[TierConfig],
        plan: &QueryPlan,
        hierarchy: Option<&DomainHierarchy>,
    ) -> &[TierReport] {
        self.resolve_tiers_with(tiers, plan, hierarchy, |tier| {
            TierResolver::new(tier).map(|r| Arc::new(r) as Arc<dyn RecordLookup>)
        })
        .await
    }

    /// Run every tier in order, building each tier's lookup with `build`.
    ///
    /// Within a tier, `plan.primary` is resolved first, then the domains of
    /// `plan.residual` that are still not valid. A tier whose lookup cannot
    /// be built is recorded as failed and skipped.
    pub async fn resolve_tiers_with<F>(
        &mut self,
        tiers: &[TierConfig],
        plan: &QueryPlan,
        hierarchy: Option<&DomainHierarchy>,
        mut build: F,
    ) -> &[TierReport]
    where
        F: FnMut(&TierConfig) -> Result<Arc<dyn RecordLookup>, DnsError>,
    {
        for (index, tier) in tiers.iter().enumerate() {
            let lookup = match build(tier) {
                Ok(lookup) => lookup,
                Err(e) => {
                    warn!(
                        tier = %tier.name,
                        error = %e,
                        error_type = ERROR_TIER_CONFIG,
                        "tier unavailable, skipping"
                    );
                    let mut report = TierReport::new(&tier.name);
                    report.failure = Some(e.to_string());
                    self.reports.push(report);
                    continue;
                }
            };

            let mut report = self
                .resolve_tier(index, &tier.name, lookup.clone(), &plan.primary, hierarchy)
                .await;
            if !plan.residual.is_empty() {
                let residual = self
                    .resolve_tier(index, &tier.name, lookup, &plan.residual, hierarchy)
                    .await;
                report.merge(residual);
            }

            info!(
                tier = %report.name,
                queried = report.queried,
                resolved = report.resolved,
                via_a = report.via_a,
                via_aaaa = report.via_aaaa,
                aggregated = report.aggregated,
                errors = report.errors,
                elapsed_ms = report.elapsed_ms,
                "tier finished"
            );
            self.reports.push(report);
        }
        &self.reports
    }

    /// Resolve one batch of domains against one tier.
    ///
    /// Domains already cached or valid are skipped. When `hierarchy` is
    /// given, a resolved parent validates all its registered descendants.
    pub async fn resolve_tier(
        &mut self,
        tier_index: usize,
        tier_name: &str,
        lookup: Arc<dyn RecordLookup>,
        domains: &[String],
        hierarchy: Option<&DomainHierarchy>,
    ) -> TierReport {
        let mut report = TierReport::new(tier_name);
        let pending: Vec<&String> = domains
            .iter()
            .filter(|d| !self.cache.contains_key(d.as_str()))
            .filter(|d| !self.validity.contains_key(d.as_str()))
            .collect();
        report.skipped = domains.len() - pending.len();
        if pending.is_empty() {
            return report;
        }

        let permits = pending.len().clamp(1, self.max_concurrency);
        let semaphore = Arc::new(Semaphore::new(permits));
        let mut tasks = JoinSet::new();
        let mut names: FxHashMap<Id, String> = FxHashMap::default();

        for domain in pending {
            let semaphore = semaphore.clone();
            let lookup = lookup.clone();
            let owned = domain.clone();
            let handle = tasks.spawn(async move {
                // The semaphore is never closed while tasks are alive.
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (owned, Resolution::Error(LookupErrorKind::Task));
                };
                let resolution = query_domain(lookup.as_ref(), &owned).await;
                (owned, resolution)
            });
            names.insert(handle.id(), domain.clone());
            self.queried.insert(domain.clone());
        }

        report.queried = names.len();
        let mut progress = Progress::new(tier_name, report.queried, self.progress_interval);

        while let Some(joined) = tasks.join_next_with_id().await {
            let (domain, resolution) = match joined {
                Ok((_, outcome)) => outcome,
                Err(e) => {
                    let Some(domain) = names.get(&e.id()).cloned() else {
                        continue;
                    };
                    warn!(domain = %domain, error = %e, "lookup task failed");
                    (domain, Resolution::Error(LookupErrorKind::Task))
                }
            };
            let in_flight = permits - semaphore.available_permits();
            self.apply(tier_index, domain, resolution, hierarchy, &mut report);
            progress.complete(in_flight);
        }

        report.elapsed_ms = progress.elapsed().as_millis() as u64;
        report
    }

    fn apply(
        &mut self,
        tier: usize,
        domain: String,
        resolution: Resolution,
        hierarchy: Option<&DomainHierarchy>,
        report: &mut TierReport,
    ) {
        match resolution {
            Resolution::Resolved { kind, addresses } => {
                report.resolved += 1;
                match kind {
                    RecordKind::A => report.via_a += 1,
                    RecordKind::Aaaa => report.via_aaaa += 1,
                }
                self.validity.entry(domain.clone()).or_insert(Validation {
                    tier,
                    source: ValidationSource::Direct(kind),
                });
                if let Some(hierarchy) = hierarchy
                    && hierarchy.is_parent(&domain)
                {
                    for descendant in hierarchy.descendants(&domain) {
                        if self.validity.contains_key(descendant) {
                            continue;
                        }
                        self.validity.insert(
                            descendant.to_string(),
                            Validation {
                                tier,
                                source: ValidationSource::Parent,
                            },
                        );
                        report.aggregated += 1;
                    }
                }
                self.cache.insert(
                    domain,
                    ResolvedDomain {
                        kind,
                        addresses,
                        tier,
                    },
                );
            }
            Resolution::Unresolved => {
                report.unresolved += 1;
                debug!(domain = %domain, tier, "no records");
            }
            Resolution::Error(kind) => {
                report.errors += 1;
                debug!(domain = %domain, tier, error_type = kind.label(), "lookup failed");
            }
        }
    }

    /// Every valid domain.
    pub fn validity(&self) -> &FxHashMap<String, Validation> {
        &self.validity
    }

    pub fn is_valid(&self, domain: &str) -> bool {
        self.validity.contains_key(domain)
    }

    /// Domains answered directly, with their addresses.
    pub fn cached(&self) -> &FxHashMap<String, ResolvedDomain> {
        &self.cache
    }

    /// IPv4 addresses of every domain answered with A records.
    pub fn ipv4_addresses(&self) -> impl Iterator<Item = (&str, &[Ipv4Addr])> {
        self.cache
            .iter()
            .filter(|(_, r)| !r.addresses.is_empty())
            .map(|(d, r)| (d.as_str(), r.addresses.as_slice()))
    }

    /// Distinct domains queried in any tier.
    pub fn queried_count(&self) -> usize {
        self.queried.len()
    }

    pub fn reports(&self) -> &[TierReport] {
        &self.reports
    }
}

/// A first, AAAA as fallback. Never fails: errors become a `Resolution`.
async fn query_domain(lookup: &dyn RecordLookup, domain: &str) -> Resolution {
    let a_error = match lookup.lookup_a(domain).await {
        Ok(addresses) if !addresses.is_empty() => {
            return Resolution::Resolved {
                kind: RecordKind::A,
                addresses,
            };
        }
        Ok(_) => None,
        Err(e) => error_kind(&e),
    };

    let aaaa_error = match lookup.lookup_aaaa(domain).await {
        Ok(addresses) if !addresses.is_empty() => {
            return Resolution::Resolved {
                kind: RecordKind::Aaaa,
                addresses: Vec::new(),
            };
        }
        Ok(_) => None,
        Err(e) => error_kind(&e),
    };

    match a_error.or(aaaa_error) {
        Some(kind) => Resolution::Error(kind),
        None => Resolution::Unresolved,
    }
}

/// `None` for definitive negative answers.
fn error_kind(err: &DnsError) -> Option<LookupErrorKind> {
    match err {
        DnsError::NoRecords(_) => None,
        DnsError::Timeout(_) => Some(LookupErrorKind::Timeout),
        DnsError::Lookup(_) | DnsError::InvalidServer(_) => Some(LookupErrorKind::Transport),
    }
}
