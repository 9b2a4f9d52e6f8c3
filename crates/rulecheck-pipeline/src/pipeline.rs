//! One batch validation run.

use std::path::Path;
use std::sync::Arc;

use rulecheck_config::{ArtifactConfig, ArtifactKind, Config, ConfigError};
use rulecheck_core::errors::ERROR_CLASSIFICATION;
use rulecheck_dns::{DnsError, RecordLookup, ResolutionEngine, TierConfig};
use rulecheck_rules::{Classification, CountryLookup, DomainHierarchy, QueryPlan, RuleIndex};
use time::{OffsetDateTime, UtcOffset};
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::geo;
use crate::output::{HeaderFields, render, retain, write_artifact};
use crate::records::{DomainRecord, build_records};
use crate::stats::{ArtifactReport, RunReport, RunStats};

/// Builds the record lookup for one tier.
pub type ResolverFactory =
    Box<dyn Fn(&TierConfig) -> Result<Arc<dyn RecordLookup>, DnsError> + Send + Sync>;

/// Result of a completed run.
#[derive(Debug)]
pub struct RunOutcome {
    pub stats: RunStats,
    pub records: Vec<DomainRecord>,
}

/// Parse → resolve → classify → write, driven by a [`Config`].
///
/// Resolvers default to hickory against each tier's nameservers and the
/// country database to `geoip.path`; both can be replaced.
pub struct Pipeline {
    config: Config,
    resolver_factory: Option<ResolverFactory>,
    country_lookup: Option<Arc<dyn CountryLookup>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("custom_resolver", &self.resolver_factory.is_some())
            .field("custom_country_lookup", &self.country_lookup.is_some())
            .finish()
    }
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            resolver_factory: None,
            country_lookup: None,
        }
    }

    /// Replace the hickory resolvers.
    pub fn with_resolver_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&TierConfig) -> Result<Arc<dyn RecordLookup>, DnsError> + Send + Sync + 'static,
    {
        self.resolver_factory = Some(Box::new(factory));
        self
    }

    /// Use `lookup` instead of opening `geoip.path`.
    pub fn with_country_lookup(mut self, lookup: impl CountryLookup + 'static) -> Self {
        self.country_lookup = Some(Arc::new(lookup));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute the run.
    ///
    /// Only an unreadable input (or an unusable header offset) fails the
    /// run. Tier, classification, and per-artifact failures are reported in
    /// the returned statistics.
    pub async fn run(&self) -> Result<RunOutcome, PipelineError> {
        let config = &self.config;
        let offset = UtcOffset::from_hms(config.output.utc_offset_hours, 0, 0).map_err(|e| {
            ConfigError::Validation(format!("output.utc_offset_hours: {e}"))
        })?;

        let index = RuleIndex::load(Path::new(&config.input.path)).map_err(PipelineError::Input)?;

        let (hierarchy, plan) = if config.hierarchy.enabled {
            let hierarchy = DomainHierarchy::build(index.domains(), config.hierarchy.depth);
            let plan = hierarchy.query_plan(index.domains(), config.hierarchy.query_leaves);
            info!(
                domains = index.domain_count(),
                parents = hierarchy.parent_count(),
                depth = hierarchy.depth(),
                residual = plan.residual.len(),
                "query plan built"
            );
            (Some(hierarchy), plan)
        } else {
            (None, QueryPlan::flat(index.domains()))
        };

        let mut engine = ResolutionEngine::new(&config.resolver.engine_config());
        match &self.resolver_factory {
            Some(factory) => {
                engine
                    .resolve_tiers_with(&config.resolver.tiers, &plan, hierarchy.as_ref(), |t| {
                        factory(t)
                    })
                    .await;
            }
            None => {
                engine
                    .resolve_tiers(&config.resolver.tiers, &plan, hierarchy.as_ref())
                    .await;
            }
        }

        let classification = self.classify(&index, &engine);
        let records = build_records(&index, &engine, classification.as_ref());

        let now = OffsetDateTime::now_utc();
        let mut artifacts = Vec::with_capacity(config.output.artifacts.len());
        for artifact in &config.output.artifacts {
            let report = self
                .emit(artifact, &index, &engine, classification.as_ref(), offset, now)
                .await;
            artifacts.push(report);
        }

        let stats = RunStats {
            total_rules: index.total_rules(),
            valid_rules: index.valid_rules(),
            invalid_rules: index.invalid_rules(),
            header_comments: index.header().len(),
            domains: index.domain_count(),
            domains_queried: engine.queried_count(),
            domains_resolved: records.iter().filter(|r| r.is_valid()).count(),
            region_domains: classification.as_ref().map(Classification::len),
            tiers: engine.reports().to_vec(),
            artifacts,
        };

        if let Some(path) = &config.output.report
            && let Err(e) = write_report(Path::new(path), &stats, &records).await
        {
            warn!(
                path = %path,
                error = %e,
                error_type = e.error_type(),
                "failed to write run report"
            );
        }

        info!(
            total = stats.total_rules,
            valid = stats.valid_rules,
            invalid = stats.invalid_rules,
            resolved = stats.domains_resolved,
            "run finished"
        );
        Ok(RunOutcome { stats, records })
    }

    /// Region classification, when any region artifact is configured.
    fn classify(&self, index: &RuleIndex, engine: &ResolutionEngine) -> Option<Classification> {
        let wanted = self
            .config
            .output
            .artifacts
            .iter()
            .any(|a| a.kind == ArtifactKind::Region);
        if !wanted {
            return None;
        }

        let lookup = match (&self.country_lookup, &self.config.geoip.path) {
            (Some(lookup), _) => lookup.clone(),
            (None, Some(path)) => match geo::open_database(path) {
                Ok(lookup) => lookup,
                Err(e) => {
                    let e = PipelineError::Classification(e);
                    warn!(
                        error = %e,
                        error_type = ERROR_CLASSIFICATION,
                        "region artifacts skipped"
                    );
                    return None;
                }
            },
            (None, None) => {
                warn!(
                    error_type = ERROR_CLASSIFICATION,
                    "no geoip database, region artifacts skipped"
                );
                return None;
            }
        };

        let classification = geo::classify(lookup, index, engine, &self.config.geoip.region);
        info!(
            region = classification.target(),
            domains = classification.len(),
            "region classification done"
        );
        Some(classification)
    }

    async fn emit(
        &self,
        artifact: &ArtifactConfig,
        index: &RuleIndex,
        engine: &ResolutionEngine,
        classification: Option<&Classification>,
        offset: UtcOffset,
        now: OffsetDateTime,
    ) -> ArtifactReport {
        let validity = engine.validity();
        let retained = match artifact.kind {
            ArtifactKind::Full => retain(index.rules(), |d| validity.contains_key(d)),
            ArtifactKind::Lite => {
                retain(index.rules(), |d| validity.get(d).is_some_and(|v| v.tier == 0))
            }
            ArtifactKind::Region => match classification {
                Some(region) => retain(index.rules(), |d| region.contains(d)),
                None => {
                    return ArtifactReport {
                        kind: artifact.kind,
                        path: artifact.path.clone(),
                        rules: 0,
                        error: Some("skipped: classification unavailable".to_string()),
                    };
                }
            },
        };

        let output = &self.config.output;
        let fields = HeaderFields {
            title: artifact.title.as_deref().unwrap_or(&output.title),
            homepage: &output.homepage,
            marker: artifact
                .comment_marker
                .as_deref()
                .unwrap_or(&output.comment_marker),
            offset,
        };
        let written = match render(&fields, index.header(), &retained, now) {
            Ok(contents) => write_artifact(Path::new(&artifact.path), &contents)
                .await
                .map_err(|source| PipelineError::Output {
                    path: artifact.path.clone(),
                    source,
                }),
            Err(e) => Err(PipelineError::Format(e)),
        };
        artifact_report(artifact, retained.len(), written)
    }
}

fn artifact_report(
    artifact: &ArtifactConfig,
    rules: usize,
    written: Result<(), PipelineError>,
) -> ArtifactReport {
    let error = match written {
        Ok(()) => {
            info!(
                path = %artifact.path,
                kind = ?artifact.kind,
                rules,
                "artifact written"
            );
            None
        }
        Err(e) => {
            warn!(
                path = %artifact.path,
                error = %e,
                error_type = e.error_type(),
                "artifact not written"
            );
            Some(e.to_string())
        }
    };

    ArtifactReport {
        kind: artifact.kind,
        path: artifact.path.clone(),
        rules,
        error,
    }
}

async fn write_report(
    path: &Path,
    stats: &RunStats,
    records: &[DomainRecord],
) -> Result<(), PipelineError> {
    let report = RunReport {
        stats,
        domains: records,
    };
    let json = serde_json::to_string_pretty(&report)?;
    write_artifact(path, &json)
        .await
        .map_err(|source| PipelineError::Output {
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_failure_recorded_on_artifact() {
        let artifact = ArtifactConfig::full("out/all.txt");
        // `Format::InsufficientTypeInformation` is #[non_exhaustive]; obtain it via the API.
        let format_err = time::Time::MIDNIGHT
            .format(time::macros::format_description!("[year]"))
            .unwrap_err();
        let failed = Err(PipelineError::Format(format_err));
        let report = artifact_report(&artifact, 3, failed);
        assert_eq!(report.kind, ArtifactKind::Full);
        assert_eq!(report.rules, 3);
        assert!(report.error.unwrap().starts_with("version stamp:"));
    }

    #[test]
    fn written_artifact_has_no_error() {
        let artifact = ArtifactConfig::lite("out/all-lite.txt");
        let report = artifact_report(&artifact, 0, Ok(()));
        assert_eq!(report.path, "out/all-lite.txt");
        assert!(report.error.is_none());
    }
}
