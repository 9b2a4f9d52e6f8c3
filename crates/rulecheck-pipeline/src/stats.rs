//! Run statistics and the JSON run report.

use std::fmt;

use rulecheck_config::ArtifactKind;
use rulecheck_dns::TierReport;
use serde::Serialize;

use crate::records::DomainRecord;

/// Outcome of one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
    pub kind: ArtifactKind,
    pub path: String,
    /// Rule lines written (header excluded).
    pub rules: usize,
    /// Set when the artifact was skipped or could not be written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ArtifactReport {
    pub fn is_written(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of one run. Always produced, even when artifacts fail.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub total_rules: usize,
    pub valid_rules: usize,
    pub invalid_rules: usize,
    pub header_comments: usize,
    pub domains: usize,
    /// Distinct names actually queried, across all tiers.
    pub domains_queried: usize,
    pub domains_resolved: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_domains: Option<usize>,
    pub tiers: Vec<TierReport>,
    pub artifacts: Vec<ArtifactReport>,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "rules: {} total, {} valid, {} invalid",
            self.total_rules, self.valid_rules, self.invalid_rules
        )?;
        writeln!(
            f,
            "domains: {} referenced, {} queried, {} resolved",
            self.domains, self.domains_queried, self.domains_resolved
        )?;
        if let Some(region) = self.region_domains {
            writeln!(f, "region: {region} domains")?;
        }
        for tier in &self.tiers {
            match &tier.failure {
                Some(reason) => writeln!(f, "tier {}: failed ({reason})", tier.name)?,
                None => writeln!(
                    f,
                    "tier {}: {} queried, {} resolved ({} A, {} AAAA), \
                     {} via parent, {} errors, {:.1}s",
                    tier.name,
                    tier.queried,
                    tier.resolved,
                    tier.via_a,
                    tier.via_aaaa,
                    tier.aggregated,
                    tier.errors,
                    tier.elapsed_ms as f64 / 1000.0
                )?,
            }
        }
        for artifact in &self.artifacts {
            match &artifact.error {
                Some(reason) => writeln!(f, "artifact {}: {reason}", artifact.path)?,
                None => writeln!(f, "artifact {}: {} rules", artifact.path, artifact.rules)?,
            }
        }
        Ok(())
    }
}

/// JSON run report: statistics plus every domain record.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub stats: &'a RunStats,
    pub domains: &'a [DomainRecord],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_summary() {
        let stats = RunStats {
            total_rules: 10,
            valid_rules: 9,
            invalid_rules: 1,
            domains: 6,
            domains_queried: 5,
            domains_resolved: 4,
            tiers: vec![
                TierReport {
                    name: "regional".into(),
                    queried: 5,
                    resolved: 3,
                    via_a: 3,
                    elapsed_ms: 1500,
                    ..Default::default()
                },
                TierReport {
                    name: "broken".into(),
                    failure: Some("invalid dns server: x".into()),
                    ..Default::default()
                },
            ],
            artifacts: vec![ArtifactReport {
                kind: ArtifactKind::Full,
                path: "all.txt".into(),
                rules: 8,
                error: None,
            }],
            ..Default::default()
        };
        let text = stats.to_string();
        assert!(text.contains("rules: 10 total, 9 valid, 1 invalid"));
        assert!(text.contains("tier regional: 5 queried, 3 resolved (3 A, 0 AAAA)"));
        assert!(text.contains("1.5s"));
        assert!(text.contains("tier broken: failed"));
        assert!(text.contains("artifact all.txt: 8 rules"));
    }

    #[test]
    fn report_json_shape() {
        let stats = RunStats::default();
        let report = RunReport {
            stats: &stats,
            domains: &[],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stats"]["total_rules"], 0);
        assert!(json["stats"].get("region_domains").is_none());
        assert!(json["domains"].as_array().unwrap().is_empty());
    }
}
