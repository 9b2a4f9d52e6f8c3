//! CLI override definitions and application logic.

use clap::Parser;
use rulecheck_dns::TierConfig;

use crate::Config;
use crate::types::*;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override the merged input rule file
    #[arg(long)]
    pub input: Option<String>,
    /// Override the full artifact path
    #[arg(long)]
    pub output: Option<String>,
    /// Override the lite (first tier only) artifact path
    #[arg(long)]
    pub lite_output: Option<String>,
    /// Write a JSON run report to this path
    #[arg(long)]
    pub report: Option<String>,
    /// Override maximum in-flight DNS queries (1..=750)
    #[arg(long)]
    pub max_concurrency: Option<usize>,
    /// Override the progress log interval (completed lookups)
    #[arg(long)]
    pub progress_interval: Option<usize>,
    /// Override the per-query timeout of every tier (seconds)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Replace all tiers with a single tier (repeatable or comma-separated)
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub nameserver: Option<Vec<String>>,
    /// Enable parent-domain aggregation
    #[arg(long)]
    pub aggregate: Option<bool>,
    /// Override the aggregation depth (labels)
    #[arg(long)]
    pub hierarchy_depth: Option<usize>,
    /// Query domains individually when their parent fails
    #[arg(long)]
    pub query_leaves: Option<bool>,
    /// Path to a GeoIP2 / GeoLite2 .mmdb database
    #[arg(long)]
    pub geoip: Option<String>,
    /// Country code kept by region artifacts
    #[arg(long)]
    pub region: Option<String>,
    /// Region artifact path (requires --geoip)
    #[arg(long)]
    pub region_output: Option<String>,
    /// Override the artifact title
    #[arg(long)]
    pub title: Option<String>,
    /// Override the homepage written to headers
    #[arg(long)]
    pub homepage: Option<String>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
    /// Override log format (json/pretty/compact)
    #[arg(long)]
    pub log_format: Option<String>,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.input {
        config.input.path = v.clone();
    }
    if let Some(v) = &overrides.output {
        set_artifact_path(config, ArtifactKind::Full, v);
    }
    if let Some(v) = &overrides.lite_output {
        set_artifact_path(config, ArtifactKind::Lite, v);
    }
    if let Some(v) = &overrides.region_output {
        set_artifact_path(config, ArtifactKind::Region, v);
    }
    if let Some(v) = &overrides.report {
        config.output.report = Some(v.clone());
    }
    if let Some(v) = overrides.max_concurrency {
        config.resolver.max_concurrency = v;
    }
    if let Some(v) = overrides.progress_interval {
        config.resolver.progress_interval = v;
    }
    if let Some(servers) = &overrides.nameserver {
        config.resolver.tiers = vec![TierConfig::new("cli", servers.iter().cloned())];
    }
    // After --nameserver so the replacement tier picks it up too.
    if let Some(v) = overrides.timeout_secs {
        for tier in &mut config.resolver.tiers {
            tier.timeout_secs = v;
        }
    }
    if let Some(v) = overrides.aggregate {
        config.hierarchy.enabled = v;
    }
    if let Some(v) = overrides.hierarchy_depth {
        config.hierarchy.depth = v;
    }
    if let Some(v) = overrides.query_leaves {
        config.hierarchy.query_leaves = v;
    }
    if let Some(v) = &overrides.geoip {
        config.geoip.path = Some(v.clone());
    }
    if let Some(v) = &overrides.region {
        config.geoip.region = v.to_ascii_uppercase();
    }
    if let Some(v) = &overrides.title {
        config.output.title = v.clone();
    }
    if let Some(v) = &overrides.homepage {
        config.output.homepage = v.clone();
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
    if let Some(v) = &overrides.log_format {
        config.logging.format = Some(v.clone());
    }
}

/// Point the first artifact of `kind` at `path`, adding one if missing.
fn set_artifact_path(config: &mut Config, kind: ArtifactKind, path: &str) {
    match config.output.artifacts.iter_mut().find(|a| a.kind == kind) {
        Some(artifact) => artifact.path = path.to_string(),
        None => config
            .output
            .artifacts
            .push(ArtifactConfig::new(kind, path)),
    }
}
