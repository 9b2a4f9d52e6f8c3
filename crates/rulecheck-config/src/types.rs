//! Configuration type definitions for input, resolver tiers, aggregation,
//! GeoIP, output artifacts, and logging.

use std::collections::HashMap;

use rulecheck_dns::{EngineConfig, TierConfig};
use serde::{Deserialize, Serialize};

use crate::defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Merged rule file to validate.
    #[serde(default = "default_input_path")]
    pub path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Nameserver tiers, queried in order.
    #[serde(default = "default_tiers")]
    pub tiers: Vec<TierConfig>,
    /// Maximum in-flight queries (1..=750).
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Log progress every N completed lookups.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
            max_concurrency: default_max_concurrency(),
            progress_interval: default_progress_interval(),
        }
    }
}

impl ResolverConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_concurrency: self.max_concurrency,
            progress_interval: self.progress_interval,
        }
    }
}

/// Parent-domain aggregation.
///
/// When enabled, a resolved two-label parent validates every registered
/// descendant without querying it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyConfig {
    #[serde(default = "default_hierarchy_enabled")]
    pub enabled: bool,
    /// Deepest label count validated through a parent.
    #[serde(default = "default_hierarchy_depth")]
    pub depth: usize,
    /// Query domains individually when their parent did not resolve.
    #[serde(default = "default_query_leaves")]
    pub query_leaves: bool,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            enabled: default_hierarchy_enabled(),
            depth: default_hierarchy_depth(),
            query_leaves: default_query_leaves(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoipConfig {
    /// Local `.mmdb` file. Region artifacts are skipped without it.
    #[serde(default)]
    pub path: Option<String>,
    /// ISO country code that region artifacts keep.
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for GeoipConfig {
    fn default() -> Self {
        Self {
            path: None,
            region: default_region(),
        }
    }
}

/// Which validity set an artifact keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Valid in any tier.
    Full,
    /// Valid in the first tier.
    Lite,
    /// Valid and located in the configured region.
    Region,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    pub kind: ArtifactKind,
    pub path: String,
    /// Overrides `output.title`.
    #[serde(default)]
    pub title: Option<String>,
    /// Overrides `output.comment_marker` (e.g. `#` for dnsmasq lists).
    #[serde(default)]
    pub comment_marker: Option<String>,
}

impl ArtifactConfig {
    pub fn new(kind: ArtifactKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            title: None,
            comment_marker: None,
        }
    }

    pub fn full(path: impl Into<String>) -> Self {
        Self::new(ArtifactKind::Full, path)
    }

    pub fn lite(path: impl Into<String>) -> Self {
        Self::new(ArtifactKind::Lite, path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_homepage")]
    pub homepage: String,
    /// Fixed UTC offset (hours) for the Version header.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i8,
    #[serde(default = "default_comment_marker")]
    pub comment_marker: String,
    #[serde(default = "default_artifacts")]
    pub artifacts: Vec<ArtifactConfig>,
    /// Optional JSON run report.
    #[serde(default)]
    pub report: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            homepage: default_homepage(),
            utc_offset_hours: default_utc_offset_hours(),
            comment_marker: default_comment_marker(),
            artifacts: default_artifacts(),
            report: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Log format: json, pretty, or compact. Default: pretty.
    pub format: Option<String>,
    /// Output target: stdout or stderr. Default: stderr.
    pub output: Option<String>,
    /// Per-module log level filters (e.g., {"rulecheck_dns": "debug", "hickory_proto": "warn"}).
    #[serde(default)]
    pub filters: HashMap<String, String>,
}
