//! # rulecheck
//!
//! Validates large ad-block rule lists by resolving the domains they
//! reference, then writes filtered variants of the list.
//!
//! ## Crates
//!
//! - [`rulecheck_core`] - Shared defaults and error-kind labels
//! - [`rulecheck_rules`] - Rule parsing, domain hierarchy, GeoIP classification
//! - [`rulecheck_dns`] - Tiered, bounded-concurrency DNS validation
//! - [`rulecheck_config`] - Configuration loading and validation
//! - [`rulecheck_pipeline`] - The batch run and artifact output

pub use rulecheck_config as config;
pub use rulecheck_core as core;
pub use rulecheck_dns as dns;
pub use rulecheck_pipeline as pipeline;
pub use rulecheck_rules as rules;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use rulecheck_config::{Config, load_config, validate_config};
    pub use rulecheck_dns::{RecordLookup, ResolutionEngine, TierConfig};
    pub use rulecheck_pipeline::{Pipeline, PipelineError, RunOutcome};
    pub use rulecheck_rules::{CountryLookup, DomainHierarchy, RuleIndex, RuleKind};
}
