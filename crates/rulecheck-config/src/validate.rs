//! Configuration validation logic.

use std::collections::HashSet;

use crate::Config;
use crate::defaults::{max_concurrency_cap, max_query_attempts, max_query_timeout_secs};
use crate::loader::ConfigError;
use crate::types::ArtifactKind;

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.input.path.trim().is_empty() {
        return Err(ConfigError::Validation("input.path is empty".into()));
    }

    let resolver = &config.resolver;
    if resolver.tiers.is_empty() {
        return Err(ConfigError::Validation(
            "resolver.tiers must contain at least one tier".into(),
        ));
    }
    let mut tier_names = HashSet::new();
    for tier in &resolver.tiers {
        if tier.name.trim().is_empty() {
            return Err(ConfigError::Validation("resolver tier name is empty".into()));
        }
        if !tier_names.insert(tier.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate resolver tier name: {}",
                tier.name
            )));
        }
        if tier.servers.is_empty() {
            return Err(ConfigError::Validation(format!(
                "resolver tier '{}' has no servers",
                tier.name
            )));
        }
        if tier.timeout_secs == 0 || tier.timeout_secs > max_query_timeout_secs() {
            return Err(ConfigError::Validation(format!(
                "resolver tier '{}': timeout_secs must be 1..={}",
                tier.name,
                max_query_timeout_secs()
            )));
        }
        if tier.attempts == 0 || tier.attempts > max_query_attempts() {
            return Err(ConfigError::Validation(format!(
                "resolver tier '{}': attempts must be 1..={}",
                tier.name,
                max_query_attempts()
            )));
        }
    }
    if resolver.max_concurrency == 0 || resolver.max_concurrency > max_concurrency_cap() {
        return Err(ConfigError::Validation(format!(
            "resolver.max_concurrency must be 1..={}",
            max_concurrency_cap()
        )));
    }
    if resolver.progress_interval == 0 {
        return Err(ConfigError::Validation(
            "resolver.progress_interval must be > 0".into(),
        ));
    }

    if config.hierarchy.depth < 2 {
        return Err(ConfigError::Validation(
            "hierarchy.depth must be >= 2".into(),
        ));
    }

    let region = &config.geoip.region;
    if region.len() != 2 || !region.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::Validation(format!(
            "geoip.region must be a two-letter country code, got '{region}'"
        )));
    }

    let output = &config.output;
    if !(-12..=14).contains(&output.utc_offset_hours) {
        return Err(ConfigError::Validation(
            "output.utc_offset_hours must be -12..=14".into(),
        ));
    }
    if output.comment_marker.trim().is_empty() {
        return Err(ConfigError::Validation("output.comment_marker is empty".into()));
    }
    let mut paths = HashSet::new();
    for artifact in &output.artifacts {
        if artifact.path.trim().is_empty() {
            return Err(ConfigError::Validation("output artifact path is empty".into()));
        }
        if !paths.insert(artifact.path.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate output artifact path: {}",
                artifact.path
            )));
        }
        if artifact.kind == ArtifactKind::Region && config.geoip.path.is_none() {
            return Err(ConfigError::Validation(format!(
                "region artifact '{}' requires geoip.path",
                artifact.path
            )));
        }
    }

    if let Some(format) = &config.logging.format {
        let valid_formats = ["json", "pretty", "compact"];
        if !valid_formats.contains(&format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.format must be one of: {:?}",
                valid_formats
            )));
        }
    }
    if let Some(output) = &config.logging.output
        && output != "stdout"
        && output != "stderr"
    {
        return Err(ConfigError::Validation(
            "logging.output must be 'stdout' or 'stderr'".into(),
        ));
    }
    Ok(())
}
