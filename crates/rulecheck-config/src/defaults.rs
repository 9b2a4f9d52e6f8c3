//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `rulecheck_core::defaults`.

use rulecheck_core::defaults;
use rulecheck_dns::TierConfig;

use crate::types::ArtifactConfig;

/// Generate default value functions that forward to rulecheck_core::defaults constants.
macro_rules! default_fns {
    // For Copy types (integers, bool, etc.)
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_max_concurrency     => DEFAULT_MAX_CONCURRENCY: usize,
    max_concurrency_cap         => MAX_CONCURRENCY_CAP: usize,
    max_query_timeout_secs      => MAX_QUERY_TIMEOUT_SECS: u64,
    max_query_attempts          => MAX_QUERY_ATTEMPTS: usize,
    default_progress_interval   => DEFAULT_PROGRESS_INTERVAL: usize,
    default_hierarchy_enabled   => DEFAULT_HIERARCHY_ENABLED: bool,
    default_hierarchy_depth     => DEFAULT_HIERARCHY_DEPTH: usize,
    default_query_leaves        => DEFAULT_HIERARCHY_QUERY_LEAVES: bool,
    default_utc_offset_hours    => DEFAULT_UTC_OFFSET_HOURS: i8,
}

default_string_fns! {
    default_input_path      => DEFAULT_INPUT_PATH,
    default_region          => DEFAULT_REGION_CODE,
    default_title           => DEFAULT_TITLE,
    default_homepage        => DEFAULT_HOMEPAGE,
    default_comment_marker  => DEFAULT_COMMENT_MARKER,
}

pub(crate) fn default_tiers() -> Vec<TierConfig> {
    TierConfig::default_tiers()
}

pub(crate) fn default_artifacts() -> Vec<ArtifactConfig> {
    vec![
        ArtifactConfig::full(defaults::DEFAULT_FULL_OUTPUT),
        ArtifactConfig::lite(defaults::DEFAULT_LITE_OUTPUT),
    ]
}
