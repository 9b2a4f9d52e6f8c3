//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Input Defaults
// ============================================================================

/// Default merged input file.
pub const DEFAULT_INPUT_PATH: &str = "beforeall.txt";

// ============================================================================
// Resolver Defaults
// ============================================================================

/// Default maximum number of in-flight DNS queries.
pub const DEFAULT_MAX_CONCURRENCY: usize = 500;
/// Hard upper bound for the in-flight query limit.
pub const MAX_CONCURRENCY_CAP: usize = 750;
/// Default per-query timeout in seconds.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 3;
/// Upper bound for the per-query timeout in seconds.
pub const MAX_QUERY_TIMEOUT_SECS: u64 = 60;
/// Default number of attempts per query and nameserver group.
pub const DEFAULT_QUERY_ATTEMPTS: usize = 1;
/// Upper bound for attempts per query.
pub const MAX_QUERY_ATTEMPTS: usize = 10;
/// Default DNS port for bare nameserver addresses.
pub const DEFAULT_DNS_PORT: u16 = 53;
/// Log progress every N completed lookups.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 5000;

/// Name of the first (regional) tier.
pub const DEFAULT_REGIONAL_TIER: &str = "regional";
/// Nameservers queried in the regional tier.
pub const DEFAULT_REGIONAL_SERVERS: &[&str] = &["119.29.29.29", "223.6.6.6", "180.184.1.1"];
/// Name of the fallback (global) tier.
pub const DEFAULT_GLOBAL_TIER: &str = "global";
/// Nameservers queried in the global tier.
pub const DEFAULT_GLOBAL_SERVERS: &[&str] = &["1.1.1.1", "8.8.8.8", "9.9.9.9"];

// ============================================================================
// Hierarchy Defaults
// ============================================================================

/// Parent-domain aggregation enabled.
pub const DEFAULT_HIERARCHY_ENABLED: bool = true;
/// Deepest label count registered under a canonical parent.
pub const DEFAULT_HIERARCHY_DEPTH: usize = 4;
/// Query leaves individually when their parent does not resolve.
pub const DEFAULT_HIERARCHY_QUERY_LEAVES: bool = true;

// ============================================================================
// GeoIP Defaults
// ============================================================================

/// Country code used for region artifacts.
pub const DEFAULT_REGION_CODE: &str = "CN";

// ============================================================================
// Output Defaults
// ============================================================================

/// Default artifact title.
pub const DEFAULT_TITLE: &str = "rulecheck-AD-rules";
/// Default homepage written to artifact headers.
pub const DEFAULT_HOMEPAGE: &str = "https://github.com/rulecheck/rulecheck";
/// Fixed UTC offset (hours) for the Version header.
pub const DEFAULT_UTC_OFFSET_HOURS: i8 = 8;
/// Comment marker used for artifact headers.
pub const DEFAULT_COMMENT_MARKER: &str = "!";
/// Default full artifact path.
pub const DEFAULT_FULL_OUTPUT: &str = "all.txt";
/// Default lite (first tier only) artifact path.
pub const DEFAULT_LITE_OUTPUT: &str = "all-lite.txt";
