//! Tiered DNS validation for rulecheck.
//!
//! Domains are resolved tier by tier against fixed nameserver groups
//! using [`hickory-resolver`](https://crates.io/crates/hickory-resolver).
//! Each tier only queries domains no earlier tier validated; successes are
//! cached for the whole run, failures never are.
//!
//! # Usage
//!
//! ```rust,no_run
//! use rulecheck_dns::{EngineConfig, ResolutionEngine, TierConfig};
//! use rulecheck_rules::QueryPlan;
//!
//! # async fn example() {
//! let tiers = vec![TierConfig::new("global", ["1.1.1.1", "8.8.8.8"])];
//! let plan = QueryPlan::flat(["example.com"]);
//!
//! let mut engine = ResolutionEngine::new(&EngineConfig::default());
//! engine.resolve_tiers(&tiers, &plan, None).await;
//! println!("valid: {}", engine.validity().len());
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod lookup;
mod progress;
pub mod resolver;

pub use config::{EngineConfig, TierConfig};
pub use engine::{
    LookupErrorKind, RecordKind, Resolution, ResolutionEngine, ResolvedDomain, TierReport,
    Validation, ValidationSource,
};
pub use error::DnsError;
pub use lookup::RecordLookup;
pub use resolver::TierResolver;
