//! Batch validation pipeline for rulecheck.
//!
//! Wires the rule index, the tiered resolution engine, and the GeoIP
//! classifier together, then writes one filtered artifact per configured
//! output.

pub mod cli;
mod error;
mod geo;
pub mod output;
mod pipeline;
mod records;
mod stats;

pub use error::PipelineError;
pub use pipeline::{Pipeline, ResolverFactory, RunOutcome};
pub use records::{DomainRecord, DomainState, build_records};
pub use stats::{ArtifactReport, RunReport, RunStats};
