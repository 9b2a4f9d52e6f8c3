//! Core constants shared across rulecheck crates.
//!
//! This crate provides:
//! - Default configuration values
//! - Error kind labels for logging and run reports
//! - The crate version

pub mod defaults;
pub mod errors;

// Re-export commonly used items at crate root
pub use defaults::*;
pub use errors::*;

/// Project version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
