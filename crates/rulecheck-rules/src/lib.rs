//! Rule parsing and domain classification for rulecheck.
//!
//! Turns a merged ad-block list into typed rules, derives the reduced set of
//! domains worth querying, and classifies resolved addresses by country.
//!
//! # Architecture
//!
//! - **Parser**: `classify_line` tags a single line (adblock network rules,
//!   regex, wildcard, hosts, dnsmasq, comments)
//! - **Index**: `RuleIndex` keeps rules in input order, collects header
//!   comments, and maps domains to the rules referencing them
//! - **Hierarchy**: `DomainHierarchy` groups domains under a two-label parent
//!   so one successful parent query validates its descendants
//! - **Geo**: `GeoClassifier` maps resolved IPv4 addresses to a region set
//!
//! # Example
//!
//! ```
//! use rulecheck_rules::{DomainHierarchy, RuleIndex, RuleKind};
//!
//! let index = RuleIndex::parse("! Title: demo\n||ads.example.com^\n/^ad[0-9]+\\./\n");
//! assert_eq!(index.header().entries(), ["! Title: demo"]);
//! assert_eq!(index.rules()[1].kind(), &RuleKind::Regex);
//!
//! let hierarchy = DomainHierarchy::build(index.domains(), 4);
//! assert!(hierarchy.descendants("example.com").any(|d| d == "ads.example.com"));
//! ```

pub mod domain;
pub mod error;
pub mod geo;
pub mod hierarchy;
pub mod index;
pub mod parser;
pub mod rule;

pub use error::RulesError;
pub use geo::{Classification, CountryLookup, GeoClassifier};
#[cfg(feature = "geoip")]
pub use geo::GeoipDb;
pub use hierarchy::{DomainHierarchy, QueryPlan};
pub use index::{HeaderMetadata, RuleIndex};
pub use parser::classify_line;
pub use rule::{Rule, RuleKind};
