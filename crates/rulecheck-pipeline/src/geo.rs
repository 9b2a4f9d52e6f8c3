//! GeoIP wiring for region artifacts.

use std::net::Ipv4Addr;
use std::sync::Arc;

use rulecheck_dns::{ResolutionEngine, ValidationSource};
use rulecheck_rules::domain::canonical_parent;
use rulecheck_rules::{Classification, CountryLookup, GeoClassifier, RuleIndex, RulesError};

/// Open the configured country database.
#[cfg(feature = "geoip")]
pub(crate) fn open_database(path: &str) -> Result<Arc<dyn CountryLookup>, RulesError> {
    let db = rulecheck_rules::GeoipDb::from_file(std::path::Path::new(path))?;
    tracing::info!(path, "geoip database loaded");
    Ok(Arc::new(db))
}

#[cfg(not(feature = "geoip"))]
pub(crate) fn open_database(path: &str) -> Result<Arc<dyn CountryLookup>, RulesError> {
    Err(RulesError::GeoIp(format!(
        "built without geoip support, cannot open {path}"
    )))
}

/// Addresses used to locate each valid indexed domain.
///
/// Domains validated through a parent borrow the parent's addresses.
pub(crate) fn classification_inputs<'a>(
    index: &'a RuleIndex,
    engine: &'a ResolutionEngine,
) -> Vec<(&'a str, &'a [Ipv4Addr])> {
    index
        .domains()
        .filter_map(|domain| {
            let validation = engine.validity().get(domain)?;
            let source = match validation.source {
                ValidationSource::Parent => canonical_parent(domain),
                ValidationSource::Direct(_) => domain,
            };
            let resolved = engine.cached().get(source)?;
            Some((domain, resolved.addresses.as_slice()))
        })
        .filter(|(_, addrs)| !addrs.is_empty())
        .collect()
}

pub(crate) fn classify(
    lookup: Arc<dyn CountryLookup>,
    index: &RuleIndex,
    engine: &ResolutionEngine,
    region: &str,
) -> Classification {
    let inputs = classification_inputs(index, engine);
    GeoClassifier::new(lookup).classify(inputs, region)
}
