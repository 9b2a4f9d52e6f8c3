//! MaxMind DB backed country lookup.

use std::net::IpAddr;
use std::path::Path;

use maxminddb::Reader;

use super::CountryLookup;
use crate::error::RulesError;

/// Offline IP → country database (`.mmdb`).
///
/// Works with country-level and city-level databases.
pub struct GeoipDb {
    reader: Reader<Vec<u8>>,
}

impl GeoipDb {
    /// Load a database from a local file.
    pub fn from_file(path: &Path) -> Result<Self, RulesError> {
        let reader = Reader::open_readfile(path).map_err(|e| {
            RulesError::GeoIp(format!(
                "failed to open GeoIP database {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self { reader })
    }

    /// Load a database from raw bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, RulesError> {
        let reader = Reader::from_source(data)
            .map_err(|e| RulesError::GeoIp(format!("failed to parse GeoIP database: {e}")))?;
        Ok(Self { reader })
    }
}

impl CountryLookup for GeoipDb {
    /// Tries the Country record first, then the City record
    /// (city-level databases only carry City records).
    fn country_code(&self, ip: IpAddr) -> Option<String> {
        if let Ok(result) = self.reader.lookup(ip)
            && let Ok(Some(country)) = result.decode::<maxminddb::geoip2::Country>()
            && let Some(code) = country.country.iso_code
        {
            return Some(code.to_uppercase());
        }
        if let Ok(result) = self.reader.lookup(ip)
            && let Ok(Some(city)) = result.decode::<maxminddb::geoip2::City>()
            && let Some(code) = city.country.iso_code
        {
            return Some(code.to_uppercase());
        }
        None
    }
}

impl std::fmt::Debug for GeoipDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoipDb").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geoip_db_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeoipDb>();
    }

    #[test]
    fn missing_file_is_geoip_error() {
        let err = GeoipDb::from_file(Path::new("/nonexistent/country.mmdb")).unwrap_err();
        assert!(matches!(err, RulesError::GeoIp(_)));
    }

    #[test]
    fn garbage_bytes_rejected() {
        let err = GeoipDb::from_bytes(b"not a database".to_vec()).unwrap_err();
        assert!(matches!(err, RulesError::GeoIp(_)));
    }
}
