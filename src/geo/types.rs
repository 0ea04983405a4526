//! Geo data structures.

use serde::{Deserialize, Serialize};

use crate::config::UNKNOWN;

/// Location and network data for one IP.
///
/// Every field defaults to the `"Unknown"` sentinel when unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoInfo {
    pub ip: String,
    pub country_code: String,
    pub city: String,
    pub asn: String,
}

impl GeoInfo {
    /// A record with every field unresolved.
    pub fn unknown(ip: &str) -> Self {
        Self {
            ip: ip.to_string(),
            country_code: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            asn: UNKNOWN.to_string(),
        }
    }

    /// True once all three fields hold real values.
    pub fn is_complete(&self) -> bool {
        self.country_code != UNKNOWN && self.city != UNKNOWN && self.asn != UNKNOWN
    }

    /// True if no field was resolved.
    pub fn is_unresolved(&self) -> bool {
        self.country_code == UNKNOWN && self.city == UNKNOWN && self.asn == UNKNOWN
    }

    /// Fills fields still at the sentinel from `partial`; resolved fields are kept.
    pub fn fill_from(&mut self, partial: &PartialGeo) {
        fill(&mut self.country_code, &partial.country_code);
        fill(&mut self.city, &partial.city);
        fill(&mut self.asn, &partial.asn);
    }
}

fn fill(slot: &mut String, candidate: &Option<String>) {
    if slot == UNKNOWN {
        if let Some(value) = candidate {
            slot.clone_from(value);
        }
    }
}

/// Whatever subset of fields one provider managed to resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialGeo {
    pub country_code: Option<String>,
    pub city: Option<String>,
    pub asn: Option<String>,
}

impl PartialGeo {
    pub fn is_empty(&self) -> bool {
        self.country_code.is_none() && self.city.is_none() && self.asn.is_none()
    }
}
