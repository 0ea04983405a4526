//! Feed + geo merge and derived metrics.
//!
//! [`merge`] is pure and total: every feed record comes out exactly once, in
//! feed order, whether or not geo data was found for it.

mod metrics;

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::feed::VpsRecord;
use crate::geo::GeoInfo;
use crate::rates::ExchangeRate;

pub use metrics::{days_remaining, is_expired, parse_price, Price, Valuation};

/// A feed record decorated with geo data and computed metrics.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub vps: VpsRecord,
    pub country_code: String,
    pub city: String,
    pub asn: String,
    /// `None` when `endday` could not be parsed
    pub days_remaining: Option<i64>,
    pub is_expired: bool,
    pub parsed_price: Price,
    pub residual: Valuation,
}

impl EnrichedRecord {
    pub fn ip(&self) -> &str {
        &self.vps.ip
    }
}

/// Merges feed records with geo results and computes per-record metrics.
///
/// Records without a geo match keep `"Unknown"` geo fields.
pub fn merge(
    feed: &[VpsRecord],
    geo: &HashMap<String, GeoInfo>,
    rate: &ExchangeRate,
    today: NaiveDate,
) -> Vec<EnrichedRecord> {
    feed.iter()
        .map(|vps| {
            let info = geo
                .get(&vps.ip)
                .cloned()
                .unwrap_or_else(|| GeoInfo::unknown(&vps.ip));
            let end = vps.end_instant();
            let days = end.map(|end| days_remaining(end, today));
            let parsed_price = parse_price(&vps.price);
            let residual = Valuation::residual(&parsed_price, days, rate);
            EnrichedRecord {
                vps: vps.clone(),
                country_code: info.country_code,
                city: info.city,
                asn: info.asn,
                days_remaining: days,
                is_expired: end.is_some_and(|end| is_expired(end, today)),
                parsed_price,
                residual,
            }
        })
        .collect()
}
