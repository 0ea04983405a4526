//! Feed record types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One VPS entry from the operator's inventory feed.
///
/// Read-only to the pipeline. Dates and price are kept as the raw strings the
/// feed provided so they render exactly as written; interpretation happens in
/// the enricher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpsRecord {
    pub ip: String,
    #[serde(default)]
    pub store: String,
    #[serde(default, rename = "storeURL")]
    pub store_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub startday: String,
    /// Empty when the feed omits it; such a record is never due
    #[serde(default, deserialize_with = "lenient_string")]
    pub endday: String,
    /// Annual price: amount followed by a currency unit, e.g. `12.00USD`
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: String,
}

impl VpsRecord {
    /// The instant the VPS expires.
    ///
    /// Accepts `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
    pub fn end_instant(&self) -> Option<DateTime<Utc>> {
        parse_day_or_instant(&self.endday)
    }
}

/// Parses `YYYY-MM-DD` as midnight UTC, or an RFC 3339 timestamp.
pub fn parse_day_or_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Accepts a JSON string or number (feeds written by hand often use `2025`
/// style numbers for prices) and yields its text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, found {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deserialize_feed_entry() {
        let json = r#"{
            "ip": "1.2.3.4",
            "store": "Acme",
            "storeURL": "https://acme.example/renew",
            "startday": "2025-01-01",
            "endday": "2026-01-01",
            "price": "12.00USD"
        }"#;
        let record: VpsRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.ip, "1.2.3.4");
        assert_eq!(record.store_url, "https://acme.example/renew");
        assert_eq!(record.price, "12.00USD");
    }

    #[test]
    fn test_deserialize_tolerates_missing_optional_fields() {
        let record: VpsRecord =
            serde_json::from_str(r#"{"ip": "5.6.7.8", "endday": "2026-02-03", "price": 30}"#)
                .unwrap();
        assert_eq!(record.store, "");
        assert_eq!(record.startday, "");
        assert_eq!(record.price, "30");
    }

    #[test]
    fn test_deserialize_requires_ip() {
        let result: Result<VpsRecord, _> = serde_json::from_str(r#"{"endday": "2026-02-03"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_day_or_instant() {
        assert_eq!(
            parse_day_or_instant("2026-10-20"),
            Some(Utc.with_ymd_and_hms(2026, 10, 20, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_day_or_instant("2026-10-20T12:00:00+08:00"),
            Some(Utc.with_ymd_and_hms(2026, 10, 20, 4, 0, 0).unwrap())
        );
        assert_eq!(parse_day_or_instant("20/10/2026"), None);
        assert_eq!(parse_day_or_instant(""), None);
    }
}
