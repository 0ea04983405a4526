//! USD->CNY rate provider adapters.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::error_handling::ProviderError;

/// Response schema of a rate provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateProviderKind {
    /// `{code: 200, data: {rate, update_at}}`
    XxapiExchange,
    /// `{code: 200, data: {rates: {CNY: {rate}}, update_at}}`
    XxapiAllRates,
    /// `{result: "success", conversion_rates: {CNY}, time_last_update_unix}`
    ExchangeRateApi { api_key: String },
}

/// A rate as reported by one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    pub rate_cny: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

/// One rate provider endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateProvider {
    pub name: String,
    pub base_url: String,
    pub kind: RateProviderKind,
}

impl RateProvider {
    pub fn new(name: &str, base_url: &str, kind: RateProviderKind) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            kind,
        }
    }

    pub fn xxapi_exchange() -> Self {
        Self::new("xxapi exchange", "https://v2.xxapi.cn", RateProviderKind::XxapiExchange)
    }

    pub fn xxapi_allrates() -> Self {
        Self::new("xxapi allrates", "https://v2.xxapi.cn", RateProviderKind::XxapiAllRates)
    }

    pub fn exchangerate_api(api_key: &str) -> Self {
        Self::new(
            "exchangerate-api",
            "https://v6.exchangerate-api.com",
            RateProviderKind::ExchangeRateApi {
                api_key: api_key.to_string(),
            },
        )
    }

    /// Providers in fixed priority order. The keyed provider is only included
    /// when a non-blank key is given.
    pub fn defaults(api_key: Option<&str>) -> Vec<Self> {
        let mut providers = vec![Self::xxapi_exchange(), Self::xxapi_allrates()];
        if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
            providers.push(Self::exchangerate_api(key));
        }
        providers
    }

    pub fn build_url(&self) -> String {
        match &self.kind {
            RateProviderKind::XxapiExchange => {
                format!("{}/api/exchange?from=USD&to=CNY&amount=1", self.base_url)
            }
            RateProviderKind::XxapiAllRates => format!("{}/api/allrates", self.base_url),
            RateProviderKind::ExchangeRateApi { api_key } => {
                format!("{}/v6/{}/latest/USD", self.base_url, api_key)
            }
        }
    }

    /// Extracts a quote from this provider's schema.
    ///
    /// # Errors
    ///
    /// `ProviderError::Empty` if the success marker or rate is missing, or the
    /// rate is not a finite positive number.
    pub fn parse(&self, data: &Value) -> Result<RateQuote, ProviderError> {
        let (rate, timestamp) = match &self.kind {
            RateProviderKind::XxapiExchange => {
                if data["code"].as_i64() != Some(200) {
                    return Err(ProviderError::Empty);
                }
                (
                    number(&data["data"]["rate"]),
                    parse_timestamp(&data["data"]["update_at"]),
                )
            }
            RateProviderKind::XxapiAllRates => {
                if data["code"].as_i64() != Some(200) {
                    return Err(ProviderError::Empty);
                }
                (
                    number(&data["data"]["rates"]["CNY"]["rate"]),
                    parse_timestamp(&data["data"]["update_at"]),
                )
            }
            RateProviderKind::ExchangeRateApi { .. } => {
                if data["result"].as_str() != Some("success") {
                    return Err(ProviderError::Empty);
                }
                (
                    number(&data["conversion_rates"]["CNY"]),
                    data["time_last_update_unix"]
                        .as_i64()
                        .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
                )
            }
        };

        match rate {
            Some(rate_cny) if rate_cny.is_finite() && rate_cny > 0.0 => Ok(RateQuote {
                rate_cny,
                timestamp,
            }),
            Some(other) => Err(ProviderError::Malformed(format!("implausible rate {other}"))),
            None => Err(ProviderError::Empty),
        }
    }

    /// Fetches and parses one quote. No deadline is applied here.
    pub async fn query(&self, client: &reqwest::Client) -> Result<RateQuote, ProviderError> {
        let response = client.get(self.build_url()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        let data: Value = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        self.parse(&data)
    }
}

/// A JSON number, or a string holding one.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses a provider timestamp.
///
/// Accepts epoch milliseconds, epoch seconds, RFC 3339, or
/// `YYYY-MM-DD HH:MM:SS` taken as UTC.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => from_epoch(n.as_i64()?),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(epoch) = s.parse::<i64>() {
                return from_epoch(epoch);
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        }
        _ => None,
    }
}

// Anything past 10^11 seconds (year 5138) is taken to be milliseconds.
fn from_epoch(epoch: i64) -> Option<DateTime<Utc>> {
    if epoch.abs() >= 100_000_000_000 {
        Utc.timestamp_millis_opt(epoch).single()
    } else {
        Utc.timestamp_opt(epoch, 0).single()
    }
}
