//! IP-info provider adapters.
//!
//! Each adapter knows how to build the request URL for an IP and how to pull
//! `country_code`, `city` and `asn` out of that provider's JSON schema.

use serde_json::Value;

use super::types::PartialGeo;
use crate::error_handling::ProviderError;

/// Response schema of an IP-info provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoProviderKind {
    /// `GET {base}/{ip}` -> `{country_code, city, asn}`
    Eooce,
    /// `GET {base}/{ip}/json` -> `{country, city, org: "AS13335 Cloudflare"}`
    IpInfo,
    /// `GET {base}/json/{ip}` -> `{status, countryCode, city, as: "AS13335 Cloudflare"}`
    IpApi,
}

/// One IP-info provider endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoProvider {
    pub name: String,
    pub base_url: String,
    pub kind: GeoProviderKind,
}

impl GeoProvider {
    pub fn new(name: &str, base_url: &str, kind: GeoProviderKind) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            kind,
        }
    }

    pub fn eooce() -> Self {
        Self::new("ip.eooce", "https://ip.eooce.com", GeoProviderKind::Eooce)
    }

    pub fn ipinfo() -> Self {
        Self::new("ipinfo.io", "https://ipinfo.io", GeoProviderKind::IpInfo)
    }

    pub fn ip_api() -> Self {
        Self::new("ip-api.com", "http://ip-api.com", GeoProviderKind::IpApi)
    }

    /// Providers in default priority order.
    pub fn defaults() -> Vec<Self> {
        vec![Self::eooce(), Self::ipinfo(), Self::ip_api()]
    }

    pub fn build_url(&self, ip: &str) -> String {
        match self.kind {
            GeoProviderKind::Eooce => format!("{}/{}", self.base_url, ip),
            GeoProviderKind::IpInfo => format!("{}/{}/json", self.base_url, ip),
            GeoProviderKind::IpApi => format!("{}/json/{}", self.base_url, ip),
        }
    }

    /// Extracts whatever fields this provider's schema carries.
    pub fn parse(&self, data: &Value) -> PartialGeo {
        match self.kind {
            GeoProviderKind::Eooce => PartialGeo {
                country_code: text(&data["country_code"]),
                city: text(&data["city"]),
                asn: text(&data["asn"]).map(|asn| {
                    if asn.starts_with("AS") {
                        asn
                    } else {
                        format!("AS{asn}")
                    }
                }),
            },
            GeoProviderKind::IpInfo => PartialGeo {
                country_code: text(&data["country"]),
                city: text(&data["city"]),
                asn: text(&data["org"]).and_then(|org| as_prefix(&org)),
            },
            GeoProviderKind::IpApi => {
                if data["status"].as_str() != Some("success") {
                    return PartialGeo::default();
                }
                PartialGeo {
                    country_code: text(&data["countryCode"]),
                    city: text(&data["city"]),
                    asn: text(&data["as"]).and_then(|as_field| as_prefix(&as_field)),
                }
            }
        }
    }

    /// Queries this provider for `ip`.
    ///
    /// No deadline is applied here; callers bound the call.
    ///
    /// # Errors
    ///
    /// Any failure (network, non-2xx, malformed JSON, no usable field) is a
    /// `ProviderError`.
    pub async fn query(&self, client: &reqwest::Client, ip: &str) -> Result<PartialGeo, ProviderError> {
        let response = client.get(self.build_url(ip)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        let data: Value = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        let partial = self.parse(&data);
        if partial.is_empty() {
            return Err(ProviderError::Empty);
        }
        Ok(partial)
    }
}

/// Non-empty text of a JSON string or number.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The leading `AS<number>` token of an organisation string.
fn as_prefix(org: &str) -> Option<String> {
    org.split_whitespace()
        .next()
        .filter(|token| token.starts_with("AS"))
        .map(str::to_string)
}
