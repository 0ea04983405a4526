// Shared test helpers for mock providers and pipeline setup.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vps_monitor::error_handling::ProcessingStats;
use vps_monitor::geo::{GeoProvider, GeoProviderKind};
use vps_monitor::rates::{RateProvider, RateProviderKind};

/// Plain client with a short connect timeout.
#[allow(dead_code)]
pub fn test_client() -> Arc<reqwest::Client> {
    Arc::new(
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .build()
            .expect("Failed to build test client"),
    )
}

#[allow(dead_code)]
pub fn test_stats() -> Arc<ProcessingStats> {
    Arc::new(ProcessingStats::new())
}

/// Geo provider of `kind` pointed at `server`.
#[allow(dead_code)]
pub fn geo_provider(name: &str, server: &MockServer, kind: GeoProviderKind) -> GeoProvider {
    GeoProvider::new(name, &server.uri(), kind)
}

/// Rate provider of `kind` pointed at `server`.
#[allow(dead_code)]
pub fn rate_provider(name: &str, server: &MockServer, kind: RateProviderKind) -> RateProvider {
    RateProvider::new(name, &server.uri(), kind)
}

/// Mounts a complete ip.eooce-style answer for `ip`.
#[allow(dead_code)]
pub async fn mount_eooce(server: &MockServer, ip: &str, country: &str, city: &str, asn: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{ip}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "country_code": country,
            "city": city,
            "asn": asn,
        })))
        .mount(server)
        .await;
}

/// Mounts an xxapi exchange answer with the given rate.
#[allow(dead_code)]
pub async fn mount_xxapi_rate(server: &MockServer, rate: f64) {
    Mock::given(method("GET"))
        .and(path("/api/exchange"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"rate": rate, "update_at": 1735689600000_i64},
        })))
        .mount(server)
        .await;
}
