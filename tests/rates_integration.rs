//! RateResolver fallback chain against mock providers.

mod helpers;

use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vps_monitor::config::FALLBACK_RATE_CNY;
use vps_monitor::error_handling::{ErrorType, WarningType};
use vps_monitor::rates::{RateProviderKind, RateResolver};

use helpers::{mount_xxapi_rate, rate_provider, test_client, test_stats};

#[tokio::test]
async fn test_first_valid_provider_wins_in_order() {
    let broken = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/exchange"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 500, "msg": "quota"})))
        .expect(1)
        .mount(&broken)
        .await;

    let good = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/allrates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"rates": {"CNY": {"rate": 7.11}}, "update_at": "2025-06-01 08:00:00"}
        })))
        .expect(1)
        .mount(&good)
        .await;

    let never = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&never)
        .await;

    let stats = test_stats();
    let resolver = RateResolver::new(
        test_client(),
        vec![
            rate_provider("broken", &broken, RateProviderKind::XxapiExchange),
            rate_provider("good", &good, RateProviderKind::XxapiAllRates),
            rate_provider(
                "never",
                &never,
                RateProviderKind::ExchangeRateApi {
                    api_key: "k".into(),
                },
            ),
        ],
        Duration::from_millis(500),
        stats.clone(),
    );

    let rate = resolver.resolve(Utc::now()).await;
    assert_eq!(rate.rate_cny, 7.11);
    assert_eq!(
        rate.timestamp,
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    );
    assert_eq!(rate.source.as_deref(), Some("good"));
    assert_eq!(stats.get_error_count(ErrorType::RateProviderEmpty), 1);
    assert_eq!(stats.get_warning_count(WarningType::RateFallbackUsed), 0);
}

#[tokio::test]
async fn test_all_providers_failing_returns_fallback() {
    let slow = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 200, "data": {"rate": 7.0}}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&slow)
        .await;
    let non_numeric = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "success",
            "conversion_rates": {"CNY": "seven"}
        })))
        .mount(&non_numeric)
        .await;
    let down = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&down)
        .await;

    let stats = test_stats();
    let resolver = RateResolver::new(
        test_client(),
        vec![
            rate_provider("slow", &slow, RateProviderKind::XxapiExchange),
            rate_provider(
                "non-numeric",
                &non_numeric,
                RateProviderKind::ExchangeRateApi {
                    api_key: "k".into(),
                },
            ),
            rate_provider("down", &down, RateProviderKind::XxapiAllRates),
        ],
        Duration::from_millis(200),
        stats.clone(),
    );

    let now = Utc::now();
    let rate = resolver.resolve(now).await;
    assert_eq!(rate.rate_cny, FALLBACK_RATE_CNY);
    assert_eq!(rate.timestamp, now);
    assert!(rate.is_fallback());
    assert_eq!(stats.get_error_count(ErrorType::RateProviderTimeout), 1);
    assert_eq!(stats.get_error_count(ErrorType::RateProviderEmpty), 1);
    assert_eq!(stats.get_error_count(ErrorType::RateProviderStatus), 1);
    assert_eq!(stats.get_warning_count(WarningType::RateFallbackUsed), 1);
}

#[tokio::test]
async fn test_missing_timestamp_is_filled_from_next_provider() {
    let first = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/exchange"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"rate": 7.20}
        })))
        .expect(1)
        .mount(&first)
        .await;

    let second = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/allrates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"rates": {"CNY": {"rate": 7.05}}, "update_at": "2025-01-01 00:00:00"}
        })))
        .expect(1)
        .mount(&second)
        .await;

    let never = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&never)
        .await;

    let resolver = RateResolver::new(
        test_client(),
        vec![
            rate_provider("first", &first, RateProviderKind::XxapiExchange),
            rate_provider("second", &second, RateProviderKind::XxapiAllRates),
            rate_provider(
                "never",
                &never,
                RateProviderKind::ExchangeRateApi {
                    api_key: "k".into(),
                },
            ),
        ],
        Duration::from_millis(500),
        test_stats(),
    );
    let rate = resolver.resolve(Utc::now()).await;
    assert_eq!(rate.rate_cny, 7.2);
    assert_eq!(
        rate.timestamp,
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(rate.source.as_deref(), Some("first"));
}

#[tokio::test]
async fn test_quote_without_any_timestamp_is_stamped_now() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/exchange"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"rate": "7.20"}
        })))
        .mount(&server)
        .await;
    let down = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&down)
        .await;

    let resolver = RateResolver::new(
        test_client(),
        vec![
            rate_provider("xxapi", &server, RateProviderKind::XxapiExchange),
            rate_provider("down", &down, RateProviderKind::XxapiAllRates),
        ],
        Duration::from_millis(500),
        test_stats(),
    );
    let now = Utc::now();
    let rate = resolver.resolve(now).await;
    assert_eq!(rate.rate_cny, 7.2);
    assert_eq!(rate.timestamp, now);
    assert_eq!(rate.source.as_deref(), Some("xxapi"));
}

#[tokio::test]
async fn test_helper_rate_mount() {
    let server = MockServer::start().await;
    mount_xxapi_rate(&server, 7.3).await;
    let resolver = RateResolver::new(
        test_client(),
        vec![rate_provider("xxapi", &server, RateProviderKind::XxapiExchange)],
        Duration::from_millis(500),
        test_stats(),
    );
    let rate = resolver.resolve(Utc::now()).await;
    assert_eq!(rate.rate_cny, 7.3);
    assert_eq!(
        rate.timestamp,
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    );
}
