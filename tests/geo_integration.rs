//! GeoResolver race and merge strategies against mock providers.

mod helpers;

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vps_monitor::config::UNKNOWN;
use vps_monitor::error_handling::{ErrorType, WarningType};
use vps_monitor::geo::{GeoProviderKind, GeoResolver, GeoStrategy};

use helpers::{geo_provider, mount_eooce, test_client, test_stats};

#[tokio::test]
async fn test_race_slow_provider_does_not_block_fast_one() {
    let slow = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.2.3.4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"country_code": "US", "city": "Slowtown", "asn": "AS1"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&slow)
        .await;

    let fast = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.2.3.4/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "country": "DE",
            "city": "Frankfurt",
            "org": "AS24940 Hetzner Online GmbH"
        })))
        .mount(&fast)
        .await;

    let stats = test_stats();
    let resolver = GeoResolver::new(
        test_client(),
        vec![
            geo_provider("slow", &slow, GeoProviderKind::Eooce),
            geo_provider("fast", &fast, GeoProviderKind::IpInfo),
        ],
        GeoStrategy::Race,
        Duration::from_millis(500),
        stats.clone(),
    );

    let started = Instant::now();
    let info = resolver.resolve_one("1.2.3.4").await;
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(info.country_code, "DE");
    assert_eq!(info.city, "Frankfurt");
    assert_eq!(info.asn, "AS24940");
    assert_eq!(stats.get_warning_count(WarningType::GeoUnresolved), 0);
}

#[tokio::test]
async fn test_merge_fills_missing_fields_in_priority_order() {
    let first = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/5.6.7.8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"country_code": "JP"})))
        .mount(&first)
        .await;

    let second = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/5.6.7.8/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "country": "KR",
            "city": "Tokyo",
            "org": "AS2516 KDDI"
        })))
        .mount(&second)
        .await;

    let third = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(0)
        .mount(&third)
        .await;

    let resolver = GeoResolver::new(
        test_client(),
        vec![
            geo_provider("first", &first, GeoProviderKind::Eooce),
            geo_provider("second", &second, GeoProviderKind::IpInfo),
            geo_provider("third", &third, GeoProviderKind::IpApi),
        ],
        GeoStrategy::Merge,
        Duration::from_millis(500),
        test_stats(),
    );

    let info = resolver.resolve_one("5.6.7.8").await;
    // First provider's country is kept; the rest comes from the second.
    assert_eq!(info.country_code, "JP");
    assert_eq!(info.city, "Tokyo");
    assert_eq!(info.asn, "AS2516");
}

#[tokio::test]
async fn test_merge_after_timeout_uses_next_provider() {
    let slow = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"country_code": "US", "city": "X", "asn": "AS1"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&slow)
        .await;
    let backup = MockServer::start().await;
    mount_eooce(&backup, "9.9.9.9", "CH", "Zurich", "AS19281").await;

    let stats = test_stats();
    let resolver = GeoResolver::new(
        test_client(),
        vec![
            geo_provider("slow", &slow, GeoProviderKind::Eooce),
            geo_provider("backup", &backup, GeoProviderKind::Eooce),
        ],
        GeoStrategy::Merge,
        Duration::from_millis(200),
        stats.clone(),
    );

    let info = resolver.resolve_one("9.9.9.9").await;
    assert_eq!(info.city, "Zurich");
    assert_eq!(stats.get_error_count(ErrorType::GeoProviderTimeout), 1);
}

#[tokio::test]
async fn test_all_providers_failing_yields_unknown() {
    let broken = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&broken)
        .await;
    let garbage = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&garbage)
        .await;

    for strategy in [GeoStrategy::Race, GeoStrategy::Merge] {
        let stats = test_stats();
        let resolver = GeoResolver::new(
            test_client(),
            vec![
                geo_provider("broken", &broken, GeoProviderKind::Eooce),
                geo_provider("garbage", &garbage, GeoProviderKind::IpInfo),
            ],
            strategy,
            Duration::from_millis(500),
            stats.clone(),
        );
        let ips = vec!["1.1.1.1".to_string(), "2.2.2.2".to_string()];
        let map = resolver.resolve(&ips).await;

        assert_eq!(map.len(), 2);
        for info in map.values() {
            assert_eq!(info.country_code, UNKNOWN);
            assert_eq!(info.city, UNKNOWN);
            assert_eq!(info.asn, UNKNOWN);
        }
        assert_eq!(stats.get_error_count(ErrorType::GeoProviderStatus), 2);
        assert_eq!(stats.get_error_count(ErrorType::GeoProviderMalformed), 2);
        assert_eq!(stats.get_warning_count(WarningType::GeoUnresolved), 2);
    }
}

#[tokio::test]
async fn test_duplicate_ips_are_looked_up_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.2.3.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "country_code": "FR", "city": "Paris", "asn": "AS16276"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = GeoResolver::new(
        test_client(),
        vec![geo_provider("only", &server, GeoProviderKind::Eooce)],
        GeoStrategy::Race,
        Duration::from_millis(500),
        test_stats(),
    );
    let ips = vec!["1.2.3.4".to_string(), "1.2.3.4".to_string()];
    let map = resolver.resolve(&ips).await;
    assert_eq!(map.len(), 1);
    assert_eq!(map["1.2.3.4"].city, "Paris");
}
