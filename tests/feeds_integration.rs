//! Integration tests for the price feed and rewards API clients

use options_market::common::traits::{PriceFeed, RewardSource};
use options_market::feeds::{CoinGeckoPriceFeed, RewardsClient};
use options_market::pool::RewardPools;
use options_market::OptionsError;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// CoinGecko
// ============================================================================

#[tokio::test]
async fn test_usd_price() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/siren"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "siren",
            "market_data": { "current_price": { "usd": 0.5, "eur": 0.42 } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let feed = CoinGeckoPriceFeed::new(&format!("{}/", server.uri())).unwrap();
    assert_eq!(feed.usd_price("siren").await.unwrap(), dec!(0.5));
}

#[tokio::test]
async fn test_missing_usd_price() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/siren"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "market_data": { "current_price": { "eur": 0.42 } }
        })))
        .mount(&server)
        .await;

    let feed = CoinGeckoPriceFeed::new(&server.uri()).unwrap();
    let err = feed.usd_price("siren").await.unwrap_err();
    assert!(matches!(err, OptionsError::InvalidResponse(_)), "{:?}", err);
}

#[tokio::test]
async fn test_rate_limited_price() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let feed = CoinGeckoPriceFeed::new(&server.uri()).unwrap();
    match feed.usd_price("siren").await.unwrap_err() {
        OptionsError::InvalidResponse(message) => assert!(message.contains("429"), "{}", message),
        other => panic!("unexpected error: {:?}", other),
    }
}

// ============================================================================
// Rewards API
// ============================================================================

#[tokio::test]
async fn test_account_rewards() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("address", "0xalice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "claimedRewards": "10",
            "claimableRewards": "2.5",
            "totalRewards": "12.5",
            "claimMessage": "0xsigned",
            "recipient": "0xalice"
        })))
        .mount(&server)
        .await;

    let client = RewardsClient::new(&server.uri()).unwrap();
    let summary = client.account_rewards("0xalice").await.unwrap();

    assert_eq!(summary.claimable_rewards, dec!(2.5));
    assert_eq!(summary.total_rewards, dec!(12.5));
    assert_eq!(summary.recipient.as_deref(), Some("0xalice"));
}

#[tokio::test]
async fn test_legacy_reward_pool_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["0xAMM1", "0xamm2"])))
        .mount(&server)
        .await;

    let pools = RewardsClient::new(&server.uri())
        .unwrap()
        .reward_pools()
        .await
        .unwrap();

    assert!(matches!(pools, RewardPools::Legacy(_)));
    assert_eq!(pools.daily_rewards("0xamm1", dec!(1400)), dec!(100));
    assert_eq!(pools.daily_rewards("0xamm3", dec!(1400)), dec!(0));
}

#[tokio::test]
async fn test_per_pool_reward_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "0xAMM1": { "siDailyRewards": 250 },
            "0xamm2": { "siDailyRewards": 75.5 }
        })))
        .mount(&server)
        .await;

    let pools = RewardsClient::new(&server.uri())
        .unwrap()
        .reward_pools()
        .await
        .unwrap();

    assert_eq!(pools.daily_rewards("0xamm1", dec!(0)), dec!(250));
    assert_eq!(pools.daily_rewards("0xAMM2", dec!(0)), dec!(75.5));
}
