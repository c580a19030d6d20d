//! Integration tests for the subgraph client against a mock GraphQL endpoint

mod common;

use options_market::common::traits::MarketIndex;
use options_market::subgraph::SubgraphClient;
use options_market::OptionsError;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> SubgraphClient {
    SubgraphClient::new(&server.uri()).expect("Failed to create subgraph client")
}

#[tokio::test]
async fn test_fetch_markets() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains("GetMarkets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::markets_body()))
        .expect(1)
        .mount(&server)
        .await;

    let markets = client_for(&server).await.markets().await.unwrap();

    assert_eq!(markets.len(), 2);
    assert_eq!(markets[0].market_name, "WBTC.USDC.AMERICAN.C.60000");
    assert_eq!(markets[0].expiration_date, common::EXPIRATION.to_string());
    assert_eq!(markets[0].b_token.total_supply, "250000000");
}

#[tokio::test]
async fn test_fetch_liquidity_pools() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("GetLiquidityPools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::pools_body()))
        .mount(&server)
        .await;

    let pools = client_for(&server).await.liquidity_pools().await.unwrap();

    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0].lp_token.id, "0xlp");
    assert_eq!(pools[0].collateral_token.symbol, "WBTC");
}

#[tokio::test]
async fn test_account_is_lowercased() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("\"id\":\"0xabcdef\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::balances_body()))
        .expect(1)
        .mount(&server)
        .await;

    let balances = client_for(&server)
        .await
        .account_balances("0xABCDEF")
        .await
        .unwrap();

    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].amount, "50000000");
    assert_eq!(balances[0].token.kind.as_deref(), Some("B_TOKEN"));
}

#[tokio::test]
async fn test_graphql_errors_are_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "indexing error" }]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).await.markets().await.unwrap_err();

    match err {
        OptionsError::InvalidResponse(message) => assert!(message.contains("indexing error")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.liquidity_pools().await.unwrap_err();

    match err {
        OptionsError::InvalidResponse(message) => {
            assert!(message.contains("502"), "{}", message);
            assert!(message.contains("bad gateway"), "{}", message);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_data_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client_for(&server).await.markets().await.unwrap_err();
    assert!(matches!(err, OptionsError::InvalidResponse(_)), "{:?}", err);
}
