//! Common test utilities and fixtures

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

/// Expiration of the fixture markets, 2021-04-30 08:00 UTC
pub const EXPIRATION: i64 = 1619769600;

/// Thirty days before [`EXPIRATION`]
pub fn thirty_days_out() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, 31, 8, 0, 0).unwrap()
}

fn token(symbol: &str, decimals: u32) -> Value {
    json!({
        "id": format!("0x{}", symbol.to_lowercase()),
        "decimals": decimals,
        "symbol": symbol,
        "name": symbol,
    })
}

fn market(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "marketStyle": "AMERICAN_STYLE",
        "amm": { "id": "0xAMM" },
        "collateralToken": token("WBTC", 8),
        "paymentToken": token("USDC", 6),
        "marketName": name,
        "expirationDate": EXPIRATION.to_string(),
        "bToken": { "id": format!("{}-b", id), "decimals": 8, "totalSupply": "250000000" },
        "wToken": { "id": format!("{}-w", id), "decimals": 8, "totalSupply": "250000000" },
    })
}

/// Markets response with one valid call and one malformed name
pub fn markets_body() -> Value {
    json!({
        "data": {
            "markets": [
                market("0xcall", "WBTC.USDC.AMERICAN.C.60000"),
                market("0xbroken", "WBTC.USDC.C.60000"),
            ]
        }
    })
}

/// Liquidity pools response with a single WBTC call pool
pub fn pools_body() -> Value {
    json!({
        "data": {
            "amms": [{
                "id": "0xamm",
                "collateralToken": token("WBTC", 8),
                "paymentToken": token("USDC", 6),
                "lpToken": { "id": "0xlp", "decimals": 8, "totalSupply": "1000000000" },
            }]
        }
    })
}

/// Balances of one bToken in the fixture call market
pub fn balances_body() -> Value {
    json!({
        "data": {
            "accountBalances": [{
                "amount": "50000000",
                "token": {
                    "name": "WBTC.USDC.AMERICAN.C.60000 bToken",
                    "type": "B_TOKEN",
                    "decimals": 8,
                    "market": { "id": "0xcall" },
                },
            }]
        }
    })
}

/// Chain state for the fixture AMM: spot 65000, premium 0.05 WBTC,
/// volatility factor annualizing to about 0.6
pub const CHAIN_STATE: &str = r#"{
  "amms": {
    "0xAMM": {
      "collateral_price": "650000000000000000000",
      "volatility_factor": "42737384317069",
      "market_prices": { "0xCALL": "50000000000000000" }
    }
  },
  "pools": {
    "0xamm": {
      "total_pool_value": "1000000000",
      "deposit_limit": "2000000000"
    }
  },
  "lp_balances": {
    "0xlp": { "0xalice": "250000000" }
  }
}"#;
