//! GraphQL documents sent to the protocol subgraph

pub const MARKETS_QUERY: &str = r#"
query GetMarkets {
  markets {
    id
    marketStyle
    marketIndex
    amm { id }
    collateralToken { id decimals name symbol }
    paymentToken { id decimals name symbol }
    marketName
    expirationDate
    wToken { id decimals totalSupply }
    bToken { id decimals totalSupply }
  }
}
"#;

pub const LIQUIDITY_POOLS_QUERY: &str = r#"
query GetLiquidityPools {
  amms {
    id
    collateralToken { id decimals symbol name }
    paymentToken { id decimals symbol name }
    lpToken { id decimals totalSupply }
  }
}
"#;

pub const ACCOUNT_BALANCES_QUERY: &str = r#"
query GetAccountBalance($id: String!) {
  accountBalances(where: { account: $id }) {
    amount
    token {
      name
      type
      decimals
      market { id }
    }
  }
}
"#;
