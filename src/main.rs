//! options_market - Main Entry Point
//!
//! Fetches option markets, liquidity pools and account positions, derives
//! pricing and pool economics, and prints each snapshot as JSON.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use options_market::common::traits::{ChainReader, RewardSource};
use options_market::config::{load_config, AppConfig};
use options_market::feeds::{CoinGeckoPriceFeed, RewardSummary, RewardsClient, StateFileReader};
use options_market::market::Position;
use options_market::snapshot::{self, Batch};
use options_market::subgraph::SubgraphClient;

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "OPTIONS_MARKET_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Refresh on the configured poll interval until interrupted
    #[arg(long, global = true)]
    watch: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Option markets with pricing and greeks
    Markets,
    /// Liquidity pools, TVL and APY
    Pools {
        /// Account whose LP share to include
        #[arg(long)]
        account: Option<String>,
    },
    /// Positions held by an account
    Positions {
        #[arg(long)]
        account: String,
    },
}

#[derive(Serialize)]
struct PositionsOutput {
    #[serde(flatten)]
    positions: Batch<Position>,
    rewards: Option<RewardSummary>,
}

/// Long-lived collaborators built once from configuration
struct Services {
    config: AppConfig,
    subgraph: SubgraphClient,
    chain: StateFileReader,
    prices: CoinGeckoPriceFeed,
    rewards: Option<RewardsClient>,
}

impl Services {
    async fn build(config: AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.subgraph.request_timeout_seconds);
        let subgraph = SubgraphClient::with_timeout(&config.subgraph.url, timeout)?;
        let prices = CoinGeckoPriceFeed::with_timeout(&config.price_feed.url, timeout)?;
        let rewards = match &config.rewards {
            Some(rewards) => Some(RewardsClient::with_timeout(&rewards.url, timeout)?),
            None => None,
        };
        let chain = match &config.chain.state_file {
            Some(path) => StateFileReader::load(path)
                .await
                .with_context(|| format!("loading chain state from {}", path))?,
            None => {
                warn!("No chain state configured; AMM pricing and pools will be unavailable");
                StateFileReader::default()
            }
        };

        Ok(Self {
            config,
            subgraph,
            chain,
            prices,
            rewards,
        })
    }

    async fn run(&self, command: &Command) -> Result<String> {
        let trading = &self.config.trading;
        let chain: &dyn ChainReader = &self.chain;

        let output = match command {
            Command::Markets => {
                let views = snapshot::refresh_markets(&self.subgraph, chain, Utc::now(), trading).await?;
                serde_json::to_string_pretty(&views)?
            }
            Command::Pools { account } => {
                let pools = snapshot::refresh_pools(
                    &self.subgraph,
                    chain,
                    self.rewards.as_ref().map(|r| r as &dyn RewardSource),
                    &self.prices,
                    &self.config.price_feed.reward_token_id,
                    account.as_deref(),
                    trading,
                )
                .await?;
                serde_json::to_string_pretty(&pools)?
            }
            Command::Positions { account } => {
                let positions =
                    snapshot::refresh_positions(&self.subgraph, account, Utc::now(), trading).await?;
                let rewards = match &self.rewards {
                    Some(client) => match client.account_rewards(account).await {
                        Ok(summary) => Some(summary),
                        Err(e) => {
                            warn!("There was a problem fetching rewards: {}", e);
                            None
                        }
                    },
                    None => None,
                };
                serde_json::to_string_pretty(&PositionsOutput { positions, rewards })?
            }
        };
        Ok(output)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    // Initialize logging
    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting options_market");
    if let Some(path) = &args.config {
        info!("Configuration file: {}", path);
    }

    let poll_interval = Duration::from_secs(config.settings.poll_interval_seconds);
    let services = Services::build(config).await?;

    if !args.watch {
        println!("{}", services.run(&args.command).await?);
        return Ok(());
    }

    let mut interval = tokio::time::interval(poll_interval);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                match services.run(&args.command).await {
                    Ok(output) => println!("{}", output),
                    Err(e) => warn!("Refresh failed: {:#}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal, cleaning up...");
                break;
            }
        }
    }

    Ok(())
}
