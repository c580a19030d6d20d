//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::{OptionsError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP__)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    // Pick up a .env file if one is present
    dotenvy::dotenv().ok();

    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if !Path::new(path).exists() {
            return Err(OptionsError::Configuration(format!(
                "config file {} not found",
                path
            )));
        }
        builder = builder.add_source(File::with_name(path).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("trading.stablecoins")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| OptionsError::Configuration(e.to_string()))?;

    let app: AppConfig = config
        .try_deserialize()
        .map_err(|e| OptionsError::Configuration(e.to_string()))?;

    validate(&app)?;
    Ok(app)
}

fn validate(config: &AppConfig) -> Result<()> {
    config.trading.lifecycle_policy()?;
    if config.settings.poll_interval_seconds == 0 {
        return Err(OptionsError::Configuration(
            "settings.poll_interval_seconds must be positive".to_string(),
        ));
    }
    url::Url::parse(&config.subgraph.url)
        .map_err(|e| OptionsError::Configuration(format!("subgraph.url: {}", e)))?;
    url::Url::parse(&config.price_feed.url)
        .map_err(|e| OptionsError::Configuration(format!("price_feed.url: {}", e)))?;
    if let Some(rewards) = &config.rewards {
        url::Url::parse(&rewards.url)
            .map_err(|e| OptionsError::Configuration(format!("rewards.url: {}", e)))?;
    }
    Ok(())
}
