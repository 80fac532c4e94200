//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::{AlertSettings, AppConfig, ChainConfig, TwitterConfig};
use crate::common::errors::{Result, WatcherError};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with WHALE_)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    // Add default config file if it exists
    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    // Add environment variables with WHALE_ prefix
    builder = builder.add_source(
        Environment::with_prefix("WHALE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| WatcherError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| WatcherError::Configuration(e.to_string()))
}

/// Load configuration from environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    // Try to load from .env file
    dotenvy::dotenv().ok();

    let chain = ChainConfig {
        ws_url: std::env::var("CHAIN_WS_URL")
            .unwrap_or_else(|_| "wss://mainnet.optimism.io".to_string()),
        http_url: std::env::var("CHAIN_HTTP_URL")
            .unwrap_or_else(|_| "https://mainnet.optimism.io".to_string()),
        deployment_manifest: std::env::var("DEPLOYMENT_MANIFEST")
            .unwrap_or_else(|_| "deployment.json".to_string()),
    };

    let twitter = TwitterConfig {
        api_key: std::env::var("TWITTER_API_KEY").ok(),
        api_secret: std::env::var("TWITTER_API_SECRET").ok(),
        access_token: std::env::var("TWITTER_ACCESS_TOKEN").ok(),
        access_token_secret: std::env::var("TWITTER_ACCESS_TOKEN_SECRET").ok(),
        ..TwitterConfig::default()
    };

    Ok(AppConfig {
        chain,
        twitter,
        alerts: AlertSettings::default(),
    })
}
