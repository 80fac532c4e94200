//! Configuration types

use serde::{Deserialize, Serialize};

use crate::common::errors::{Result, WatcherError};
use crate::publish::oauth::OAuth1Credentials;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chain RPC configuration
    pub chain: ChainConfig,
    /// Posting API configuration
    #[serde(default)]
    pub twitter: TwitterConfig,
    /// Alert pipeline settings
    #[serde(default)]
    pub alerts: AlertSettings,
}

/// Chain RPC configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// WebSocket RPC URL for log subscriptions
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// HTTP RPC URL for registry/metadata calls
    #[serde(default = "default_http_url")]
    pub http_url: String,
    /// Path to the deployment manifest JSON (contract directory)
    #[serde(default = "default_manifest_path")]
    pub deployment_manifest: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            http_url: default_http_url(),
            deployment_manifest: default_manifest_path(),
        }
    }
}

fn default_ws_url() -> String {
    "wss://mainnet.optimism.io".to_string()
}

fn default_http_url() -> String {
    "https://mainnet.optimism.io".to_string()
}

fn default_manifest_path() -> String {
    "deployment.json".to_string()
}

/// Posting API (Twitter/X) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// Consumer API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// Consumer API secret
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Access token for the posting account
    #[serde(default)]
    pub access_token: Option<String>,
    /// Access token secret for the posting account
    #[serde(default)]
    pub access_token_secret: Option<String>,
    /// API base URL
    #[serde(default = "default_twitter_api_url")]
    pub api_url: String,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            access_token: None,
            access_token_secret: None,
            api_url: default_twitter_api_url(),
        }
    }
}

impl TwitterConfig {
    /// Build OAuth credentials, failing if any of the four fields is missing
    pub fn credentials(&self) -> Result<OAuth1Credentials> {
        let require = |field: &Option<String>, name: &str| {
            field.clone().ok_or_else(|| {
                WatcherError::Configuration(format!("missing twitter credential: {name}"))
            })
        };

        Ok(OAuth1Credentials {
            consumer_key: require(&self.api_key, "api_key")?,
            consumer_secret: require(&self.api_secret, "api_secret")?,
            access_token: require(&self.access_token, "access_token")?,
            access_token_secret: require(&self.access_token_secret, "access_token_secret")?,
        })
    }
}

fn default_twitter_api_url() -> String {
    "https://api.twitter.com".to_string()
}

/// Alert pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertSettings {
    /// Fixed delay between outbound publishes in milliseconds
    #[serde(default = "default_publish_delay")]
    pub publish_delay_ms: u64,
    /// Flat delay before re-opening a failed subscription in milliseconds
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
    /// Path to the long-direction flavor corpus
    #[serde(default = "default_flavor_long_path")]
    pub flavor_long_path: String,
    /// Path to the short-direction flavor corpus
    #[serde(default = "default_flavor_short_path")]
    pub flavor_short_path: String,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            publish_delay_ms: default_publish_delay(),
            reconnect_delay_ms: default_reconnect_delay(),
            flavor_long_path: default_flavor_long_path(),
            flavor_short_path: default_flavor_short_path(),
        }
    }
}

fn default_publish_delay() -> u64 {
    1000
}

fn default_reconnect_delay() -> u64 {
    5000
}

fn default_flavor_long_path() -> String {
    "data/flavor_long.txt".to_string()
}

fn default_flavor_short_path() -> String {
    "data/flavor_short.txt".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_settings_defaults() {
        let settings = AlertSettings::default();
        assert_eq!(settings.publish_delay_ms, 1000);
        assert_eq!(settings.reconnect_delay_ms, 5000);
        assert_eq!(settings.flavor_long_path, "data/flavor_long.txt");
    }

    #[test]
    fn test_twitter_credentials_require_all_fields() {
        let mut config = TwitterConfig {
            api_key: Some("key".to_string()),
            api_secret: Some("secret".to_string()),
            access_token: Some("token".to_string()),
            access_token_secret: None,
            ..TwitterConfig::default()
        };
        assert!(config.credentials().is_err());

        config.access_token_secret = Some("token_secret".to_string());
        let creds = config.credentials().unwrap();
        assert_eq!(creds.consumer_key, "key");
        assert_eq!(creds.access_token_secret, "token_secret");
    }
}
