//! Market directory resolver
//!
//! Resolves the set of active markets once at startup: one registry call for
//! the active market list, then one metadata call per manifest market record
//! to obtain the proxy address that actually emits trade events. Resolution
//! is all-or-nothing; an incomplete symbol table would misattribute events.

use alloy::primitives::Address;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::abi;
use super::manifest::{derive_symbol, DeploymentManifest};
use super::messages::{JsonRpcRequest, JsonRpcResponse};
use crate::common::errors::{Result, WatcherError};
use crate::common::types::MarketDescriptor;

/// Resolver for the on-chain market directory
#[derive(Debug, Clone)]
pub struct MarketRegistry {
    /// HTTP client
    client: Client,
    /// JSON-RPC endpoint URL
    http_url: String,
    /// Deployed contract directory
    manifest: DeploymentManifest,
}

impl MarketRegistry {
    /// Create a new registry resolver
    pub fn new(http_url: &str, manifest: DeploymentManifest) -> Result<Self> {
        Self::with_timeout(http_url, manifest, Duration::from_secs(30))
    }

    /// Create a new registry resolver with a custom request timeout
    pub fn with_timeout(
        http_url: &str,
        manifest: DeploymentManifest,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WatcherError::Resolution(e.to_string()))?;

        Ok(Self {
            client,
            http_url: http_url.trim_end_matches('/').to_string(),
            manifest,
        })
    }

    /// Issue a read-only `eth_call` and return the raw result hex
    async fn eth_call(&self, to: Address, data: String) -> Result<String> {
        let params = serde_json::json!([
            { "to": to.to_string(), "data": data },
            "latest",
        ]);
        let request = JsonRpcRequest::new(1, "eth_call", params);

        let response = self
            .client
            .post(&self.http_url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WatcherError::Resolution(format!(
                "node returned status {}",
                response.status()
            )));
        }

        let rpc_response: JsonRpcResponse = response.json().await?;
        if let Some(error) = rpc_response.error {
            return Err(WatcherError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        rpc_response
            .result
            .and_then(|value| value.as_str().map(str::to_string))
            .ok_or_else(|| WatcherError::Resolution("call returned no result".to_string()))
    }

    /// Fetch the full list of active market proxy addresses from the registry
    #[instrument(skip(self))]
    pub async fn active_markets(&self) -> Result<Vec<Address>> {
        let manager = self.manifest.manager_address()?;
        let data = abi::encode_call("allMarkets(bool)", &[abi::bool_word(true)]);
        let result = self.eth_call(manager, data).await?;
        abi::decode_address_array(&result)
    }

    /// Resolve the full market directory: proxy address to descriptor
    ///
    /// Fails if the registry call fails, returns an empty set, or any
    /// per-market metadata call fails.
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> Result<HashMap<Address, MarketDescriptor>> {
        let active = self.active_markets().await?;
        if active.is_empty() {
            return Err(WatcherError::Resolution(
                "registry returned no active markets".to_string(),
            ));
        }
        let active: HashSet<Address> = active.into_iter().collect();

        let mut descriptors = HashMap::new();
        for target in self.manifest.market_targets() {
            let result = self
                .eth_call(target.address()?, abi::encode_call("proxy()", &[]))
                .await?;
            let proxy = abi::decode_address_word(&result)?;

            if !active.contains(&proxy) {
                debug!(record = %target.name, proxy = %proxy, "market not in active set, skipping");
                continue;
            }

            let symbol = derive_symbol(&target.name);
            descriptors.insert(
                proxy,
                MarketDescriptor {
                    address: proxy,
                    symbol,
                },
            );
        }

        if descriptors.is_empty() {
            return Err(WatcherError::Resolution(
                "no market descriptors resolved".to_string(),
            ));
        }

        info!(markets = descriptors.len(), "market directory resolved");
        Ok(descriptors)
    }
}
