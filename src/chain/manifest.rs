//! Deployment manifest parsing and market record filtering
//!
//! The manifest is the deployed contract directory shipped with the protocol
//! release: a `targets` map of named records carrying the record's source
//! contract type and deployed address.

use alloy::primitives::Address;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::common::errors::{Result, WatcherError};

/// Prefix shared by all market-type records
const MARKET_SOURCE_PREFIX: &str = "PerpsV2Market";

/// Auxiliary/administrative record types that share the market prefix but
/// are not tradeable markets themselves
const AUXILIARY_SOURCES: [&str; 9] = [
    "PerpsV2MarketData",
    "PerpsV2MarketSettings",
    "PerpsV2MarketState",
    "PerpsV2MarketViews",
    "PerpsV2MarketDelayedOrders",
    "PerpsV2MarketDelayedOrdersOffchain",
    "PerpsV2MarketDelayedIntent",
    "PerpsV2MarketDelayedExecution",
    "PerpsV2MarketLiquidate",
];

/// Name of the registry record listing all active markets
const MANAGER_TARGET: &str = "FuturesMarketManager";

/// Parsed deployment manifest
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentManifest {
    pub targets: HashMap<String, TargetRecord>,
}

/// A single deployed contract record
#[derive(Debug, Clone, Deserialize)]
pub struct TargetRecord {
    pub name: String,
    pub source: String,
    pub address: String,
}

impl TargetRecord {
    /// Parse the record's deployed address
    pub fn address(&self) -> Result<Address> {
        self.address.parse().map_err(|_| {
            WatcherError::Manifest(format!(
                "record {} has invalid address {}",
                self.name, self.address
            ))
        })
    }
}

impl DeploymentManifest {
    /// Parse a manifest from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| WatcherError::Manifest(format!("invalid manifest JSON: {e}")))
    }

    /// Load and parse a manifest file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| WatcherError::Manifest(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Address of the market registry contract
    pub fn manager_address(&self) -> Result<Address> {
        self.targets
            .get(MANAGER_TARGET)
            .ok_or_else(|| WatcherError::Manifest(format!("missing {MANAGER_TARGET} record")))?
            .address()
    }

    /// Records for the per-market implementation contracts
    ///
    /// Includes every record whose source carries the market type prefix,
    /// minus the fixed set of auxiliary record types.
    pub fn market_targets(&self) -> impl Iterator<Item = &TargetRecord> {
        self.targets.values().filter(|target| {
            target.source.starts_with(MARKET_SOURCE_PREFIX)
                && !AUXILIARY_SOURCES.contains(&target.source.as_str())
        })
    }
}

/// Derive a display symbol from a market record name
///
/// `PerpsV2MarketETHPERP` becomes `$ETH`.
pub fn derive_symbol(name: &str) -> String {
    let stripped = name.strip_prefix(MARKET_SOURCE_PREFIX).unwrap_or(name);
    let stripped = stripped.strip_suffix("PERP").unwrap_or(stripped);
    format!("${stripped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST_JSON: &str = r#"{
        "targets": {
            "FuturesMarketManager": {
                "name": "FuturesMarketManager",
                "source": "FuturesMarketManager",
                "address": "0xdb89f3fc45A707Dd49781495f77f8ae69bF5cA6e"
            },
            "PerpsV2MarketETHPERP": {
                "name": "PerpsV2MarketETHPERP",
                "source": "PerpsV2Market",
                "address": "0x0000000000000000000000000000000000000011"
            },
            "PerpsV2MarketBTCPERP": {
                "name": "PerpsV2MarketBTCPERP",
                "source": "PerpsV2Market",
                "address": "0x0000000000000000000000000000000000000012"
            },
            "PerpsV2MarketSettings": {
                "name": "PerpsV2MarketSettings",
                "source": "PerpsV2MarketSettings",
                "address": "0x0000000000000000000000000000000000000013"
            },
            "PerpsV2MarketStateETHPERP": {
                "name": "PerpsV2MarketStateETHPERP",
                "source": "PerpsV2MarketState",
                "address": "0x0000000000000000000000000000000000000014"
            },
            "ProxyERC20": {
                "name": "ProxyERC20",
                "source": "ProxyERC20",
                "address": "0x0000000000000000000000000000000000000015"
            }
        }
    }"#;

    #[test]
    fn test_manager_address() {
        let manifest = DeploymentManifest::from_json(MANIFEST_JSON).unwrap();
        assert_eq!(
            manifest.manager_address().unwrap(),
            "0xdb89f3fc45A707Dd49781495f77f8ae69bF5cA6e"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn test_market_targets_filter_auxiliary_records() {
        let manifest = DeploymentManifest::from_json(MANIFEST_JSON).unwrap();
        let mut names: Vec<&str> = manifest
            .market_targets()
            .map(|target| target.name.as_str())
            .collect();
        names.sort_unstable();
        assert_eq!(names, vec!["PerpsV2MarketBTCPERP", "PerpsV2MarketETHPERP"]);
    }

    #[test]
    fn test_every_auxiliary_source_is_excluded() {
        for source in AUXILIARY_SOURCES {
            assert!(source.starts_with(MARKET_SOURCE_PREFIX));
            let manifest = DeploymentManifest {
                targets: HashMap::from([(
                    source.to_string(),
                    TargetRecord {
                        name: source.to_string(),
                        source: source.to_string(),
                        address: "0x0000000000000000000000000000000000000001".to_string(),
                    },
                )]),
            };
            assert_eq!(manifest.market_targets().count(), 0);
        }
    }

    #[test]
    fn test_derive_symbol() {
        assert_eq!(derive_symbol("PerpsV2MarketETHPERP"), "$ETH");
        assert_eq!(derive_symbol("PerpsV2MarketBTCPERP"), "$BTC");
        assert_eq!(derive_symbol("PerpsV2MarketsUSD"), "$sUSD");
    }

    #[test]
    fn test_missing_manager_record() {
        let manifest = DeploymentManifest::from_json(r#"{"targets": {}}"#).unwrap();
        assert!(manifest.manager_address().is_err());
    }
}
