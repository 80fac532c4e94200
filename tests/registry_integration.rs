//! Integration tests for market directory resolution against a mocked node

use alloy::primitives::Address;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use whale_watch::chain::{DeploymentManifest, MarketRegistry};

const MANAGER: &str = "0x0000000000000000000000000000000000000001";
const ETH_IMPL: &str = "0x0000000000000000000000000000000000000011";
const BTC_IMPL: &str = "0x0000000000000000000000000000000000000012";
const DOGE_IMPL: &str = "0x0000000000000000000000000000000000000014";
const ETH_PROXY: &str = "0x0000000000000000000000000000000000000021";
const BTC_PROXY: &str = "0x0000000000000000000000000000000000000022";
const DOGE_PROXY: &str = "0x0000000000000000000000000000000000000044";

fn manifest() -> DeploymentManifest {
    let json = json!({
        "targets": {
            "FuturesMarketManager": {
                "name": "FuturesMarketManager",
                "source": "FuturesMarketManager",
                "address": MANAGER
            },
            "PerpsV2MarketETHPERP": {
                "name": "PerpsV2MarketETHPERP",
                "source": "PerpsV2Market",
                "address": ETH_IMPL
            },
            "PerpsV2MarketBTCPERP": {
                "name": "PerpsV2MarketBTCPERP",
                "source": "PerpsV2Market",
                "address": BTC_IMPL
            },
            "PerpsV2MarketDOGEPERP": {
                "name": "PerpsV2MarketDOGEPERP",
                "source": "PerpsV2Market",
                "address": DOGE_IMPL
            },
            "PerpsV2MarketSettings": {
                "name": "PerpsV2MarketSettings",
                "source": "PerpsV2MarketSettings",
                "address": "0x0000000000000000000000000000000000000013"
            }
        }
    });
    DeploymentManifest::from_json(&json.to_string()).unwrap()
}

fn word(hex_value: &str) -> String {
    format!("{:0>64}", hex_value.trim_start_matches("0x"))
}

fn address_array_result(addresses: &[&str]) -> String {
    let mut result = format!("0x{}{}", word("20"), word(&format!("{:x}", addresses.len())));
    for address in addresses {
        result.push_str(&word(address));
    }
    result
}

fn rpc_result(result: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result,
    }))
}

async fn mount_call(server: &MockServer, to: &str, result: &str) {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains(to))
        .respond_with(rpc_result(result))
        .mount(server)
        .await;
}

#[test_log::test(tokio::test)]
async fn test_resolve_builds_proxy_keyed_directory() {
    let server = MockServer::start().await;
    mount_call(
        &server,
        MANAGER,
        &address_array_result(&[ETH_PROXY, BTC_PROXY]),
    )
    .await;
    mount_call(&server, ETH_IMPL, &format!("0x{}", word(ETH_PROXY))).await;
    mount_call(&server, BTC_IMPL, &format!("0x{}", word(BTC_PROXY))).await;
    // delisted market: metadata resolves but the proxy is not active
    mount_call(&server, DOGE_IMPL, &format!("0x{}", word(DOGE_PROXY))).await;

    let registry = MarketRegistry::new(&server.uri(), manifest()).unwrap();
    let descriptors = registry.resolve().await.unwrap();

    assert_eq!(descriptors.len(), 2);
    let eth = &descriptors[&ETH_PROXY.parse::<Address>().unwrap()];
    assert_eq!(eth.symbol, "$ETH");
    assert_eq!(eth.address, ETH_PROXY.parse::<Address>().unwrap());
    assert_eq!(descriptors[&BTC_PROXY.parse::<Address>().unwrap()].symbol, "$BTC");
}

#[test_log::test(tokio::test)]
async fn test_empty_registry_fails_resolution() {
    let server = MockServer::start().await;
    mount_call(&server, MANAGER, &address_array_result(&[])).await;

    let registry = MarketRegistry::new(&server.uri(), manifest()).unwrap();
    assert!(registry.resolve().await.is_err());
}

#[test_log::test(tokio::test)]
async fn test_metadata_failure_aborts_whole_resolution() {
    let server = MockServer::start().await;
    // registry answers, but every per-market metadata call 404s
    mount_call(
        &server,
        MANAGER,
        &address_array_result(&[ETH_PROXY, BTC_PROXY]),
    )
    .await;

    let registry = MarketRegistry::new(&server.uri(), manifest()).unwrap();
    assert!(registry.resolve().await.is_err());
}

#[test_log::test(tokio::test)]
async fn test_rpc_error_response_fails_resolution() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "header not found" },
        })))
        .mount(&server)
        .await;

    let registry = MarketRegistry::new(&server.uri(), manifest()).unwrap();
    assert!(registry.resolve().await.is_err());
}
