//! Persistent per-market log subscriptions
//!
//! One task per market holds a websocket subscription for the trade event,
//! decodes each occurrence and forwards it over the trade channel. Tasks are
//! independent; one market failing never unsubscribes the others. A dropped
//! connection is re-opened after a flat delay, for the process lifetime.

use alloy::primitives::Address;
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, info, warn};

use super::abi;
use super::messages::{JsonRpcRequest, JsonRpcResponse, SubscriptionNotification};
use crate::common::errors::{Result, WatcherError};
use crate::common::types::{MarketDescriptor, PositionModified};

/// Id used for the subscribe request on each connection
const SUBSCRIBE_REQUEST_ID: u64 = 1;

/// Spawns and owns the per-market subscription tasks
#[derive(Debug, Clone)]
pub struct SubscriptionManager {
    /// WebSocket RPC endpoint
    ws_url: String,
    /// Flat delay before re-opening a failed subscription
    reconnect_delay: Duration,
}

impl SubscriptionManager {
    /// Create a new subscription manager
    pub fn new(ws_url: &str, reconnect_delay: Duration) -> Self {
        Self {
            ws_url: ws_url.to_string(),
            reconnect_delay,
        }
    }

    /// Spawn one watch task per market descriptor
    ///
    /// Each task forwards decoded trade events to `sender` and runs until
    /// the receiver side of the channel is dropped.
    pub fn spawn_all(
        &self,
        descriptors: &HashMap<Address, MarketDescriptor>,
        sender: mpsc::Sender<PositionModified>,
    ) -> Vec<JoinHandle<()>> {
        descriptors
            .values()
            .cloned()
            .map(|descriptor| {
                let ws_url = self.ws_url.clone();
                let sender = sender.clone();
                let reconnect_delay = self.reconnect_delay;
                tokio::spawn(async move {
                    watch_market(ws_url, descriptor, sender, reconnect_delay).await;
                })
            })
            .collect()
    }
}

/// Hold a subscription for one market open forever, reconnecting on failure
async fn watch_market(
    ws_url: String,
    descriptor: MarketDescriptor,
    sender: mpsc::Sender<PositionModified>,
    reconnect_delay: Duration,
) {
    loop {
        match run_subscription(&ws_url, &descriptor, &sender).await {
            Ok(()) => {
                // channel closed; the process is shutting down
                debug!(symbol = %descriptor.symbol, "trade channel closed, ending watch");
                return;
            }
            Err(e) => {
                warn!(
                    symbol = %descriptor.symbol,
                    error = %e,
                    "subscription dropped, reconnecting"
                );
            }
        }
        tokio::time::sleep(reconnect_delay).await;
    }
}

/// Run one subscription until the stream ends or the channel closes
///
/// Returns `Ok(())` only when the receiver side of the trade channel is
/// gone; a closed or failed websocket is an error so the caller reconnects.
async fn run_subscription(
    ws_url: &str,
    descriptor: &MarketDescriptor,
    sender: &mpsc::Sender<PositionModified>,
) -> Result<()> {
    let (ws_stream, _response) = connect_async(ws_url)
        .await
        .map_err(|e| WatcherError::WebSocket(e.to_string()))?;
    let (mut write, mut read) = ws_stream.split();

    let request = subscribe_request(descriptor.address);
    write.send(Message::Text(serde_json::to_string(&request)?)).await?;

    let mut confirmed = false;
    while let Some(message) = read.next().await {
        let text = match message? {
            Message::Text(text) => text,
            Message::Binary(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    warn!(symbol = %descriptor.symbol, "non-utf8 frame, skipping");
                    continue;
                }
            },
            Message::Close(frame) => {
                return Err(WatcherError::WebSocket(format!(
                    "subscription closed: {frame:?}"
                )));
            }
            // tungstenite answers pings itself
            _ => continue,
        };

        if !confirmed && is_subscribe_confirmation(&text) {
            confirmed = true;
            info!(
                symbol = %descriptor.symbol,
                address = %descriptor.address,
                "listening for whales"
            );
            continue;
        }

        match decode_log_message(&text, descriptor.address) {
            Ok(Some(event)) => {
                if sender.send(event).await.is_err() {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(symbol = %descriptor.symbol, error = %e, "dropping undecodable event");
            }
        }
    }

    Err(WatcherError::WebSocket("subscription stream ended".to_string()))
}

/// Build the `eth_subscribe` request for one market's trade events
pub fn subscribe_request(address: Address) -> JsonRpcRequest {
    let params = serde_json::json!([
        "logs",
        {
            "address": address.to_string(),
            "topics": [abi::POSITION_MODIFIED_TOPIC],
        },
    ]);
    JsonRpcRequest::new(SUBSCRIBE_REQUEST_ID, "eth_subscribe", params)
}

/// Check whether a frame is the confirmation of our subscribe request
fn is_subscribe_confirmation(text: &str) -> bool {
    serde_json::from_str::<JsonRpcResponse>(text)
        .map(|response| response.id == Some(SUBSCRIBE_REQUEST_ID) && response.result.is_some())
        .unwrap_or(false)
}

/// Decode a pushed frame into a typed trade event
///
/// Returns `Ok(None)` for frames that are not subscription notifications
/// (keepalives, late confirmations) and for logs flagged as removed by a
/// reorg. Malformed notifications are an error.
pub fn decode_log_message(text: &str, market: Address) -> Result<Option<PositionModified>> {
    let Ok(notification) = serde_json::from_str::<SubscriptionNotification>(text) else {
        return Ok(None);
    };
    if notification.method != "eth_subscription" {
        return Ok(None);
    }

    let log = notification.params.result;
    if log.removed {
        debug!(market = %market, "ignoring removed log");
        return Ok(None);
    }

    abi::decode_position_modified(market, &log.topics, &log.data).map(Some)
}
