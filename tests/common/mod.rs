//! Common test utilities and fixtures

use alloy::primitives::{Address, I256, U256};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use whale_watch::common::errors::{Result, WatcherError};
use whale_watch::common::types::{MarketDescriptor, PositionModified};
use whale_watch::publish::NotificationSink;

/// Proxy address of the test BTC market
pub static BTC_MARKET: Lazy<Address> = Lazy::new(|| {
    "0x000000000000000000000000000000000000000A"
        .parse()
        .unwrap()
});

/// Account used in sample events
pub static WHALE_ACCOUNT: Lazy<Address> = Lazy::new(|| {
    "0x1111111111111111111111111111111111111111"
        .parse()
        .unwrap()
});

/// A one-market directory for the test BTC market
pub fn btc_descriptors() -> HashMap<Address, MarketDescriptor> {
    HashMap::from([(
        *BTC_MARKET,
        MarketDescriptor {
            address: *BTC_MARKET,
            symbol: "$BTC".to_string(),
        },
    )])
}

/// Build a signed 18-decimal fixed-point value from whole units
pub fn wei(units: i64) -> I256 {
    let magnitude = U256::from(units.unsigned_abs()) * U256::from(10u64).pow(U256::from(18u64));
    let value = I256::from_raw(magnitude);
    if units < 0 {
        -value
    } else {
        value
    }
}

/// Build a signed fixed-point value from tenths of a unit (`-25` is `-2.5`)
pub fn wei_tenths(tenths: i64) -> I256 {
    let magnitude = U256::from(tenths.unsigned_abs()) * U256::from(10u64).pow(U256::from(17u64));
    let value = I256::from_raw(magnitude);
    if tenths < 0 {
        -value
    } else {
        value
    }
}

/// A sample trade event on the test BTC market
pub fn sample_event(trade_size_units: i64, price_units: i64) -> PositionModified {
    sample_event_sized(wei(trade_size_units), price_units)
}

/// A sample trade event with an exact signed trade size
pub fn sample_event_sized(trade_size: I256, price_units: i64) -> PositionModified {
    PositionModified {
        market: *BTC_MARKET,
        id: U256::from(1u64),
        account: *WHALE_ACCOUNT,
        margin: wei(1_000).into_raw(),
        size: trade_size,
        trade_size,
        last_price: wei(price_units).into_raw(),
        funding_index: U256::from(3u64),
        fee: U256::ZERO,
        skew: trade_size,
    }
}

/// Sink that records every published text
///
/// Also tracks how many publishes are in flight at once so tests can
/// assert mutual exclusion of the drain loop.
#[derive(Debug, Default)]
pub struct RecordingSink {
    published: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts delivered so far, in delivery order
    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }

    /// Highest number of concurrently active publish calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn publish(&self, text: &str) -> Result<()> {
        let active = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(active, Ordering::SeqCst);

        // linger long enough for a concurrent drain to overlap, if one exists
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        self.published.lock().unwrap().push(text.to_string());

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Sink that rejects the first `failures` publishes, then records the rest
#[derive(Debug, Default)]
pub struct FlakySink {
    failures_remaining: AtomicUsize,
    published: Mutex<Vec<String>>,
}

impl FlakySink {
    pub fn new(failures: usize) -> Self {
        Self {
            failures_remaining: AtomicUsize::new(failures),
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for FlakySink {
    async fn publish(&self, text: &str) -> Result<()> {
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(WatcherError::Sink("rejected by service".to_string()));
        }
        self.published.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
