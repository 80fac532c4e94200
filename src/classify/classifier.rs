//! Trade classification
//!
//! Turns raw trade events into finished notifications when the trade's
//! notional value clears the whale threshold. Every failure mode here drops
//! the single event and logs; a fault must never unwind into the
//! subscription callback that invoked us.

use alloy::primitives::Address;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::flavor::FlavorCorpus;
use super::format::render_notification;
use crate::chain::abi;
use crate::common::types::{
    Direction, MarketDescriptor, Notification, Position, PositionModified,
};

/// Minimum notional value, in USD units, for a trade to be published
pub const WHALE_THRESHOLD_USD: Decimal = dec!(1_000_000);

/// Classifier over a resolved market directory
#[derive(Debug, Clone)]
pub struct TradeClassifier {
    /// Proxy address to descriptor map, immutable after startup
    descriptors: HashMap<Address, MarketDescriptor>,
    /// Flavor-text source
    corpus: FlavorCorpus,
}

impl TradeClassifier {
    /// Create a classifier over the resolved directory
    pub fn new(descriptors: HashMap<Address, MarketDescriptor>, corpus: FlavorCorpus) -> Self {
        Self {
            descriptors,
            corpus,
        }
    }

    /// Classify one trade event
    ///
    /// Returns the rendered notification if the trade clears the threshold,
    /// `None` otherwise. Unknown markets, conversion failures and corpus
    /// failures all drop the event.
    pub fn classify(&self, event: &PositionModified) -> Option<Notification> {
        let descriptor = match self.descriptors.get(&event.market) {
            Some(descriptor) => descriptor,
            None => {
                // directory may be stale relative to a newly added market
                debug!(market = %event.market, "event from unknown market, dropping");
                return None;
            }
        };

        let trade_size = match abi::i256_abs_to_decimal(event.trade_size) {
            Ok(value) => value,
            Err(e) => {
                warn!(symbol = %descriptor.symbol, error = %e, "bad trade size, dropping event");
                return None;
            }
        };
        let last_price = match abi::u256_to_decimal(event.last_price) {
            Ok(value) => value,
            Err(e) => {
                warn!(symbol = %descriptor.symbol, error = %e, "bad price, dropping event");
                return None;
            }
        };

        let direction = Direction::from_signed_size(event.trade_size);
        let notional = trade_size * last_price;
        if notional < WHALE_THRESHOLD_USD {
            debug!(symbol = %descriptor.symbol, %notional, "below threshold");
            return None;
        }

        let position = Position {
            account: event.account,
            market_symbol: descriptor.symbol.clone(),
            trade_size,
            direction,
            last_price,
            notional,
        };

        let flavor = match self.corpus.sample(direction) {
            Ok(line) => line,
            Err(e) => {
                warn!(symbol = %descriptor.symbol, error = %e, "flavor corpus failed, dropping event");
                return None;
            }
        };

        info!(
            symbol = %position.market_symbol,
            direction = %position.direction,
            %notional,
            "whale trade classified"
        );
        Some(render_notification(&position, &flavor))
    }
}
