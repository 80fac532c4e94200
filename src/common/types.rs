//! Core domain types shared across the watcher

use alloy::primitives::{Address, I256, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a trade, derived from the sign of the trade size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Classify a signed trade size.
    ///
    /// A positive size is `Long`, anything else is `Short`. Zero-size
    /// modifications land in the `Short` branch for determinism; they carry
    /// zero notional value and never reach the publish threshold.
    pub fn from_signed_size(size: I256) -> Self {
        if size > I256::ZERO {
            Direction::Long
        } else {
            Direction::Short
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// A resolved market: the event-emitting proxy address and its display symbol
///
/// Built once at startup by the registry resolver and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketDescriptor {
    /// Proxy address that emits trade events for this market
    pub address: Address,
    /// Display symbol, e.g. `$ETH`
    pub symbol: String,
}

/// A decoded `PositionModified` event occurrence
///
/// All numeric fields are raw 18-decimal fixed-point words as emitted on
/// chain. Ephemeral: lives only for one handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionModified {
    /// Market (proxy) contract that emitted the event
    pub market: Address,
    /// Position id
    pub id: U256,
    /// Account that modified the position
    pub account: Address,
    /// Remaining margin
    pub margin: U256,
    /// Position size after the modification
    pub size: I256,
    /// Signed size of this trade
    pub trade_size: I256,
    /// Price the trade executed at
    pub last_price: U256,
    /// Funding index at execution
    pub funding_index: U256,
    /// Fee paid
    pub fee: U256,
    /// Market skew after the modification
    pub skew: I256,
}

/// A classified whale position, ready for formatting
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Account that traded
    pub account: Address,
    /// Display symbol of the market, e.g. `$BTC`
    pub market_symbol: String,
    /// Absolute trade size in decimal units
    pub trade_size: Decimal,
    /// Trade direction
    pub direction: Direction,
    /// Execution price in decimal units
    pub last_price: Decimal,
    /// USD-equivalent notional value, `trade_size * last_price`
    pub notional: Decimal,
}

/// A finished notification text, queued and consumed exactly once
pub type Notification = String;
