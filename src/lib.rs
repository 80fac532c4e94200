//! whale-watch Library
//!
//! A Rust service that watches Synthetix PerpsV2 markets for whale trades
//! and posts alerts to a social feed.

pub mod chain;
pub mod classify;
pub mod common;
pub mod config;
pub mod publish;

// Re-export commonly used types
pub use chain::{DeploymentManifest, MarketRegistry, SubscriptionManager};
pub use classify::{FlavorCorpus, TradeClassifier, WHALE_THRESHOLD_USD};
pub use common::errors::{Result, WatcherError};
pub use common::types::{
    Direction, MarketDescriptor, Notification, Position, PositionModified,
};
pub use config::types::AppConfig;
pub use publish::{NotificationSink, PublishQueue, TwitterSink};
