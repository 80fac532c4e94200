//! Classification module - whale detection and notification formatting

pub mod classifier;
pub mod flavor;
pub mod format;

pub use classifier::{TradeClassifier, WHALE_THRESHOLD_USD};
pub use flavor::FlavorCorpus;
