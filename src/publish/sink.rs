//! Notification sink abstraction

use async_trait::async_trait;

use crate::common::errors::Result;

/// Destination for finished notification texts
///
/// The queue drains into whatever implements this; production uses the
/// Twitter sink, tests substitute recorders or mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one notification text
    async fn publish(&self, text: &str) -> Result<()>;
}
