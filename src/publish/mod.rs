//! Publish module - serialized delivery of finished notifications

pub mod oauth;
pub mod queue;
pub mod sink;
pub mod twitter;

pub use queue::PublishQueue;
pub use sink::NotificationSink;
pub use twitter::TwitterSink;
