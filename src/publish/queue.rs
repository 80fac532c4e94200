//! Ordered, mutually-exclusive publish queue
//!
//! Arrivals are unordered and bursty; delivery must be strict FIFO with at
//! most one active drain loop. Two tokio mutexes carry the exclusion: the
//! pending deque is locked only around push/pop, and a separate drain lock
//! serializes whole drain calls so a late caller parks behind the active
//! one and wakes to an already-empty queue.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::sink::NotificationSink;
use crate::common::types::Notification;

/// FIFO buffer of pending notifications with serialized draining
pub struct PublishQueue {
    /// Pending notifications, appended at the tail, popped from the head
    pending: Mutex<VecDeque<Notification>>,
    /// Held for the whole lifetime of one drain loop
    drain_lock: Mutex<()>,
    /// Delivery target
    sink: Arc<dyn NotificationSink>,
    /// Fixed delay between outbound publishes
    publish_delay: Duration,
}

impl PublishQueue {
    /// Create a queue draining into `sink`
    pub fn new(sink: Arc<dyn NotificationSink>, publish_delay: Duration) -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            drain_lock: Mutex::new(()),
            sink,
            publish_delay,
        }
    }

    /// Append a notification at the tail
    pub async fn enqueue(&self, notification: Notification) {
        let mut pending = self.pending.lock().await;
        pending.push_back(notification);
        info!(queued = pending.len(), "notification enqueued");
    }

    /// Publish queued notifications in order until the queue is empty
    ///
    /// Callers invoke this once per classified notification without
    /// checking for an active drain; the drain lock makes the extra calls
    /// serialize behind the running loop and exit once they observe an
    /// empty queue. A sink failure is logged and the loop continues; the
    /// failed notification is not retried.
    pub async fn drain(&self) {
        let _guard = self.drain_lock.lock().await;
        loop {
            let next = self.pending.lock().await.pop_front();
            let Some(notification) = next else {
                break;
            };

            match self.sink.publish(&notification).await {
                Ok(()) => info!("notification published"),
                Err(e) => error!(error = %e, "publish failed, continuing drain"),
            }
            tokio::time::sleep(self.publish_delay).await;
        }
        debug!("queue drained");
    }

    /// Number of notifications currently pending
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }
}
