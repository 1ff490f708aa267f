//! Delayed delivery queue for formatted kill messages.
//!
//! Messages sit in the queue for a fixed delay before being posted, so a
//! killer cannot use the feed to learn their victim's position in real
//! time. The tail task produces into the queue while the drain task
//! consumes from it, so access goes through a mutex.
//!
//! Delivery is best-effort: one attempt per due message per drain pass,
//! plus one unconditional attempt for everything still pending when the
//! process shuts down.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::config::DRAIN_INTERVAL;
use crate::sender::WebhookSender;
use crate::shutdown::ShutdownFlag;

/// A formatted notification awaiting delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedMessage {
    /// Sanitized message text.
    pub text: String,

    /// Earliest time the message may be posted.
    pub send_after: DateTime<Utc>,
}

/// Queue of pending messages, shared between the tail and drain tasks.
#[derive(Debug, Clone)]
pub struct MessageQueue {
    pending: Arc<Mutex<Vec<QueuedMessage>>>,
    delay: TimeDelta,
}

impl MessageQueue {
    /// Creates an empty queue with the given hold delay.
    #[must_use]
    pub fn new(delay: TimeDelta) -> Self {
        Self {
            pending: Arc::new(Mutex::new(Vec::new())),
            delay,
        }
    }

    /// Queues a message for delivery after the configured delay.
    /// Empty text is a no-op.
    pub async fn enqueue(&self, text: String) {
        if text.is_empty() {
            return;
        }

        let send_after = Utc::now() + self.delay;
        info!(
            send_at = %send_after.format("%H:%M:%S"),
            message = %text,
            "Queued message"
        );

        self.pending.lock().await.push(QueuedMessage { text, send_after });
    }

    /// Returns the number of pending messages.
    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Returns true if nothing is pending.
    pub async fn is_empty(&self) -> bool {
        self.pending.lock().await.is_empty()
    }

    /// Delivers every due message once, keeping the rest.
    ///
    /// A message that fails delivery is dropped, not rescheduled; the
    /// failure is logged only.
    pub async fn drain_due(&self, sender: &WebhookSender) {
        let now = Utc::now();

        let due: Vec<QueuedMessage> = {
            let mut pending = self.pending.lock().await;
            let (ready, rest): (Vec<_>, Vec<_>) =
                pending.drain(..).partition(|m| now >= m.send_after);
            *pending = rest;
            ready
        };

        for message in due {
            if let Err(e) = sender.send(&message.text).await {
                error!(error = %e, message = %message.text, "Failed to deliver message");
            }
        }
    }

    /// Runs the drain loop until shutdown is requested.
    pub async fn run_drain(&self, sender: &WebhookSender, shutdown: &ShutdownFlag) {
        info!("Starting message queue drain loop");

        while !shutdown.is_set() {
            self.drain_due(sender).await;
            shutdown.sleep(DRAIN_INTERVAL).await;
        }

        info!("Drain loop stopped");
    }

    /// Delivers everything still pending, ignoring scheduled times, then
    /// clears the queue. Used only during shutdown.
    pub async fn flush_all(&self, sender: &WebhookSender) {
        let remaining: Vec<QueuedMessage> =
            std::mem::take(&mut *self.pending.lock().await);

        if remaining.is_empty() {
            info!("No queued messages to send");
            return;
        }

        info!(count = remaining.len(), "Sending queued messages before shutdown");

        for message in remaining {
            if let Err(e) = sender.send(&message.text).await {
                error!(error = %e, message = %message.text, "Failed to send message during shutdown");
            }
        }

        info!("All queued messages processed");
    }
}
