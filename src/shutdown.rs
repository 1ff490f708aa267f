//! Cooperative shutdown signaling.
//!
//! A single shared flag is set by the signal handler task and polled by
//! both background loops at the top of each iteration and inside every
//! sleep. No task is ever forcibly cancelled; an in-flight webhook call is
//! allowed to finish.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::time::sleep;
use tracing::info;

/// Granularity at which sleeps re-check the shutdown flag.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Shared shutdown flag, cheap to clone across tasks.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    /// Creates a new, unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Idempotent and callable from any task.
    pub fn request(&self) {
        if !self.0.swap(true, Ordering::SeqCst) {
            info!("Shutdown requested");
        }
    }

    /// Returns true once shutdown has been requested.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sleeps for `duration`, returning early if shutdown is requested.
    pub async fn sleep(&self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        while !self.is_set() {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                break;
            }
            sleep(remaining.min(POLL_INTERVAL)).await;
        }
    }
}

/// Waits for SIGINT or SIGTERM, then sets the shutdown flag.
pub async fn watch_for_signals(flag: ShutdownFlag) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received interrupt signal"),
        _ = terminate => info!("Received termination signal"),
    }

    flag.request();
}
