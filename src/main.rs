//! DayZ killfeed monitor binary.
//!
//! Watches the newest DayZ `.ADM` log for PvP kill events and posts them to
//! a Discord webhook after a delay. Ctrl+C or SIGTERM triggers a graceful
//! shutdown that flushes every pending notification immediately.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dayz_killfeed::config::{Config, FILE_CHECK_INTERVAL, SEND_DELAY_SECS};
use dayz_killfeed::queue::MessageQueue;
use dayz_killfeed::sender::WebhookSender;
use dayz_killfeed::shutdown::{watch_for_signals, ShutdownFlag};
use dayz_killfeed::tailer::Tailer;

/// DayZ log parser for a Discord killfeed.
///
/// Monitors the latest DayZ server ADM log file for kill events and sends
/// them to Discord, switching to newer ADM files as they are created.
#[derive(Parser, Debug)]
#[command(name = "dayz-killfeed")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Discord webhook URL.
    #[arg(long)]
    webhook_url: Option<String>,

    /// Path to the DayZ logs directory.
    #[arg(long)]
    logs_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    let config = Config::resolve(cli.webhook_url, cli.logs_dir)
        .context("failed to resolve configuration")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    runtime.block_on(run(config));
    Ok(())
}

/// Wires the components together and supervises the two background tasks.
async fn run(config: Config) {
    info!("Starting DayZ killfeed monitor");
    info!(dir = %config.logs_dir.display(), "Monitoring directory");
    info!(
        file_check_secs = FILE_CHECK_INTERVAL.as_secs(),
        webhook_delay_secs = SEND_DELAY_SECS,
        "Timing configuration"
    );

    let shutdown = ShutdownFlag::new();
    let queue = MessageQueue::new(TimeDelta::seconds(SEND_DELAY_SECS));
    let sender = Arc::new(WebhookSender::new(config.webhook_url.clone()));

    tokio::spawn(watch_for_signals(shutdown.clone()));

    let tail_task = tokio::spawn(
        Tailer::new(config.logs_dir.clone(), queue.clone()).run(shutdown.clone()),
    );

    let drain_task = tokio::spawn({
        let queue = queue.clone();
        let sender = Arc::clone(&sender);
        let shutdown = shutdown.clone();
        async move { queue.run_drain(&sender, &shutdown).await }
    });

    // One task failing must not keep the other from shutting down cleanly.
    for (name, task) in [("tailer", tail_task), ("drain", drain_task)] {
        if let Err(e) = task.await {
            error!(task = name, error = %e, "Background task failed");
            shutdown.request();
        }
    }

    // Pending notifications always go out, whatever triggered the exit.
    queue.flush_all(&sender).await;

    info!("Monitor stopped");
}

/// Initializes the logging subsystem.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();
}
