//! DayZ killfeed monitor.
//!
//! Tails the newest `.ADM` admin log in a DayZ server's profile directory,
//! extracts player-vs-player kill events, and posts them to a Discord
//! webhook after a fixed delay.
//!
//! # Pipeline
//!
//! ```text
//! selector -> tailer -> extractor -> formatter -> queue -> sender
//! ```
//!
//! The tailer and the queue's drain loop run as independent tokio tasks
//! sharing the queue and a shutdown flag. Rotation to a newer log file is
//! followed automatically; content written before monitoring started is
//! never replayed.
//!
//! # Modules
//!
//! - [`config`]: configuration resolution and timing constants
//! - [`selector`]: picking the newest ADM file in the directory
//! - [`tailer`]: rotation-aware incremental file reading
//! - [`extractor`]: kill event pattern matching
//! - [`formatter`]: Discord message formatting and escaping
//! - [`queue`]: delayed delivery queue with shutdown flush
//! - [`sender`]: webhook HTTP client
//! - [`shutdown`]: cooperative shutdown flag and signal handling

pub mod config;
pub mod extractor;
pub mod formatter;
pub mod queue;
pub mod selector;
pub mod sender;
pub mod shutdown;
pub mod tailer;

pub use config::{Config, ConfigError};
pub use extractor::{extract, KillRecord};
pub use formatter::{format_message, sanitize};
pub use queue::{MessageQueue, QueuedMessage};
pub use selector::find_latest;
pub use sender::{SenderError, WebhookSender};
pub use shutdown::ShutdownFlag;
pub use tailer::Tailer;
