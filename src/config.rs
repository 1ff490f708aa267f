//! Configuration for the killfeed monitor.
//!
//! Two values are required: the Discord webhook URL and the directory
//! containing the server's `.ADM` logs. Each can come from a compiled-in
//! constant or a command-line flag; a non-empty constant always wins over
//! the flag.
//!
//! # Example
//!
//! ```
//! use dayz_killfeed::config::Config;
//! use std::path::PathBuf;
//!
//! let config = Config::resolve(
//!     Some("https://discord.com/api/webhooks/1/abc".to_string()),
//!     Some(PathBuf::from("/opt/dayzserver/profiles")),
//! )
//! .unwrap();
//! assert!(config.webhook_url.starts_with("https://"));
//! ```

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Optional compiled-in webhook URL. Leave blank to use `--webhook-url`.
pub const WEBHOOK_URL: &str = "";

/// Optional compiled-in logs directory. Leave blank to use `--logs-dir`.
///
/// Windows example: `C:\DayZServer\profiles`
/// Linux example: `/opt/dayzserver/profiles`
pub const LOGS_DIR: &str = "";

/// Seconds between re-checking the directory for a newer ADM file.
pub const FILE_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Seconds between incremental reads of the current file.
pub const TAIL_INTERVAL: Duration = Duration::from_secs(1);

/// Seconds between scans of the pending message queue.
pub const DRAIN_INTERVAL: Duration = Duration::from_secs(1);

/// Backoff after a recoverable tail or drain error.
pub const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Backoff while no ADM files exist in the directory.
pub const SELECT_RETRY_INTERVAL: Duration = Duration::from_secs(30);

/// Seconds to hold a message before posting it to the webhook.
pub const SEND_DELAY_SECS: i64 = 300;

/// Errors that can occur while resolving configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No webhook URL from either the constant or the flag.
    #[error("webhook URL is required: set config::WEBHOOK_URL or pass --webhook-url")]
    MissingWebhookUrl,

    /// No logs directory from either the constant or the flag.
    #[error("logs directory is required: set config::LOGS_DIR or pass --logs-dir")]
    MissingLogsDir,
}

/// Resolved process configuration, constructed once at startup and passed
/// by reference into each component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord webhook URL to post kill notifications to.
    pub webhook_url: String,

    /// Directory scanned for `.ADM` log files.
    pub logs_dir: PathBuf,
}

impl Config {
    /// Resolves configuration from the compiled-in constants and CLI flags.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if either value is missing after resolution.
    pub fn resolve(
        webhook_flag: Option<String>,
        logs_flag: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let webhook_url = if WEBHOOK_URL.is_empty() {
            webhook_flag.ok_or(ConfigError::MissingWebhookUrl)?
        } else {
            WEBHOOK_URL.to_string()
        };

        let logs_dir = if LOGS_DIR.is_empty() {
            logs_flag.ok_or(ConfigError::MissingLogsDir)?
        } else {
            PathBuf::from(LOGS_DIR)
        };

        Ok(Self {
            webhook_url,
            logs_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_from_flags() {
        let config = Config::resolve(
            Some("https://discord.com/api/webhooks/1/abc".to_string()),
            Some(PathBuf::from("/var/log/dayz")),
        )
        .expect("both flags supplied");

        assert_eq!(config.webhook_url, "https://discord.com/api/webhooks/1/abc");
        assert_eq!(config.logs_dir, PathBuf::from("/var/log/dayz"));
    }

    #[test]
    fn missing_webhook_url_is_fatal() {
        let result = Config::resolve(None, Some(PathBuf::from("/var/log/dayz")));
        assert_eq!(result.unwrap_err(), ConfigError::MissingWebhookUrl);
    }

    #[test]
    fn missing_logs_dir_is_fatal() {
        let result = Config::resolve(Some("https://example.com/hook".to_string()), None);
        assert_eq!(result.unwrap_err(), ConfigError::MissingLogsDir);
    }

    #[test]
    fn error_messages_name_the_fix() {
        assert!(ConfigError::MissingWebhookUrl
            .to_string()
            .contains("--webhook-url"));
        assert!(ConfigError::MissingLogsDir.to_string().contains("--logs-dir"));
    }
}
