//! Discord webhook delivery.
//!
//! One POST per message with a JSON body of `{content, username,
//! avatar_url}`. Discord signals success for webhook posts with
//! `204 No Content`; anything else is a delivery failure. Retry policy is
//! the caller's concern, the sender makes exactly one attempt per call.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Display name attached to webhook posts.
const WEBHOOK_USERNAME: &str = "DayZ Killfeed";

/// Avatar attached to webhook posts.
const WEBHOOK_AVATAR_URL: &str =
    "https://cdn.cloudflare.steamstatic.com/steam/apps/221100/header.jpg";

/// HTTP request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur during webhook delivery.
#[derive(Error, Debug)]
pub enum SenderError {
    /// Transport-level failure (connect, timeout, DNS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook responded with something other than 204.
    #[error("webhook rejected message: status {status}")]
    UnexpectedStatus { status: u16 },
}

/// Webhook request body.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    username: &'a str,
    avatar_url: &'a str,
}

/// HTTP client for posting formatted kill messages to a Discord webhook.
#[derive(Debug)]
pub struct WebhookSender {
    client: Client,
    webhook_url: String,
}

impl WebhookSender {
    /// Creates a sender for the given webhook URL.
    #[must_use]
    pub fn new(webhook_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            webhook_url,
        }
    }

    /// Posts one message to the webhook.
    ///
    /// # Errors
    ///
    /// Returns `SenderError` on transport failure or any non-204 response.
    pub async fn send(&self, content: &str) -> Result<(), SenderError> {
        let payload = WebhookPayload {
            content,
            username: WEBHOOK_USERNAME,
            avatar_url: WEBHOOK_AVATAR_URL,
        };

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            info!(message = content, "Sent to Discord");
            Ok(())
        } else {
            Err(SenderError::UnexpectedStatus {
                status: response.status().as_u16(),
            })
        }
    }
}
