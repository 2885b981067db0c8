//! Chat incoming-webhook client.
//!
//! Each message is one `POST` of `{"text": "..."}` to the channel's webhook
//! URL.  Any non-2xx answer is an error carrying the status and the body the
//! platform sent back (it usually explains the problem, e.g. `invalid_token`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::application::ChatPoster;

/// Failure to deliver one message.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("webhook did not answer within {0:?}")]
    TimedOut(Duration),
}

#[derive(Serialize)]
struct WebhookBody<'a> {
    text: &'a str,
}

/// [`ChatPoster`] backed by a reqwest client.
pub struct WebhookPoster {
    client: reqwest::Client,
    url: String,
}

impl WebhookPoster {
    /// Builds a poster for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::Request`] if the TLS backend cannot be
    /// initialised.
    pub fn new(url: impl Into<String>) -> Result<Self, PostError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mc-bridge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ChatPoster for WebhookPoster {
    async fn post(&self, text: &str) -> Result<(), PostError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookBody { text })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "posted to chat webhook");
            return Ok(());
        }
        // The body is best effort; the status alone is enough to report.
        let body = response.text().await.unwrap_or_default();
        Err(PostError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
