//! Ingest configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// All runtime settings of the log ingester.
#[derive(Clone)]
pub struct IngestConfig {
    /// Incoming-webhook URL of the chat channel.  The URL itself is the
    /// credential, so it is never logged.
    pub webhook_url: String,

    /// Upper bound for each post to the chat webhook.
    pub webhook_timeout: Duration,

    /// Lines whose timestamp is further than this from "now" are dropped.
    pub freshness_tolerance: Duration,

    /// Optional TOML rule table replacing the built-in one.
    pub rules_path: Option<PathBuf>,
}

impl Default for IngestConfig {
    /// | Field               | Default     |
    /// |---------------------|-------------|
    /// | webhook_url         | empty       |
    /// | webhook_timeout     | 5 seconds   |
    /// | freshness_tolerance | 60 seconds  |
    /// | rules_path          | built-in    |
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            webhook_timeout: Duration::from_secs(5),
            freshness_tolerance: Duration::from_secs(60),
            rules_path: None,
        }
    }
}

impl fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestConfig")
            .field("webhook_url", &"<redacted>")
            .field("webhook_timeout", &self.webhook_timeout)
            .field("freshness_tolerance", &self.freshness_tolerance)
            .field("rules_path", &self.rules_path)
            .finish()
    }
}
