//! mc-bridge log ingester: entry point.
//!
//! Pipe the server log into it:
//!
//! ```text
//! tail -n0 -F logs/latest.log | mc-bridge-ingest --webhook-url https://hooks.example.com/...
//! ```
//!
//! # Usage
//!
//! ```text
//! mc-bridge-ingest --webhook-url <URL> [OPTIONS]
//!
//! Options:
//!   --webhook-url <URL>             Chat incoming-webhook URL (required)
//!   --webhook-timeout <SECS>        Bound for each post [default: 5]
//!   --freshness-tolerance <SECS>    Max past/future skew of a line [default: 60]
//!   --rules <PATH>                  TOML rule table replacing the built-in one
//! ```
//!
//! Reading stops at end of input or on Ctrl+C.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mc_bridge_core::Classifier;
use mc_bridge_ingest::application::{IngestLogUseCase, SystemClock};
use mc_bridge_ingest::domain::{FreshnessWindow, IngestConfig};
use mc_bridge_ingest::infrastructure::{load_rule_set, WebhookPoster};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Minecraft log → chat webhook forwarder.
#[derive(Debug, Parser)]
#[command(
    name = "mc-bridge-ingest",
    about = "Forwards chat, join/leave, death and advancement messages from a Minecraft log to a chat webhook",
    version
)]
struct Cli {
    /// Incoming-webhook URL of the chat channel.
    #[arg(long, env = "MC_BRIDGE_WEBHOOK_URL", hide_env_values = true)]
    webhook_url: String,

    /// Upper bound in seconds for each webhook post.
    #[arg(long, default_value_t = 5, env = "MC_BRIDGE_WEBHOOK_TIMEOUT")]
    webhook_timeout: u64,

    /// Lines more than this many seconds in the past or future are dropped.
    #[arg(long, default_value_t = 60, env = "MC_BRIDGE_FRESHNESS_TOLERANCE")]
    freshness_tolerance: u64,

    /// TOML rule table replacing the built-in classification rules.
    #[arg(long, env = "MC_BRIDGE_RULES")]
    rules: Option<PathBuf>,
}

impl Cli {
    /// Converts the parsed CLI arguments into an [`IngestConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--webhook-url` is not an absolute http(s) URL or
    /// if `--webhook-timeout` is zero.
    fn into_ingest_config(self) -> anyhow::Result<IngestConfig> {
        let url = reqwest::Url::parse(&self.webhook_url).context("invalid --webhook-url")?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("--webhook-url must be an http or https URL, got '{}'", url.scheme());
        }
        if self.webhook_timeout == 0 {
            anyhow::bail!("--webhook-timeout must be at least 1 second");
        }

        Ok(IngestConfig {
            webhook_url: self.webhook_url,
            webhook_timeout: Duration::from_secs(self.webhook_timeout),
            freshness_tolerance: Duration::from_secs(self.freshness_tolerance),
            rules_path: self.rules,
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_ingest_config()?;

    let rules = load_rule_set(config.rules_path.as_deref())?;
    let classifier = Classifier::new(&rules).context("failed to compile classification rules")?;
    let poster = WebhookPoster::new(config.webhook_url.clone()).context("failed to build HTTP client")?;

    let use_case = IngestLogUseCase::new(
        Arc::new(poster),
        Arc::new(SystemClock),
        classifier,
        FreshnessWindow::new(config.freshness_tolerance),
        config.webhook_timeout,
    );

    info!(
        "mc-bridge ingest starting, post timeout {:?}, freshness window {:?}",
        config.webhook_timeout, config.freshness_tolerance
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let stats = use_case
        .run_until(stdin, shutdown_signal())
        .await
        .context("failed to read log input")?;

    info!(
        lines = stats.lines,
        posted = stats.posted,
        failed = stats.failed,
        stale = stats.stale,
        unparsable = stats.unparsable,
        "mc-bridge ingest stopped"
    );
    Ok(())
}

/// Resolves on Ctrl+C.  If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C, shutting down"),
        Err(e) => {
            error!("failed to listen for Ctrl+C signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
