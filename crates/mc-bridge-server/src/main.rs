//! mc-bridge webhook server: entry point.
//!
//! Listens for the chat platform's outgoing webhooks and shows every accepted
//! message to all players through the game server's remote console.
//!
//! # Usage
//!
//! ```text
//! mc-bridge-server --webhook-token <TOKEN> [OPTIONS]
//!
//! Options:
//!   --bind <ADDR>                 HTTP bind address [default: 127.0.0.1]
//!   --port <PORT>                 HTTP port [default: 8080]
//!   --rcon-host <HOST>            Game server host [default: 127.0.0.1]
//!   --rcon-port <PORT>            RCON port [default: 25575]
//!   --rcon-password <PASSWORD>    RCON password [default: minecraft]
//!   --rcon-timeout <SECS>         Bound for each RCON call [default: 10]
//!   --webhook-token <TOKEN>       Token every webhook must carry (required)
//!   --ignore-users <USERS>        Comma-separated users to ignore [default: slackbot]
//!   --discard-on-protocol-error   Reconnect after a mismatched RCON reply
//! ```
//!
//! Every option can also be set through the environment variable shown in
//! `--help` (`MC_BRIDGE_*`); CLI arguments take precedence.
//!
//! # What happens at startup
//!
//! 1. Logging is initialised; `RUST_LOG` controls the level (default `info`).
//! 2. The RCON client logs in once.  A wrong password or an unreachable game
//!    server aborts startup, since no command could ever succeed.
//! 3. The HTTP endpoint is served until Ctrl+C, then drains in-flight
//!    requests and exits.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mc_bridge_server::application::ForwardChatUseCase;
use mc_bridge_server::domain::ServerConfig;
use mc_bridge_server::infrastructure::{router, serve, RconClient};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Chat webhook → Minecraft RCON bridge.
#[derive(Debug, Parser)]
#[command(
    name = "mc-bridge-server",
    about = "Forwards chat-platform webhooks into a Minecraft server over RCON",
    version
)]
struct Cli {
    /// IP address the HTTP endpoint binds to.
    #[arg(long, default_value = "127.0.0.1", env = "MC_BRIDGE_BIND")]
    bind: String,

    /// TCP port the HTTP endpoint listens on.
    #[arg(long, default_value_t = 8080, env = "MC_BRIDGE_PORT")]
    port: u16,

    /// Host name or IP address of the game server.
    #[arg(long, default_value = "127.0.0.1", env = "MC_BRIDGE_RCON_HOST")]
    rcon_host: String,

    /// RCON port of the game server.
    #[arg(long, default_value_t = 25575, env = "MC_BRIDGE_RCON_PORT")]
    rcon_port: u16,

    /// RCON password (`rcon.password` in server.properties).
    #[arg(
        long,
        default_value = "minecraft",
        env = "MC_BRIDGE_RCON_PASSWORD",
        hide_env_values = true
    )]
    rcon_password: String,

    /// Upper bound in seconds for each RCON call, reconnect and login included.
    #[arg(long, default_value_t = 10, env = "MC_BRIDGE_RCON_TIMEOUT")]
    rcon_timeout: u64,

    /// Token the chat platform puts in every outgoing webhook.
    #[arg(long, env = "MC_BRIDGE_WEBHOOK_TOKEN", hide_env_values = true)]
    webhook_token: String,

    /// Comma-separated chat users whose messages are not forwarded.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "slackbot",
        env = "MC_BRIDGE_IGNORE_USERS"
    )]
    ignore_users: Vec<String>,

    /// Drop the RCON connection when a reply does not match its request.
    #[arg(long, env = "MC_BRIDGE_DISCARD_ON_PROTOCOL_ERROR")]
    discard_on_protocol_error: bool,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not an IP address, if `--rcon-host` or
    /// `--webhook-token` is empty, or if `--rcon-timeout` is zero.
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        let bind_addr: SocketAddr = format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("invalid bind address: '{}:{}'", self.bind, self.port))?;

        if self.rcon_host.trim().is_empty() {
            anyhow::bail!("--rcon-host must not be empty");
        }
        if self.rcon_timeout == 0 {
            anyhow::bail!("--rcon-timeout must be at least 1 second");
        }
        // A webhook without a token field deserializes to "".
        if self.webhook_token.trim().is_empty() {
            anyhow::bail!("--webhook-token must not be empty");
        }

        let ignored_users = self
            .ignore_users
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();

        Ok(ServerConfig {
            bind_addr,
            rcon_addr: format!("{}:{}", self.rcon_host, self.rcon_port),
            rcon_password: self.rcon_password,
            rcon_timeout: Duration::from_secs(self.rcon_timeout),
            webhook_token: self.webhook_token,
            ignored_users,
            discard_on_protocol_error: self.discard_on_protocol_error,
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_server_config()?;
    info!(
        "mc-bridge server starting, http={}, rcon={}",
        config.bind_addr, config.rcon_addr
    );

    let rcon = Arc::new(
        RconClient::new(config.rcon_addr.clone(), config.rcon_password.clone())
            .discard_on_protocol_error(config.discard_on_protocol_error),
    );
    rcon.login(config.rcon_timeout)
        .await
        .with_context(|| format!("failed to log in to RCON at {}", rcon.addr()))?;

    let use_case = Arc::new(ForwardChatUseCase::new(Arc::clone(&rcon), &config));
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    serve(listener, router(use_case), shutdown_signal())
        .await
        .context("HTTP server failed")?;

    rcon.disconnect().await;
    info!("mc-bridge server stopped");
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
