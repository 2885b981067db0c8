//! Server configuration.
//!
//! [`ServerConfig`] is a plain struct built once at startup from CLI
//! arguments (see `main.rs`) and then shared read-only.  Nothing in here reads
//! the environment.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// All runtime settings of the webhook server.
#[derive(Clone)]
pub struct ServerConfig {
    /// Address the HTTP endpoint listens on.
    pub bind_addr: SocketAddr,

    /// `host:port` of the game server's RCON listener.  Kept as a string so
    /// host names resolve at connect time.
    pub rcon_addr: String,

    /// RCON password.  Never logged.
    pub rcon_password: String,

    /// Upper bound for one RCON call, including reconnect and login.
    pub rcon_timeout: Duration,

    /// Shared secret every inbound webhook must carry.  Never logged.
    pub webhook_token: String,

    /// Chat user names whose messages are acknowledged but not forwarded.
    /// Usually the bridge's own bot, to avoid echo loops.
    pub ignored_users: Vec<String>,

    /// Also drop the RCON connection when a reply does not match its request.
    pub discard_on_protocol_error: bool,
}

impl Default for ServerConfig {
    /// | Field                     | Default             |
    /// |---------------------------|---------------------|
    /// | bind_addr                 | `127.0.0.1:8080`    |
    /// | rcon_addr                 | `127.0.0.1:25575`   |
    /// | rcon_password             | `minecraft`         |
    /// | rcon_timeout              | 10 seconds          |
    /// | webhook_token             | empty               |
    /// | ignored_users             | `["slackbot"]`      |
    /// | discard_on_protocol_error | `false`             |
    fn default() -> Self {
        Self {
            // Compile-time-known valid address.
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            rcon_addr: "127.0.0.1:25575".to_string(),
            rcon_password: "minecraft".to_string(),
            rcon_timeout: Duration::from_secs(10),
            webhook_token: String::new(),
            ignored_users: vec!["slackbot".to_string()],
            discard_on_protocol_error: false,
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("rcon_addr", &self.rcon_addr)
            .field("rcon_password", &"<redacted>")
            .field("rcon_timeout", &self.rcon_timeout)
            .field("webhook_token", &"<redacted>")
            .field("ignored_users", &self.ignored_users)
            .field("discard_on_protocol_error", &self.discard_on_protocol_error)
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
