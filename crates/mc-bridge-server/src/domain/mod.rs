//! Domain layer: configuration and webhook payload types.  No I/O.

pub mod config;
pub mod webhook;

pub use config::ServerConfig;
pub use webhook::{tellraw_command, WebhookPayload};
