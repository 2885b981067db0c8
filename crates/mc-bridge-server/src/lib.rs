//! mc-bridge-server library crate.
//!
//! Receives the chat platform's outgoing webhooks and replays each message in
//! game through the remote console (RCON) protocol.
//!
//! # Architecture
//!
//! ```text
//! Chat platform (form-encoded POST /)
//!         ↓
//! [mc-bridge-server]
//!   ├── domain/           ServerConfig, WebhookPayload, tellraw builder
//!   ├── application/      ForwardChatUseCase (token check, ignore list)
//!   └── infrastructure/
//!         ├── http        axum router
//!         └── rcon/       RconClient, frame I/O, connectors
//!         ↓
//! Game server (binary RCON over TCP, port 25575)
//! ```
//!
//! # Layer rules
//!
//! - `domain` does no I/O.
//! - `application` talks to the game server only through the
//!   [`application::CommandExecutor`] trait.
//! - `infrastructure` owns sockets, timers and HTTP.

/// Domain layer: configuration and payload types.
pub mod domain;

/// Application layer: the chat → server use case.
pub mod application;

/// Infrastructure layer: RCON client and HTTP endpoint.
pub mod infrastructure;
