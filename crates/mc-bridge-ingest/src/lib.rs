//! mc-bridge-ingest library crate.
//!
//! Reads a Minecraft server log stream and posts the interesting lines to a
//! chat channel's incoming webhook.
//!
//! # Architecture
//!
//! ```text
//! server log (stdin, one line at a time)
//!         ↓
//! [mc-bridge-ingest]
//!   ├── domain/           IngestConfig, FreshnessWindow
//!   ├── application/      IngestLogUseCase: parse → fresh? → classify → post
//!   └── infrastructure/
//!         ├── chat_poster WebhookPoster (reqwest)
//!         └── rules_file  optional TOML rule table
//!         ↓
//! chat platform (JSON POST to the webhook URL)
//! ```
//!
//! Parsing and classification live in `mc-bridge-core`.

/// Domain layer: configuration and the freshness policy.
pub mod domain;

/// Application layer: the sequential ingest pipeline.
pub mod application;

/// Infrastructure layer: outbound webhook client and rule file loading.
pub mod infrastructure;
