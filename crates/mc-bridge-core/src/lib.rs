//! # mc-bridge-core
//!
//! Shared library for mc-bridge containing the remote-console (RCON) packet
//! codec, the server log line parser, and the event classifier.
//!
//! This crate is used by both the ingest and the server applications.
//! It has zero dependencies on OS APIs, network sockets, or async runtimes.
//!
//! # Architecture overview (for beginners)
//!
//! mc-bridge connects a Minecraft server with a chat channel in both
//! directions:
//!
//! - **log → chat**: the server writes lines such as
//!   `[14:05:22] [Server thread/INFO]: <Alice> hello` to its log.  The ingest
//!   application parses each line, decides whether it is interesting (chat,
//!   join/leave, death, advancement) and posts it to the chat webhook.
//! - **chat → server**: the chat platform delivers messages typed by users to
//!   an HTTP endpoint.  The server application forwards them to the game as
//!   `tellraw` commands over the RCON protocol.
//!
//! This crate (`mc-bridge-core`) is the shared foundation.  It defines:
//!
//! - **`protocol`** – How RCON bytes travel over the network.  Packets are
//!   encoded into a little-endian length-prefixed frame and decoded back into
//!   a typed [`Packet`].
//!
//! - **`log`** – Pure text processing.  The parser turns one raw log line into
//!   a [`LogMessage`]; the classifier decides which [`Category`] its message
//!   body belongs to, driven by a data-only rule table.

pub mod log;
pub mod protocol;

pub use log::classifier::{
    classify_message, is_advancement_message, is_chat_message, is_death_message,
    is_join_leave_message, Category, Classifier,
};
pub use log::parser::{parse_log_line, parse_log_line_on, LogMessage, UnparsableError};
pub use log::rules::{RuleError, RuleSet};
pub use protocol::codec::{decode_packet, encode_packet, FrameError};
pub use protocol::packet::Packet;
