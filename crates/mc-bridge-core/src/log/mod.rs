//! Server log processing: line parsing and message classification.
//!
//! # Sub-modules
//!
//! - **`parser`** – Splits a raw line such as
//!   `[14:05:22] [Server thread/INFO]: Bob joined the game` into a
//!   [`parser::LogMessage`] with a timestamp, source, level and message body.
//!
//! - **`rules`** – The rule table: a TOML document listing, per category, the
//!   message templates the game prints.  The table is data, so new game
//!   messages can be supported without touching code.
//!
//! - **`classifier`** – Compiles a rule table into matchers and decides which
//!   [`classifier::Category`] a message body belongs to.

pub mod classifier;
pub mod parser;
pub mod rules;
