//! Infrastructure layer: the RCON client and the inbound HTTP endpoint.

pub mod http;
pub mod rcon;

pub use http::{router, serve};
pub use rcon::{RconClient, RconError, TransportError};
