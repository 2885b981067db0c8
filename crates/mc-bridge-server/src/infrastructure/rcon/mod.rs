//! Remote console (RCON) client.
//!
//! # Connection lifecycle (for beginners)
//!
//! The client owns at most one TCP connection to the game server.  The
//! connection is opened lazily: the first [`RconClient::execute`] call
//! connects and sends the password (the *login exchange*), later calls reuse
//! the authenticated stream.
//!
//! ```text
//!            execute / login
//!  Disconnected ─────────────► Connected(stream)
//!        ▲                            │
//!        └── transport failure, ──────┘
//!            timeout, auth failure
//! ```
//!
//! Every public operation holds one `tokio::sync::Mutex` for its whole
//! duration, so concurrent callers are served strictly one after another and
//! request/reply pairs never interleave on the wire.
//!
//! The stream is taken *out* of the state while an exchange runs and only
//! put back once the exchange completes.  If the caller's future is dropped
//! halfway (or the deadline fires), the half-used stream is dropped with it
//! and the next caller starts from a fresh connection.

pub mod frame_io;
pub mod mock;
pub mod transport;

use std::io;
use std::time::Duration;

use mc_bridge_core::protocol::{packet_type, FrameError, Packet, DEFAULT_REQUEST_ID};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::application::forward_chat::CommandExecutor;
pub use transport::{Connector, TcpConnector};

// ── Errors ────────────────────────────────────────────────────────────────────

/// Failure of a single RCON operation.
#[derive(Debug, Error)]
pub enum RconError {
    /// The server rejected the password or answered the login out of shape.
    #[error("authentication with {addr} was rejected")]
    Auth { addr: String },

    /// The command reply did not match the request.  The connection itself is
    /// still healthy.
    #[error("unexpected reply to command (request id {request_id}, type {packet_type})")]
    Protocol { request_id: u32, packet_type: u32 },

    /// The connection failed and has been discarded.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Connection-level failure.  The client always discards the stream after one
/// of these.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {addr}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    #[error("malformed frame: {0}")]
    Frame(#[from] FrameError),

    #[error("deadline of {0:?} exceeded")]
    TimedOut(Duration),

    #[error("connection closed by server")]
    Closed,
}

impl TransportError {
    /// Maps an I/O error, treating an early EOF as an orderly close.
    pub fn from_io(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::Closed
        } else {
            Self::Io(err)
        }
    }
}

// ── Connection state ──────────────────────────────────────────────────────────

/// The client's single physical connection.
#[derive(Debug)]
enum ConnectionState<S> {
    Disconnected,
    Connected(S),
}

impl<S> ConnectionState<S> {
    /// Takes the stream out, leaving `Disconnected` behind.
    fn take(&mut self) -> Option<S> {
        match std::mem::replace(self, Self::Disconnected) {
            Self::Connected(stream) => Some(stream),
            Self::Disconnected => None,
        }
    }

    fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }
}

// ── Client ────────────────────────────────────────────────────────────────────

/// Serializing, self-healing RCON client.
///
/// Share it between tasks with `Arc<RconClient>`.
pub struct RconClient<C: Connector = TcpConnector> {
    connector: C,
    addr: String,
    password: String,
    discard_on_protocol_error: bool,
    state: Mutex<ConnectionState<C::Stream>>,
}

impl RconClient<TcpConnector> {
    /// Creates a TCP client for `addr` (`host:port`).  No connection is made
    /// until the first operation.
    pub fn new(addr: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_connector(TcpConnector, addr, password)
    }
}

impl<C: Connector> RconClient<C> {
    /// Creates a client that opens its streams through `connector`.
    pub fn with_connector(connector: C, addr: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            connector,
            addr: addr.into(),
            password: password.into(),
            discard_on_protocol_error: false,
            state: Mutex::new(ConnectionState::Disconnected),
        }
    }

    /// When `true`, a [`RconError::Protocol`] also drops the connection.
    pub fn discard_on_protocol_error(mut self, discard: bool) -> Self {
        self.discard_on_protocol_error = discard;
        self
    }

    /// The `host:port` this client talks to.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Returns `true` if an authenticated connection is currently held.
    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.is_connected()
    }

    /// Drops the held connection, if any.
    pub async fn disconnect(&self) {
        if self.state.lock().await.take().is_some() {
            info!(addr = %self.addr, "RCON connection closed");
        }
    }

    /// Connects and authenticates if no connection is held.
    ///
    /// # Errors
    ///
    /// [`RconError::Auth`] if the password is rejected, [`RconError::Transport`]
    /// if the server cannot be reached within `timeout`.
    pub async fn login(&self, timeout: Duration) -> Result<(), RconError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock_until(deadline, timeout).await?;
        if !state.is_connected() {
            let stream = self.open(deadline, timeout).await?;
            *state = ConnectionState::Connected(stream);
        }
        Ok(())
    }

    /// Runs `command` on the server and returns its textual reply.
    ///
    /// `timeout` bounds the whole call: waiting for the lock, reconnecting,
    /// logging in and the command exchange itself.
    ///
    /// # Errors
    ///
    /// See [`RconError`].  After a `Transport` or `Auth` error the client is
    /// disconnected and the next call reconnects.
    pub async fn execute(&self, command: &str, timeout: Duration) -> Result<String, RconError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock_until(deadline, timeout).await?;

        let mut stream = match state.take() {
            Some(stream) => stream,
            None => self.open(deadline, timeout).await?,
        };

        let reply = match timeout_at(deadline, exchange(&mut stream, &Packet::command(command))).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!(addr = %self.addr, error = %e, "RCON transport failed, dropping connection");
                return Err(e.into());
            }
            Err(_) => {
                warn!(addr = %self.addr, ?timeout, "RCON command timed out, dropping connection");
                return Err(TransportError::TimedOut(timeout).into());
            }
        };

        if reply.request_id != DEFAULT_REQUEST_ID || reply.packet_type != packet_type::COMMAND_ACK {
            warn!(
                request_id = reply.request_id,
                packet_type = reply.packet_type,
                "unexpected RCON reply"
            );
            if !self.discard_on_protocol_error {
                *state = ConnectionState::Connected(stream);
            }
            return Err(RconError::Protocol {
                request_id: reply.request_id,
                packet_type: reply.packet_type,
            });
        }

        *state = ConnectionState::Connected(stream);
        debug!(command, reply_len = reply.payload.len(), "RCON command executed");
        Ok(reply.payload_text())
    }

    async fn lock_until(
        &self,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<tokio::sync::MutexGuard<'_, ConnectionState<C::Stream>>, RconError> {
        timeout_at(deadline, self.state.lock())
            .await
            .map_err(|_| TransportError::TimedOut(timeout).into())
    }

    /// Connects and performs the login exchange, all before `deadline`.
    async fn open(&self, deadline: Instant, timeout: Duration) -> Result<C::Stream, RconError> {
        let attempt = async {
            let mut stream = self
                .connector
                .connect(&self.addr)
                .await
                .map_err(|source| TransportError::Connect {
                    addr: self.addr.clone(),
                    source,
                })?;
            let reply = exchange(&mut stream, &Packet::login(&self.password)).await?;
            Ok::<_, TransportError>((stream, reply))
        };

        let (stream, reply) = match timeout_at(deadline, attempt).await {
            Ok(result) => result?,
            Err(_) => return Err(TransportError::TimedOut(timeout).into()),
        };

        if reply.request_id != DEFAULT_REQUEST_ID || reply.packet_type != packet_type::LOGIN_ACK {
            warn!(addr = %self.addr, request_id = reply.request_id, "RCON login rejected");
            return Err(RconError::Auth {
                addr: self.addr.clone(),
            });
        }

        info!(addr = %self.addr, "RCON connection authenticated");
        Ok(stream)
    }
}

/// One request/reply pair on an open stream.
async fn exchange<S>(stream: &mut S, request: &Packet) -> Result<Packet, TransportError>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send,
{
    frame_io::write_packet(stream, request).await?;
    frame_io::read_packet(stream).await
}

#[async_trait::async_trait]
impl<C: Connector> CommandExecutor for RconClient<C> {
    async fn execute(&self, command: &str, timeout: Duration) -> Result<String, RconError> {
        RconClient::execute(self, command, timeout).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
