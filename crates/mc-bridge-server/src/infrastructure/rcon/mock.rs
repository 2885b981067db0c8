//! In-memory RCON server for testing the client without a game server.
//!
//! [`MockConnector`] hands out [`ScriptedStream`]s that decode every frame
//! the client writes and queue the server's answer synchronously: a correct
//! password gets a `LoginAck` echoing the request id, a wrong one gets id
//! `u32::MAX` exactly like a real server, and each command gets a
//! `CommandAck` whose payload is `executed: <command>`.
//!
//! Failures are scripted per command number (1-based, counted across all
//! connections made through the same connector).

use std::collections::{HashMap, VecDeque};
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use async_trait::async_trait;
use mc_bridge_core::protocol::{decode_packet, encode_packet, packet_type, FrameError, Packet};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use super::Connector;

/// What the mock server has observed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockStats {
    /// Streams successfully opened.
    pub connections: usize,
    /// Login packets received, accepted or not.
    pub logins: usize,
    /// Commands received and answered (failed writes are not included).
    pub commands: Vec<String>,
    /// Largest number of requests ever awaiting their reply at once.
    pub max_in_flight: usize,
    /// Requests that arrived while another request was still unanswered.
    pub overlaps: usize,
}

#[derive(Default)]
struct MockState {
    password: String,
    refuse_connections: usize,
    failing_writes: Vec<usize>,
    scripted_replies: HashMap<usize, Packet>,
    ignore_commands: bool,
    ignore_logins: bool,

    commands_seen: usize,
    in_flight: usize,
    stats: MockStats,
}

/// [`Connector`] that opens in-memory streams to a scripted server.
#[derive(Clone)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    /// Creates a server that accepts `password`.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                password: password.into(),
                ..MockState::default()
            })),
        }
    }

    /// Refuses the next `count` connection attempts.
    pub fn refuse_connections(self, count: usize) -> Self {
        self.lock().refuse_connections = count;
        self
    }

    /// Fails the write of the `nth` command with a broken pipe.  The stream
    /// stays broken afterwards, like a socket whose peer has gone away.
    pub fn fail_command_write(self, nth: usize) -> Self {
        self.lock().failing_writes.push(nth);
        self
    }

    /// Answers the `nth` command with `reply` instead of the default ack.
    pub fn reply_to_command(self, nth: usize, reply: Packet) -> Self {
        self.lock().scripted_replies.insert(nth, reply);
        self
    }

    /// Keeps answering logins but never answers a command.
    pub fn ignore_commands(self) -> Self {
        self.lock().ignore_commands = true;
        self
    }

    /// Accepts connections but never answers a login.
    pub fn ignore_logins(self) -> Self {
        self.lock().ignore_logins = true;
        self
    }

    /// Snapshot of everything observed so far.
    pub fn stats(&self) -> MockStats {
        self.lock().stats.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("lock poisoned")
    }

    fn open_stream(&self) -> io::Result<ScriptedStream> {
        let mut state = self.lock();
        if state.refuse_connections > 0 {
            state.refuse_connections -= 1;
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ));
        }
        state.stats.connections += 1;
        Ok(ScriptedStream {
            server: Arc::clone(&self.state),
            inbound: Vec::new(),
            outbound: VecDeque::new(),
            awaiting_reply: false,
            yielded: false,
            broken: false,
        })
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Stream = ScriptedStream;

    async fn connect(&self, _addr: &str) -> io::Result<ScriptedStream> {
        self.open_stream()
    }
}

/// One client connection to the mock server.
pub struct ScriptedStream {
    server: Arc<Mutex<MockState>>,
    inbound: Vec<u8>,
    outbound: VecDeque<u8>,
    awaiting_reply: bool,
    // Each read yields to the scheduler once so concurrent callers get a
    // chance to interleave if the client failed to serialize them.
    yielded: bool,
    broken: bool,
}

impl ScriptedStream {
    fn handle(&mut self, request: Packet) -> io::Result<()> {
        let mut state = self.server.lock().expect("lock poisoned");

        let reply = match request.packet_type {
            packet_type::LOGIN => {
                state.stats.logins += 1;
                if state.ignore_logins {
                    None
                } else {
                    let id = if request.payload == state.password.as_bytes() {
                        request.request_id
                    } else {
                        u32::MAX
                    };
                    Some(Packet::new(id, packet_type::LOGIN_ACK, Vec::new()))
                }
            }
            packet_type::COMMAND => {
                state.commands_seen += 1;
                let nth = state.commands_seen;
                if state.failing_writes.contains(&nth) {
                    self.broken = true;
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "scripted write failure"));
                }
                let text = request.payload_text();
                state.stats.commands.push(text.clone());
                if state.ignore_commands {
                    None
                } else {
                    Some(state.scripted_replies.remove(&nth).unwrap_or_else(|| {
                        Packet::new(
                            request.request_id,
                            packet_type::COMMAND_ACK,
                            format!("executed: {text}"),
                        )
                    }))
                }
            }
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unexpected packet type {other}"),
                ))
            }
        };

        if state.in_flight > 0 {
            state.stats.overlaps += 1;
        }
        state.in_flight += 1;
        state.stats.max_in_flight = state.stats.max_in_flight.max(state.in_flight);
        self.awaiting_reply = true;

        if let Some(reply) = reply {
            let bytes = encode_packet(&reply).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            self.outbound.extend(bytes);
        }
        Ok(())
    }

    fn finish_reply(&mut self) {
        if self.awaiting_reply {
            self.awaiting_reply = false;
            if let Ok(mut state) = self.server.lock() {
                state.in_flight = state.in_flight.saturating_sub(1);
            }
        }
    }
}

impl AsyncWrite for ScriptedStream {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if this.broken {
            return Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()));
        }
        this.inbound.extend_from_slice(buf);

        loop {
            match decode_packet(&this.inbound) {
                Ok((request, used)) => {
                    this.inbound.drain(..used);
                    if let Err(e) = this.handle(request) {
                        return Poll::Ready(Err(e));
                    }
                }
                Err(FrameError::Truncated { .. }) => break,
                Err(e) => return Poll::Ready(Err(io::Error::new(io::ErrorKind::InvalidData, e))),
            }
        }
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl AsyncRead for ScriptedStream {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if this.broken {
            return Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()));
        }
        if this.outbound.is_empty() {
            // Nothing queued: an ignored request.  Only a deadline gets the
            // caller out of here.
            return Poll::Pending;
        }
        if !this.yielded {
            this.yielded = true;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        this.yielded = false;

        let n = buf.remaining().min(this.outbound.len());
        let chunk: Vec<u8> = this.outbound.drain(..n).collect();
        buf.put_slice(&chunk);
        if this.outbound.is_empty() {
            this.finish_reply();
        }
        Poll::Ready(Ok(()))
    }
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.finish_reply();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
