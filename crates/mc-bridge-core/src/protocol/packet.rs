//! RCON packet type and protocol constants.
//!
//! The remote console protocol is strictly half-duplex: the client sends one
//! request, the server answers with one reply carrying the same request id.
//! See <https://wiki.vg/RCON> for the community description of the protocol.

// ── Protocol constants ────────────────────────────────────────────────────────

/// Size of the little-endian `length` prefix in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Bytes counted by the `length` field besides the payload:
/// 4 (request id) + 4 (type) + 2 (null padding).
pub const MIN_FRAME_BODY_LEN: u32 = 4 + 4 + 2;

/// Largest `length` value accepted on decode.
///
/// Vanilla servers never send more than 4096 payload bytes per packet; the
/// limit only stops a corrupt length prefix from triggering a huge allocation.
pub const MAX_FRAME_BODY_LEN: u32 = 1 << 20;

/// Request id used for every request this client sends.
pub const DEFAULT_REQUEST_ID: u32 = 1;

// ── Packet type codes ─────────────────────────────────────────────────────────

/// Packet type codes.
///
/// The value `2` is ambiguous on the wire: a client sends it as `COMMAND`, a
/// server sends it as `LOGIN_ACK`.  The codes are therefore kept as plain
/// `u32` constants rather than an enum.
pub mod packet_type {
    /// Client → server: authenticate with the payload as password.
    pub const LOGIN: u32 = 3;
    /// Server → client: reply to [`LOGIN`].
    pub const LOGIN_ACK: u32 = 2;
    /// Client → server: run the payload as a console command.
    pub const COMMAND: u32 = 2;
    /// Server → client: reply to [`COMMAND`] carrying the command output.
    pub const COMMAND_ACK: u32 = 0;
}

// ── Packet ────────────────────────────────────────────────────────────────────

/// One RCON wire-frame unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Correlates a request with its reply.
    pub request_id: u32,
    /// One of the [`packet_type`] codes (unknown codes are preserved).
    pub packet_type: u32,
    /// Opaque payload: password, command text, or command output.
    pub payload: Vec<u8>,
}

impl Packet {
    /// Creates a packet from its raw parts.
    pub fn new(request_id: u32, packet_type: u32, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            request_id,
            packet_type,
            payload: payload.into(),
        }
    }

    /// Builds the login request sent once per physical connection.
    pub fn login(password: &str) -> Self {
        Self::new(DEFAULT_REQUEST_ID, packet_type::LOGIN, password.as_bytes())
    }

    /// Builds a command request.
    pub fn command(command: &str) -> Self {
        Self::new(DEFAULT_REQUEST_ID, packet_type::COMMAND, command.as_bytes())
    }

    /// Returns the payload as text, replacing invalid UTF-8 sequences.
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    /// Number of bytes this packet occupies on the wire, including the length
    /// prefix.
    pub fn encoded_len(&self) -> usize {
        LENGTH_PREFIX_SIZE + MIN_FRAME_BODY_LEN as usize + self.payload.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
