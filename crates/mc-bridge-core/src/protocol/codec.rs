//! Binary codec for encoding and decoding RCON packets.
//!
//! Wire format:
//! ```text
//! [length:4][request_id:4][type:4][payload:N][padding:2]
//! ```
//! All integers are little-endian.  `length` counts everything after itself,
//! i.e. `length = 4 + 4 + N + 2`.  The two padding bytes are always `0x00`.

use thiserror::Error;

use crate::protocol::packet::{Packet, LENGTH_PREFIX_SIZE, MAX_FRAME_BODY_LEN, MIN_FRAME_BODY_LEN};

/// Errors that can occur during packet encoding or decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The byte slice is shorter than the frame it claims to contain.
    #[error("insufficient data: need {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },

    /// The `length` field is smaller than the fixed part of a frame.
    #[error("frame length {0} is below the minimum of {min}", min = MIN_FRAME_BODY_LEN)]
    TooShort(u32),

    /// The `length` field (or the payload being encoded) exceeds the limit.
    #[error("frame length {0} exceeds the maximum of {max}", max = MAX_FRAME_BODY_LEN)]
    TooLong(u64),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a [`Packet`] into a complete frame including the length prefix and
/// the trailing null padding.
///
/// `length` is always recomputed from the payload.
///
/// # Errors
///
/// Returns [`FrameError::TooLong`] if the payload does not fit in a frame.
///
/// # Examples
///
/// ```rust
/// use mc_bridge_core::protocol::{decode_packet, encode_packet, Packet};
///
/// let packet = Packet::command("list");
/// let bytes = encode_packet(&packet).unwrap();
/// let (decoded, consumed) = decode_packet(&bytes).unwrap();
/// assert_eq!(decoded, packet);
/// assert_eq!(consumed, bytes.len());
/// ```
pub fn encode_packet(packet: &Packet) -> Result<Vec<u8>, FrameError> {
    let body_len = MIN_FRAME_BODY_LEN as u64 + packet.payload.len() as u64;
    if body_len > MAX_FRAME_BODY_LEN as u64 {
        return Err(FrameError::TooLong(body_len));
    }
    let length = body_len as u32;

    let mut buf = Vec::with_capacity(packet.encoded_len());
    buf.extend_from_slice(&length.to_le_bytes());
    buf.extend_from_slice(&packet.request_id.to_le_bytes());
    buf.extend_from_slice(&packet.packet_type.to_le_bytes());
    buf.extend_from_slice(&packet.payload);
    buf.extend_from_slice(&[0x00, 0x00]);
    Ok(buf)
}

/// Decodes one [`Packet`] from the beginning of `bytes`.
///
/// Returns the decoded packet and the total number of bytes consumed
/// (length prefix + body), so the caller can advance its read cursor.
/// The padding bytes are consumed but not checked.
///
/// # Errors
///
/// Returns [`FrameError`] if the frame is truncated or its length field is
/// out of range.
pub fn decode_packet(bytes: &[u8]) -> Result<(Packet, usize), FrameError> {
    let length = read_u32(bytes, 0)?;
    let body_len = frame_body_len(length)?;

    let total = LENGTH_PREFIX_SIZE + body_len;
    if bytes.len() < total {
        return Err(FrameError::Truncated {
            needed: total,
            available: bytes.len(),
        });
    }

    let request_id = read_u32(bytes, 4)?;
    let packet_type = read_u32(bytes, 8)?;

    let payload_start = LENGTH_PREFIX_SIZE + 8;
    let payload_end = payload_start + (body_len - MIN_FRAME_BODY_LEN as usize);
    let payload = bytes[payload_start..payload_end].to_vec();

    // bytes[payload_end..total] is the two-byte padding – ignored on decode

    Ok((
        Packet {
            request_id,
            packet_type,
            payload,
        },
        total,
    ))
}

/// Validates a decoded `length` prefix and returns the number of body bytes
/// that follow it.
///
/// Stream readers call this after reading the 4-byte prefix so they can size
/// the body buffer before reading it.
///
/// # Errors
///
/// Returns [`FrameError::TooShort`] or [`FrameError::TooLong`].
pub fn frame_body_len(length: u32) -> Result<usize, FrameError> {
    if length < MIN_FRAME_BODY_LEN {
        return Err(FrameError::TooShort(length));
    }
    if length > MAX_FRAME_BODY_LEN {
        return Err(FrameError::TooLong(u64::from(length)));
    }
    Ok(length as usize)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn read_u32(buf: &[u8], offset: usize) -> Result<u32, FrameError> {
    let bytes = buf
        .get(offset..offset + 4)
        .ok_or(FrameError::Truncated {
            needed: offset + 4,
            available: buf.len(),
        })?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::packet::packet_type;

    #[test]
    fn test_encode_login_matches_known_bytes() {
        // Arrange
        let packet = Packet::login("pw");

        // Act
        let bytes = encode_packet(&packet).unwrap();

        // Assert – length 12, id 1, type 3, "pw", two nulls
        assert_eq!(
            bytes,
            vec![
                12, 0, 0, 0, //
                1, 0, 0, 0, //
                3, 0, 0, 0, //
                b'p', b'w', //
                0, 0,
            ]
        );
    }

    #[test]
    fn test_encode_length_field_is_ten_plus_payload() {
        let packet = Packet::command(&"x".repeat(300));
        let bytes = encode_packet(&packet).unwrap();
        let length = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(length, 310);
        assert_eq!(bytes.len(), 314);
    }

    #[test]
    fn test_encode_always_appends_two_null_bytes() {
        let bytes = encode_packet(&Packet::command("say hi")).unwrap();
        assert_eq!(&bytes[bytes.len() - 2..], &[0, 0]);
    }

    #[test]
    fn test_decode_empty_payload() {
        let raw = [10, 0, 0, 0, 7, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let (packet, consumed) = decode_packet(&raw).unwrap();
        assert_eq!(packet, Packet::new(7, packet_type::COMMAND_ACK, Vec::new()));
        assert_eq!(consumed, 14);
    }

    #[test]
    fn test_decode_ignores_padding_contents() {
        // Padding is discarded, not validated.
        let raw = [11, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, b'k', 0xAA, 0xBB];
        let (packet, _) = decode_packet(&raw).unwrap();
        assert_eq!(packet.payload, b"k");
    }

    #[test]
    fn test_decode_reports_consumed_bytes_with_trailing_data() {
        // Arrange: two frames back to back
        let mut raw = encode_packet(&Packet::command("a")).unwrap();
        let first_len = raw.len();
        raw.extend(encode_packet(&Packet::command("bb")).unwrap());

        // Act
        let (first, consumed) = decode_packet(&raw).unwrap();
        let (second, _) = decode_packet(&raw[consumed..]).unwrap();

        // Assert
        assert_eq!(consumed, first_len);
        assert_eq!(first.payload, b"a");
        assert_eq!(second.payload, b"bb");
    }

    #[test]
    fn test_decode_length_below_minimum_is_rejected() {
        let raw = [9, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(decode_packet(&raw), Err(FrameError::TooShort(9)));
    }

    #[test]
    fn test_decode_zero_length_is_rejected_not_underflowed() {
        let raw = [0, 0, 0, 0];
        assert_eq!(decode_packet(&raw), Err(FrameError::TooShort(0)));
    }

    #[test]
    fn test_decode_oversized_length_is_rejected() {
        let raw = 0xFFFF_FFFFu32.to_le_bytes();
        assert_eq!(
            decode_packet(&raw),
            Err(FrameError::TooLong(u64::from(u32::MAX)))
        );
    }

    #[test]
    fn test_decode_missing_length_prefix() {
        assert_eq!(
            decode_packet(&[1, 0]),
            Err(FrameError::Truncated {
                needed: 4,
                available: 2
            })
        );
    }

    #[test]
    fn test_decode_truncated_body() {
        let bytes = encode_packet(&Packet::command("truncate me")).unwrap();
        let cut = &bytes[..bytes.len() - 3];
        assert_eq!(
            decode_packet(cut),
            Err(FrameError::Truncated {
                needed: bytes.len(),
                available: bytes.len() - 3
            })
        );
    }

    #[test]
    fn test_frame_body_len_accepts_bounds() {
        assert_eq!(frame_body_len(MIN_FRAME_BODY_LEN), Ok(10));
        assert_eq!(
            frame_body_len(MAX_FRAME_BODY_LEN),
            Ok(MAX_FRAME_BODY_LEN as usize)
        );
    }

    #[test]
    fn test_encode_rejects_payload_over_limit() {
        let packet = Packet::new(1, packet_type::COMMAND, vec![0u8; MAX_FRAME_BODY_LEN as usize]);
        assert_eq!(
            encode_packet(&packet),
            Err(FrameError::TooLong(u64::from(MAX_FRAME_BODY_LEN) + 10))
        );
    }
}
