//! Integration tests for the mc-bridge-core packet codec.
//!
//! These tests exercise encoding and decoding through the public API only,
//! the same way the RCON client uses it.

use mc_bridge_core::protocol::{
    decode_packet, encode_packet, frame_body_len, packet_type, FrameError, Packet,
    MIN_FRAME_BODY_LEN,
};

/// Encodes a packet and decodes it again, asserting that every byte was used.
fn roundtrip(packet: &Packet) -> Packet {
    let bytes = encode_packet(packet).expect("encode must succeed");
    let (decoded, consumed) = decode_packet(&bytes).expect("decode must succeed");
    assert_eq!(consumed, bytes.len(), "all bytes must be consumed");
    decoded
}

#[test]
fn test_roundtrip_preserves_packets_across_payload_sizes() {
    for len in [0usize, 1, 2, 9, 10, 11, 255, 1446, 4096] {
        let original = Packet::new(len as u32, packet_type::COMMAND_ACK, vec![b'z'; len]);
        assert_eq!(roundtrip(&original), original, "payload length {len}");
    }
}

#[test]
fn test_roundtrip_preserves_unknown_type_and_high_request_id() {
    // Vanilla servers answer a failed login with request id -1.
    let original = Packet::new(u32::MAX, 0xDEAD_BEEF, b"auth failed".to_vec());
    assert_eq!(roundtrip(&original), original);
}

#[test]
fn test_roundtrip_binary_payload_with_embedded_nulls() {
    let original = Packet::new(1, packet_type::COMMAND, vec![0, 1, 0, 255, 0]);
    assert_eq!(roundtrip(&original), original);
}

#[test]
fn test_length_field_matches_body_size() {
    // Arrange
    let packet = Packet::command("tellraw @a {\"text\":\"<Alice> hi\"}");

    // Act
    let bytes = encode_packet(&packet).unwrap();
    let length = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);

    // Assert
    assert_eq!(length, MIN_FRAME_BODY_LEN + packet.payload.len() as u32);
    assert_eq!(frame_body_len(length).unwrap(), bytes.len() - 4);
}

#[test]
fn test_every_truncation_of_a_frame_is_rejected() {
    let bytes = encode_packet(&Packet::command("list")).unwrap();
    for cut in 0..bytes.len() {
        assert!(
            matches!(decode_packet(&bytes[..cut]), Err(FrameError::Truncated { .. })),
            "prefix of {cut} bytes must be rejected"
        );
    }
}

#[test]
fn test_malformed_length_is_rejected() {
    let mut bytes = encode_packet(&Packet::command("list")).unwrap();
    bytes[..4].copy_from_slice(&3u32.to_le_bytes());
    assert_eq!(decode_packet(&bytes), Err(FrameError::TooShort(3)));
}
