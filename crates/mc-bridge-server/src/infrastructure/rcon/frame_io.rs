//! Reading and writing whole RCON frames on an async byte stream.
//!
//! TCP is a stream protocol, so a frame is read in two steps: the 4-byte
//! length prefix first, then exactly the number of body bytes it announces.

use mc_bridge_core::protocol::{decode_packet, encode_packet, frame_body_len, Packet, LENGTH_PREFIX_SIZE};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use super::TransportError;

/// Encodes `packet` and writes the complete frame to `writer`.
///
/// # Errors
///
/// Returns [`TransportError`] if encoding or the write fails.
pub async fn write_packet<W>(writer: &mut W, packet: &Packet) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let bytes = encode_packet(packet)?;
    writer.write_all(&bytes).await.map_err(TransportError::from_io)?;
    writer.flush().await.map_err(TransportError::from_io)?;
    trace!(
        request_id = packet.request_id,
        packet_type = packet.packet_type,
        len = bytes.len(),
        "wrote frame"
    );
    Ok(())
}

/// Reads exactly one frame from `reader` and decodes it.
///
/// # Errors
///
/// Returns [`TransportError::Closed`] if the stream ends mid-frame,
/// [`TransportError::Frame`] for a malformed length prefix, and
/// [`TransportError::Io`] for other read failures.
pub async fn read_packet<R>(reader: &mut R) -> Result<Packet, TransportError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    reader.read_exact(&mut prefix).await.map_err(TransportError::from_io)?;
    let body_len = frame_body_len(u32::from_le_bytes(prefix))?;

    let mut frame = vec![0u8; LENGTH_PREFIX_SIZE + body_len];
    frame[..LENGTH_PREFIX_SIZE].copy_from_slice(&prefix);
    reader
        .read_exact(&mut frame[LENGTH_PREFIX_SIZE..])
        .await
        .map_err(TransportError::from_io)?;

    let (packet, _) = decode_packet(&frame)?;
    trace!(
        request_id = packet.request_id,
        packet_type = packet.packet_type,
        len = frame.len(),
        "read frame"
    );
    Ok(packet)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
