//! Protocol module containing the RCON packet type and its binary codec.

pub mod codec;
pub mod packet;

pub use codec::{decode_packet, encode_packet, frame_body_len, FrameError};
pub use packet::*;
