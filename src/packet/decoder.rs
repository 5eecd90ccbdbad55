//! # Packet Decoder
//!
//! Reads packets back into samples on the receiving side.

use bytes::Buf;

use super::layout::{Field, PacketLayout};
use crate::error::{MotionRemoteError, Result};
use crate::input::InputState;
use crate::sensor::sample::PhysicalSample;

/// Fields recovered from a packet
///
/// Fields the layout does not carry are left at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecodedPacket {
    pub sample: PhysicalSample,
    pub input: InputState,
}

/// Decode a packet
///
/// # Arguments
///
/// * `layout` - Field order and widths used by the sender
/// * `data` - Received payload
///
/// # Returns
///
/// * `Result<DecodedPacket>` - Decoded fields, or error if the size is wrong
///
/// # Errors
///
/// Returns `Packet` if `data` is not exactly `layout.size()` bytes.
pub fn decode_packet(layout: &PacketLayout, data: &[u8]) -> Result<DecodedPacket> {
    if data.len() != layout.size() {
        return Err(MotionRemoteError::Packet(format!(
            "Expected {} bytes for layout '{}', got {}",
            layout.size(),
            layout.name(),
            data.len()
        )));
    }

    let mut buf = data;
    let mut decoded = DecodedPacket::default();

    for &field in layout.fields() {
        match field {
            Field::Ax => decoded.sample.ax = buf.get_f32_le(),
            Field::Ay => decoded.sample.ay = buf.get_f32_le(),
            Field::Az => decoded.sample.az = buf.get_f32_le(),
            Field::Gx => decoded.sample.gx = buf.get_f32_le(),
            Field::Gy => decoded.sample.gy = buf.get_f32_le(),
            Field::Gz => decoded.sample.gz = buf.get_f32_le(),
            Field::Buttons => decoded.input.buttons = buf.get_u8(),
            Field::JoystickX => decoded.input.joystick[0] = buf.get_f32_le(),
            Field::JoystickY => decoded.input.joystick[1] = buf.get_f32_le(),
        }
    }

    Ok(decoded)
}
