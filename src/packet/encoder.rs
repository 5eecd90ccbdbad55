//! # Packet Encoder
//!
//! Serializes a physical sample and input state into the fixed layout.

use bytes::{BufMut, Bytes, BytesMut};

use super::layout::{Field, PacketLayout};
use crate::input::InputState;
use crate::sensor::sample::PhysicalSample;

/// Value of a single field prior to encoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    F32(f32),
    U8(u8),
}

/// Extracts the value `field` takes for this sample and input state.
#[must_use]
pub fn field_value(field: Field, sample: &PhysicalSample, input: &InputState) -> FieldValue {
    match field {
        Field::Ax => FieldValue::F32(sample.ax),
        Field::Ay => FieldValue::F32(sample.ay),
        Field::Az => FieldValue::F32(sample.az),
        Field::Gx => FieldValue::F32(sample.gx),
        Field::Gy => FieldValue::F32(sample.gy),
        Field::Gz => FieldValue::F32(sample.gz),
        Field::Buttons => FieldValue::U8(input.buttons),
        Field::JoystickX => FieldValue::F32(input.joystick[0]),
        Field::JoystickY => FieldValue::F32(input.joystick[1]),
    }
}

/// Encode a sample and input state into a packet
///
/// # Arguments
///
/// * `layout` - Field order and widths shared with the receiver
/// * `sample` - Converted motion sample
/// * `input` - Button mask and joystick axes
///
/// # Returns
///
/// * `Bytes` - Exactly `layout.size()` bytes
///
/// # Examples
///
/// ```
/// use motion_remote::input::InputState;
/// use motion_remote::packet::encoder::encode_packet;
/// use motion_remote::packet::layout::PacketLayout;
/// use motion_remote::sensor::sample::PhysicalSample;
///
/// let layout = PacketLayout::imu_buttons_joystick();
/// let packet = encode_packet(&layout, &PhysicalSample::default(), &InputState::default());
/// assert_eq!(packet.len(), 29);
/// ```
pub fn encode_packet(layout: &PacketLayout, sample: &PhysicalSample, input: &InputState) -> Bytes {
    let mut buf = BytesMut::with_capacity(layout.size());

    for &field in layout.fields() {
        match field_value(field, sample, input) {
            FieldValue::F32(v) => buf.put_f32_le(v),
            FieldValue::U8(v) => buf.put_u8(v),
        }
    }

    buf.freeze()
}
