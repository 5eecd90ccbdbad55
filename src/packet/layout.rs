//! # Packet Layouts
//!
//! A layout is an ordered list of fields. The PC-side receiver must use the
//! same list: there is no header, so reordering or resizing a field silently
//! shifts every field after it.
//!
//! ## Presets
//!
//! | Preset | Fields | Bytes |
//! |--------|--------|-------|
//! | `imu` | ax ay az gx gy gz | 24 |
//! | `imu_buttons` | imu + buttons | 25 |
//! | `imu_buttons_joystick` | imu + buttons + joystick_x | 29 |
//! | `imu_buttons_dual_joystick` | imu + buttons + joystick_x + joystick_y | 33 |

use serde::{Deserialize, Serialize};

use crate::error::{MotionRemoteError, Result};

/// Encoding of a single field on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// IEEE-754 single precision, little-endian
    F32Le,
    /// Unsigned byte
    U8,
}

impl FieldKind {
    /// Width on the wire in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            FieldKind::F32Le => 4,
            FieldKind::U8 => 1,
        }
    }
}

/// A value that can be placed in a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Ax,
    Ay,
    Az,
    Gx,
    Gy,
    Gz,
    Buttons,
    JoystickX,
    JoystickY,
}

impl Field {
    /// Wire encoding of this field.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Field::Buttons => FieldKind::U8,
            _ => FieldKind::F32Le,
        }
    }

    /// Width on the wire in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        self.kind().width()
    }

    /// Name used in configuration files and receiver records.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Field::Ax => "ax",
            Field::Ay => "ay",
            Field::Az => "az",
            Field::Gx => "gx",
            Field::Gy => "gy",
            Field::Gz => "gz",
            Field::Buttons => "buttons",
            Field::JoystickX => "joystick_x",
            Field::JoystickY => "joystick_y",
        }
    }
}

/// The six motion fields shared by every preset
const MOTION_FIELDS: [Field; 6] = [
    Field::Ax,
    Field::Ay,
    Field::Az,
    Field::Gx,
    Field::Gy,
    Field::Gz,
];

/// Names accepted by [`PacketLayout::preset`]
pub const PRESET_NAMES: &[&str] = &[
    "imu",
    "imu_buttons",
    "imu_buttons_joystick",
    "imu_buttons_dual_joystick",
];

/// Ordered field list with a fixed byte size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketLayout {
    name: String,
    fields: Vec<Field>,
}

impl PacketLayout {
    /// Accelerometer and gyroscope only (24 bytes).
    #[must_use]
    pub fn imu() -> Self {
        Self::from_parts("imu", &[])
    }

    /// Motion plus button mask (25 bytes).
    #[must_use]
    pub fn imu_buttons() -> Self {
        Self::from_parts("imu_buttons", &[Field::Buttons])
    }

    /// Motion, button mask and one joystick axis (29 bytes).
    #[must_use]
    pub fn imu_buttons_joystick() -> Self {
        Self::from_parts("imu_buttons_joystick", &[Field::Buttons, Field::JoystickX])
    }

    /// Motion, button mask and two joystick axes (33 bytes).
    #[must_use]
    pub fn imu_buttons_dual_joystick() -> Self {
        Self::from_parts(
            "imu_buttons_dual_joystick",
            &[Field::Buttons, Field::JoystickX, Field::JoystickY],
        )
    }

    /// Looks up a preset by name.
    ///
    /// # Examples
    ///
    /// ```
    /// use motion_remote::packet::layout::PacketLayout;
    ///
    /// assert_eq!(PacketLayout::preset("imu_buttons_joystick").unwrap().size(), 29);
    /// assert!(PacketLayout::preset("unknown").is_none());
    /// ```
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "imu" => Some(Self::imu()),
            "imu_buttons" => Some(Self::imu_buttons()),
            "imu_buttons_joystick" => Some(Self::imu_buttons_joystick()),
            "imu_buttons_dual_joystick" => Some(Self::imu_buttons_dual_joystick()),
            _ => None,
        }
    }

    /// Builds a layout from an explicit field list.
    ///
    /// # Errors
    ///
    /// Returns `Packet` if the list is empty or names a field twice.
    pub fn custom(fields: Vec<Field>) -> Result<Self> {
        if fields.is_empty() {
            return Err(MotionRemoteError::Packet(
                "custom layout needs at least one field".to_string(),
            ));
        }
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].contains(field) {
                return Err(MotionRemoteError::Packet(format!(
                    "field '{}' appears more than once",
                    field.name()
                )));
            }
        }
        Ok(Self {
            name: "custom".to_string(),
            fields,
        })
    }

    fn from_parts(name: &str, extra: &[Field]) -> Self {
        let mut fields = MOTION_FIELDS.to_vec();
        fields.extend_from_slice(extra);
        Self {
            name: name.to_string(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Total packet size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.fields.iter().map(|f| f.width()).sum()
    }

    /// Byte offset of `field`, if the layout contains it.
    #[must_use]
    pub fn offset_of(&self, field: Field) -> Option<usize> {
        let mut offset = 0;
        for &f in &self.fields {
            if f == field {
                return Some(offset);
            }
            offset += f.width();
        }
        None
    }

    /// Whether the layout carries `field`.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }
}
