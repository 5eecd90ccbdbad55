//! # Sample Types
//!
//! Raw register values, the gyroscope bias and converted physical samples.

use serde::Serialize;

/// One measurement burst as read from the sensor registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample {
    pub accel_x: i16,
    pub accel_y: i16,
    pub accel_z: i16,
    pub temp: i16,
    pub gyro_x: i16,
    pub gyro_y: i16,
    pub gyro_z: i16,
}

impl RawSample {
    /// Decode a 14-byte burst of big-endian register pairs.
    ///
    /// Register order: ACCEL_X, ACCEL_Y, ACCEL_Z, TEMP, GYRO_X, GYRO_Y, GYRO_Z.
    ///
    /// # Examples
    ///
    /// ```
    /// use motion_remote::sensor::sample::RawSample;
    ///
    /// let mut burst = [0u8; 14];
    /// burst[0] = 0x40; // accel X = 0x4000 = 16384
    /// let raw = RawSample::from_be_bytes(&burst);
    /// assert_eq!(raw.accel_x, 16384);
    /// ```
    #[must_use]
    pub fn from_be_bytes(burst: &[u8; 14]) -> Self {
        let word = |i: usize| i16::from_be_bytes([burst[i], burst[i + 1]]);
        Self {
            accel_x: word(0),
            accel_y: word(2),
            accel_z: word(4),
            temp: word(6),
            gyro_x: word(8),
            gyro_y: word(10),
            gyro_z: word(12),
        }
    }

    /// Die temperature in degrees Celsius (datasheet formula).
    #[must_use]
    pub fn temperature_celsius(&self) -> f32 {
        self.temp as f32 / 340.0 + 36.53
    }
}

/// Static gyroscope offset per axis, in raw counts
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GyroBias {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Sample in physical units: g for acceleration, deg/s for rotation rate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PhysicalSample {
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
    pub gx: f32,
    pub gy: f32,
    pub gz: f32,
}
