//! # Sample Conversion
//!
//! Converts raw register counts to physical units.
//!
//! - Acceleration: `raw / lsb_per_g` (16384 at ±2 g)
//! - Rotation rate: `(raw - bias) / lsb_per_dps` (131 at ±250 deg/s)
//!
//! Rotation rates whose magnitude is below the deadzone are reported as exactly
//! `0.0`, which keeps a resting controller from drifting the cursor on the PC.
//!
//! ## Usage
//!
//! ```
//! use motion_remote::sensor::convert::SampleConverter;
//! use motion_remote::sensor::sample::{GyroBias, RawSample};
//!
//! let converter = SampleConverter::default();
//! let raw = RawSample { accel_x: 16384, gyro_x: 131, gyro_y: 20, ..Default::default() };
//! let sample = converter.convert(&raw, &GyroBias::default());
//!
//! assert_eq!(sample.ax, 1.0);
//! assert_eq!(sample.gx, 1.0);
//! assert_eq!(sample.gy, 0.0); // 20 / 131 ≈ 0.15 deg/s, inside the deadzone
//! ```

use super::registers::{AccelRange, GyroRange};
use super::sample::{GyroBias, PhysicalSample, RawSample};

/// Default gyroscope deadzone in deg/s
pub const DEFAULT_GYRO_DEADZONE: f32 = 0.2;

/// Raw-to-physical converter for one sensor configuration
#[derive(Debug, Clone, Copy)]
pub struct SampleConverter {
    accel_lsb: f32,
    gyro_lsb: f32,
    deadzone: f32,
}

impl Default for SampleConverter {
    fn default() -> Self {
        Self::new(AccelRange::default(), GyroRange::default(), DEFAULT_GYRO_DEADZONE)
    }
}

impl SampleConverter {
    /// Creates a converter for the given full-scale ranges and deadzone.
    ///
    /// Negative deadzones are treated as zero.
    #[must_use]
    pub fn new(accel_range: AccelRange, gyro_range: GyroRange, deadzone: f32) -> Self {
        Self {
            accel_lsb: accel_range.lsb_per_g(),
            gyro_lsb: gyro_range.lsb_per_dps(),
            deadzone: deadzone.max(0.0),
        }
    }

    /// Returns the configured deadzone in deg/s.
    #[must_use]
    pub fn deadzone(&self) -> f32 {
        self.deadzone
    }

    /// Converts a raw sample using the calibrated gyroscope bias.
    #[must_use]
    pub fn convert(&self, raw: &RawSample, bias: &GyroBias) -> PhysicalSample {
        PhysicalSample {
            ax: self.accel(raw.accel_x),
            ay: self.accel(raw.accel_y),
            az: self.accel(raw.accel_z),
            gx: self.gyro(raw.gyro_x, bias.x),
            gy: self.gyro(raw.gyro_y, bias.y),
            gz: self.gyro(raw.gyro_z, bias.z),
        }
    }

    #[inline]
    fn accel(&self, raw: i16) -> f32 {
        raw as f32 / self.accel_lsb
    }

    #[inline]
    fn gyro(&self, raw: i16, bias: f32) -> f32 {
        let rate = (raw as f32 - bias) / self.gyro_lsb;
        if rate.abs() < self.deadzone {
            0.0
        } else {
            rate
        }
    }
}
