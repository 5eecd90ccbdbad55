//! # Gyroscope Calibration
//!
//! Estimates the at-rest gyroscope bias by averaging a run of gyro-only reads
//! taken while the controller lies still.
//!
//! Readings are accumulated as integers and divided once at the end, so a long
//! run does not pick up floating-point drift. A fixed pause between reads keeps
//! the bus within the sensor's sample timing.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use super::bus::RegisterBus;
use super::sample::GyroBias;
use super::ImuSensor;
use crate::error::{MotionRemoteError, Result};

/// Default number of reads averaged into the bias
pub const DEFAULT_CALIBRATION_SAMPLES: u32 = 500;

/// Default pause between calibration reads
pub const DEFAULT_CALIBRATION_DELAY: Duration = Duration::from_millis(2);

/// Gyroscope bias estimator
#[derive(Debug, Clone, Copy)]
pub struct Calibrator {
    samples: u32,
    delay: Duration,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(DEFAULT_CALIBRATION_SAMPLES, DEFAULT_CALIBRATION_DELAY)
    }
}

impl Calibrator {
    #[must_use]
    pub fn new(samples: u32, delay: Duration) -> Self {
        Self { samples, delay }
    }

    /// Number of reads averaged per calibration run.
    #[must_use]
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Averages `samples` gyro-only reads into a [`GyroBias`].
    ///
    /// # Errors
    ///
    /// - `Calibration` if the sample count is zero
    /// - `BusRead` if any read fails; a partial average is never returned
    pub async fn calibrate<B: RegisterBus>(&self, sensor: &mut ImuSensor<B>) -> Result<GyroBias> {
        if self.samples == 0 {
            return Err(MotionRemoteError::Calibration(
                "sample count must be greater than 0".to_string(),
            ));
        }

        info!(
            "Calibrating gyroscope over {} samples, keep the controller still",
            self.samples
        );

        let mut sum = [0i64; 3];
        for i in 0..self.samples {
            if i > 0 {
                sleep(self.delay).await;
            }
            let [x, y, z] = sensor.read_raw_gyro()?;
            sum[0] += i64::from(x);
            sum[1] += i64::from(y);
            sum[2] += i64::from(z);
        }

        let n = f64::from(self.samples);
        let bias = GyroBias {
            x: (sum[0] as f64 / n) as f32,
            y: (sum[1] as f64 / n) as f32,
            z: (sum[2] as f64 / n) as f32,
        };

        debug!("Gyro sums: {:?}", sum);
        info!(
            "Gyro bias: x={:.2} y={:.2} z={:.2}",
            bias.x, bias.y, bias.z
        );
        Ok(bias)
    }
}
