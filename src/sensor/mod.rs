//! # Sensor Module
//!
//! MPU-6050 acquisition over the two-wire bus.
//!
//! This module handles:
//! - Waking the sensor and programming its full-scale ranges
//! - 14-byte measurement bursts and 6-byte gyroscope-only bursts
//! - Gyroscope bias calibration at startup
//! - Conversion of raw counts to g and deg/s with a gyroscope deadzone

pub mod bus;
pub mod calibration;
pub mod convert;
pub mod registers;
pub mod sample;

use tracing::{debug, info};

use crate::error::{MotionRemoteError, Result};
use bus::RegisterBus;
use registers::{
    AccelRange, GyroRange, ACCEL_CONFIG, ACCEL_XOUT_H, GYRO_BURST_LEN, GYRO_CONFIG, GYRO_XOUT_H,
    MEASUREMENT_BURST_LEN, PWR_MGMT_1,
};
use sample::RawSample;

/// MPU-6050 driver on top of a [`RegisterBus`]
#[derive(Debug)]
pub struct ImuSensor<B> {
    bus: B,
    address: u8,
    accel_range: AccelRange,
    gyro_range: GyroRange,
}

impl<B: RegisterBus> ImuSensor<B> {
    /// Creates a driver for the sensor at `address`.
    ///
    /// No bus traffic happens until [`ImuSensor::init`] is called.
    pub fn new(bus: B, address: u8, accel_range: AccelRange, gyro_range: GyroRange) -> Self {
        Self {
            bus,
            address,
            accel_range,
            gyro_range,
        }
    }

    /// Wakes the sensor and programs the full-scale ranges.
    ///
    /// # Errors
    ///
    /// Returns `BusWrite` if any register write fails.
    pub fn init(&mut self) -> Result<()> {
        self.bus.write_register(self.address, PWR_MGMT_1, 0)?;
        self.bus
            .write_register(self.address, GYRO_CONFIG, self.gyro_range.register_bits())?;
        self.bus
            .write_register(self.address, ACCEL_CONFIG, self.accel_range.register_bits())?;

        info!(
            "MPU-6050 at 0x{:02X} awake ({:?}, {:?})",
            self.address, self.accel_range, self.gyro_range
        );
        Ok(())
    }

    /// Reads accelerometer, temperature and gyroscope in one burst.
    ///
    /// # Errors
    ///
    /// Returns `BusRead` if the transaction fails or returns fewer than 14 bytes.
    pub fn read_raw_sample(&mut self) -> Result<RawSample> {
        let bytes = self.read_exact(ACCEL_XOUT_H, MEASUREMENT_BURST_LEN)?;
        let mut burst = [0u8; MEASUREMENT_BURST_LEN];
        burst.copy_from_slice(&bytes);
        Ok(RawSample::from_be_bytes(&burst))
    }

    /// Reads only the three gyroscope channels.
    ///
    /// # Errors
    ///
    /// Returns `BusRead` if the transaction fails or returns fewer than 6 bytes.
    pub fn read_raw_gyro(&mut self) -> Result<[i16; 3]> {
        let bytes = self.read_exact(GYRO_XOUT_H, GYRO_BURST_LEN)?;
        Ok([
            i16::from_be_bytes([bytes[0], bytes[1]]),
            i16::from_be_bytes([bytes[2], bytes[3]]),
            i16::from_be_bytes([bytes[4], bytes[5]]),
        ])
    }

    pub fn accel_range(&self) -> AccelRange {
        self.accel_range
    }

    pub fn gyro_range(&self) -> GyroRange {
        self.gyro_range
    }

    fn read_exact(&mut self, start_reg: u8, count: usize) -> Result<Vec<u8>> {
        let bytes = self.bus.read_burst(self.address, start_reg, count)?;
        if bytes.len() != count {
            debug!(
                "Short burst from 0x{:02X}: {} of {} bytes",
                start_reg,
                bytes.len(),
                count
            );
            return Err(MotionRemoteError::BusRead(format!(
                "Incomplete burst read from 0x{:02X}: expected {} bytes, got {}",
                start_reg,
                count,
                bytes.len()
            )));
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::bus::MockRegisterBus;
    use super::registers::MPU6050_ADDRESS;
    use super::*;
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn sensor(bus: MockRegisterBus) -> ImuSensor<MockRegisterBus> {
        ImuSensor::new(bus, MPU6050_ADDRESS, AccelRange::G2, GyroRange::Dps250)
    }

    #[test]
    fn test_init_wakes_then_sets_ranges() {
        let mut bus = MockRegisterBus::new();
        let mut seq = Sequence::new();
        bus.expect_write_register()
            .with(eq(MPU6050_ADDRESS), eq(PWR_MGMT_1), eq(0))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        bus.expect_write_register()
            .with(eq(MPU6050_ADDRESS), eq(GYRO_CONFIG), eq(0x08))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        bus.expect_write_register()
            .with(eq(MPU6050_ADDRESS), eq(ACCEL_CONFIG), eq(0x18))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));

        let mut imu = ImuSensor::new(bus, MPU6050_ADDRESS, AccelRange::G16, GyroRange::Dps500);
        assert!(imu.init().is_ok());
    }

    #[test]
    fn test_init_propagates_write_failure() {
        let mut bus = MockRegisterBus::new();
        bus.expect_write_register()
            .returning(|_, _, _| Err(MotionRemoteError::BusWrite("nack".to_string())));

        let mut imu = sensor(bus);
        assert!(matches!(imu.init(), Err(MotionRemoteError::BusWrite(_))));
    }

    #[test]
    fn test_read_raw_sample() {
        let mut bus = MockRegisterBus::new();
        bus.expect_read_burst()
            .with(eq(MPU6050_ADDRESS), eq(ACCEL_XOUT_H), eq(14))
            .returning(|_, _, _| {
                Ok(vec![
                    0x40, 0x00, 0x00, 0x00, 0xC0, 0x00, // accel: 16384, 0, -16384
                    0x00, 0x00, // temp
                    0x00, 0x83, 0xFF, 0x7D, 0x00, 0x00, // gyro: 131, -131, 0
                ])
            });

        let raw = sensor(bus).read_raw_sample().unwrap();
        assert_eq!(raw.accel_x, 16384);
        assert_eq!(raw.accel_z, -16384);
        assert_eq!(raw.gyro_x, 131);
        assert_eq!(raw.gyro_y, -131);
    }

    #[test]
    fn test_short_burst_is_bus_read_fault() {
        let mut bus = MockRegisterBus::new();
        bus.expect_read_burst().returning(|_, _, _| Ok(vec![0u8; 9]));

        match sensor(bus).read_raw_sample() {
            Err(MotionRemoteError::BusRead(msg)) => {
                assert!(msg.contains("expected 14 bytes, got 9"));
            }
            other => panic!("Expected BusRead error, got: {:?}", other),
        }
    }

    #[test]
    fn test_read_raw_gyro_uses_gyro_registers() {
        let mut bus = MockRegisterBus::new();
        bus.expect_read_burst()
            .with(eq(MPU6050_ADDRESS), eq(GYRO_XOUT_H), eq(6))
            .returning(|_, _, _| Ok(vec![0x00, 0x0A, 0xFF, 0xF6, 0x01, 0x00]));

        assert_eq!(sensor(bus).read_raw_gyro().unwrap(), [10, -10, 256]);
    }

    #[test]
    fn test_short_gyro_burst_is_bus_read_fault() {
        let mut bus = MockRegisterBus::new();
        bus.expect_read_burst().returning(|_, _, _| Ok(vec![]));

        assert!(matches!(
            sensor(bus).read_raw_gyro(),
            Err(MotionRemoteError::BusRead(_))
        ));
    }
}
