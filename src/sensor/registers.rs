//! # MPU-6050 Register Map
//!
//! Register addresses, burst sizes and full-scale range settings for the
//! MPU-6050 inertial sensor.

/// Default I2C address (AD0 pin low)
pub const MPU6050_ADDRESS: u8 = 0x68;

/// Alternate I2C address (AD0 pin high)
pub const MPU6050_ADDRESS_ALT: u8 = 0x69;

/// Gyroscope configuration register (FS_SEL in bits 3-4)
pub const GYRO_CONFIG: u8 = 0x1B;

/// Accelerometer configuration register (AFS_SEL in bits 3-4)
pub const ACCEL_CONFIG: u8 = 0x1C;

/// First register of the measurement block (ACCEL_XOUT_H)
pub const ACCEL_XOUT_H: u8 = 0x3B;

/// First gyroscope output register (GYRO_XOUT_H)
pub const GYRO_XOUT_H: u8 = 0x43;

/// Power management register; writing 0 wakes the sensor
pub const PWR_MGMT_1: u8 = 0x6B;

/// Bytes in a full measurement burst: accel(6) + temp(2) + gyro(6)
pub const MEASUREMENT_BURST_LEN: usize = 14;

/// Bytes in a gyroscope-only burst
pub const GYRO_BURST_LEN: usize = 6;

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccelRange {
    /// ±2 g, 16384 LSB/g
    #[default]
    G2,
    /// ±4 g, 8192 LSB/g
    G4,
    /// ±8 g, 4096 LSB/g
    G8,
    /// ±16 g, 2048 LSB/g
    G16,
}

impl AccelRange {
    /// Looks up a range by its full-scale value in g.
    #[must_use]
    pub fn from_g(g: u8) -> Option<Self> {
        match g {
            2 => Some(Self::G2),
            4 => Some(Self::G4),
            8 => Some(Self::G8),
            16 => Some(Self::G16),
            _ => None,
        }
    }

    /// Raw counts per g.
    #[must_use]
    pub fn lsb_per_g(self) -> f32 {
        match self {
            Self::G2 => 16384.0,
            Self::G4 => 8192.0,
            Self::G8 => 4096.0,
            Self::G16 => 2048.0,
        }
    }

    /// Value written to ACCEL_CONFIG.
    #[must_use]
    pub fn register_bits(self) -> u8 {
        let afs_sel = match self {
            Self::G2 => 0,
            Self::G4 => 1,
            Self::G8 => 2,
            Self::G16 => 3,
        };
        afs_sel << 3
    }
}

/// Gyroscope full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GyroRange {
    /// ±250 deg/s, 131 LSB/(deg/s)
    #[default]
    Dps250,
    /// ±500 deg/s, 65.5 LSB/(deg/s)
    Dps500,
    /// ±1000 deg/s, 32.8 LSB/(deg/s)
    Dps1000,
    /// ±2000 deg/s, 16.4 LSB/(deg/s)
    Dps2000,
}

impl GyroRange {
    /// Looks up a range by its full-scale value in deg/s.
    #[must_use]
    pub fn from_dps(dps: u16) -> Option<Self> {
        match dps {
            250 => Some(Self::Dps250),
            500 => Some(Self::Dps500),
            1000 => Some(Self::Dps1000),
            2000 => Some(Self::Dps2000),
            _ => None,
        }
    }

    /// Raw counts per deg/s.
    #[must_use]
    pub fn lsb_per_dps(self) -> f32 {
        match self {
            Self::Dps250 => 131.0,
            Self::Dps500 => 65.5,
            Self::Dps1000 => 32.8,
            Self::Dps2000 => 16.4,
        }
    }

    /// Value written to GYRO_CONFIG.
    #[must_use]
    pub fn register_bits(self) -> u8 {
        let fs_sel = match self {
            Self::Dps250 => 0,
            Self::Dps500 => 1,
            Self::Dps1000 => 2,
            Self::Dps2000 => 3,
        };
        fs_sel << 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_addresses() {
        assert_eq!(MPU6050_ADDRESS, 0x68);
        assert_eq!(ACCEL_XOUT_H, 0x3B);
        assert_eq!(GYRO_XOUT_H, 0x43);
        assert_eq!(PWR_MGMT_1, 0x6B);
    }

    #[test]
    fn test_gyro_block_follows_accel_and_temp() {
        // accel(3 × 2 bytes) + temp(2 bytes) precede the gyro registers
        assert_eq!(ACCEL_XOUT_H as usize + 8, GYRO_XOUT_H as usize);
        assert_eq!(MEASUREMENT_BURST_LEN, 8 + GYRO_BURST_LEN);
    }

    #[test]
    fn test_default_ranges() {
        assert_eq!(AccelRange::default().lsb_per_g(), 16384.0);
        assert_eq!(GyroRange::default().lsb_per_dps(), 131.0);
        assert_eq!(AccelRange::default().register_bits(), 0x00);
        assert_eq!(GyroRange::default().register_bits(), 0x00);
    }

    #[test]
    fn test_range_lookup() {
        assert_eq!(AccelRange::from_g(8), Some(AccelRange::G8));
        assert_eq!(AccelRange::from_g(3), None);
        assert_eq!(GyroRange::from_dps(2000), Some(GyroRange::Dps2000));
        assert_eq!(GyroRange::from_dps(300), None);
    }

    #[test]
    fn test_range_register_bits() {
        assert_eq!(AccelRange::G16.register_bits(), 0x18);
        assert_eq!(GyroRange::Dps500.register_bits(), 0x08);
    }
}
