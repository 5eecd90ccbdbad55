//! Register-level access to the two-wire bus.
//!
//! The sensor driver only needs two primitives: write one register and read a
//! burst of consecutive registers. [`RegisterBus`] captures exactly that so the
//! driver can be exercised with mocks, and [`I2cRegisterBus`] provides it over
//! any `embedded-hal` I2C implementation.

use embedded_hal::i2c::I2c;
use linux_embedded_hal::I2cdev;
use tracing::info;

use crate::error::{MotionRemoteError, Result};

/// Register read/write operations on a two-wire bus
#[cfg_attr(test, mockall::automock)]
pub trait RegisterBus: Send {
    /// Write a single register
    fn write_register(&mut self, addr: u8, reg: u8, value: u8) -> Result<()>;

    /// Read `count` consecutive registers starting at `start_reg`
    fn read_burst(&mut self, addr: u8, start_reg: u8, count: usize) -> Result<Vec<u8>>;
}

/// [`RegisterBus`] over an `embedded-hal` I2C bus
pub struct I2cRegisterBus<I> {
    i2c: I,
}

impl<I> std::fmt::Debug for I2cRegisterBus<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I2cRegisterBus").finish_non_exhaustive()
    }
}

impl<I: I2c> I2cRegisterBus<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Release the underlying bus
    pub fn into_inner(self) -> I {
        self.i2c
    }
}

impl I2cRegisterBus<I2cdev> {
    /// Open a Linux I2C character device (e.g. `/dev/i2c-1`)
    ///
    /// # Errors
    ///
    /// Returns `BusRead` if the device node cannot be opened.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use motion_remote::sensor::bus::I2cRegisterBus;
    ///
    /// let bus = I2cRegisterBus::open_linux("/dev/i2c-1")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open_linux(path: &str) -> Result<Self> {
        let i2c = I2cdev::new(path)
            .map_err(|e| MotionRemoteError::BusRead(format!("Failed to open {}: {}", path, e)))?;
        info!("Opened I2C bus at {}", path);
        Ok(Self::new(i2c))
    }
}

impl<I> RegisterBus for I2cRegisterBus<I>
where
    I: I2c + Send,
{
    fn write_register(&mut self, addr: u8, reg: u8, value: u8) -> Result<()> {
        self.i2c.write(addr, &[reg, value]).map_err(|e| {
            MotionRemoteError::BusWrite(format!(
                "Failed to write register 0x{:02X} at 0x{:02X}: {:?}",
                reg, addr, e
            ))
        })
    }

    fn read_burst(&mut self, addr: u8, start_reg: u8, count: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; count];
        self.i2c.write_read(addr, &[start_reg], &mut buf).map_err(|e| {
            MotionRemoteError::BusRead(format!(
                "Failed to read {} bytes from 0x{:02X} at 0x{:02X}: {:?}",
                count, start_reg, addr, e
            ))
        })?;
        Ok(buf)
    }
}
