//! GPIO and ADC access.
//!
//! [`SysfsPins`] reads the Linux sysfs interfaces:
//! - GPIO: `<gpio_root>/gpio<N>/value` containing `0` or `1`
//! - ADC: `<adc_root>/in_voltage<N>_raw` containing the raw conversion
//!
//! Pins must already be exported and configured as inputs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MotionRemoteError, Result};

/// Digital and analog pin reads
#[cfg_attr(test, mockall::automock)]
pub trait InputPins: Send {
    /// Returns `true` when the pin reads logic-high
    fn digital_read(&mut self, pin: u32) -> Result<bool>;

    /// Returns the raw ADC conversion for the channel
    fn analog_read(&mut self, pin: u32) -> Result<u16>;
}

/// [`InputPins`] backed by sysfs files
#[derive(Debug, Clone)]
pub struct SysfsPins {
    gpio_root: PathBuf,
    adc_root: PathBuf,
}

impl SysfsPins {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(gpio_root: P, adc_root: Q) -> Self {
        Self {
            gpio_root: gpio_root.as_ref().to_path_buf(),
            adc_root: adc_root.as_ref().to_path_buf(),
        }
    }

    fn read_trimmed(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .map(|s| s.trim().to_string())
            .map_err(|e| {
                MotionRemoteError::Input(format!("Failed to read {}: {}", path.display(), e))
            })
    }
}

impl InputPins for SysfsPins {
    fn digital_read(&mut self, pin: u32) -> Result<bool> {
        let path = self.gpio_root.join(format!("gpio{}", pin)).join("value");
        match Self::read_trimmed(&path)?.as_str() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(MotionRemoteError::Input(format!(
                "Unexpected GPIO value '{}' in {}",
                other,
                path.display()
            ))),
        }
    }

    fn analog_read(&mut self, pin: u32) -> Result<u16> {
        let path = self.adc_root.join(format!("in_voltage{}_raw", pin));
        let contents = Self::read_trimmed(&path)?;
        contents.parse::<u16>().map_err(|e| {
            MotionRemoteError::Input(format!(
                "Invalid ADC value '{}' in {}: {}",
                contents,
                path.display(),
                e
            ))
        })
    }
}
