//! Heartbeat status LED.
//!
//! The LED flips once per loop iteration so a stalled loop is visible on the
//! board. It is driven through the same sysfs GPIO root as the buttons and must
//! already be exported as an output.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{MotionRemoteError, Result};

/// Single digital output
#[cfg_attr(test, mockall::automock)]
pub trait StatusLed: Send {
    /// Drive the output high (`true`) or low
    fn set(&mut self, on: bool) -> Result<()>;
}

/// [`StatusLed`] backed by `<gpio_root>/gpio<N>/value`
#[derive(Debug, Clone)]
pub struct SysfsLed {
    path: PathBuf,
}

impl SysfsLed {
    pub fn new<P: AsRef<Path>>(gpio_root: P, pin: u32) -> Self {
        Self {
            path: gpio_root.as_ref().join(format!("gpio{}", pin)).join("value"),
        }
    }
}

impl StatusLed for SysfsLed {
    fn set(&mut self, on: bool) -> Result<()> {
        fs::write(&self.path, if on { "1" } else { "0" }).map_err(|e| {
            MotionRemoteError::Input(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

/// Toggles a [`StatusLed`] once per call
pub struct Heartbeat {
    led: Box<dyn StatusLed>,
    lit: bool,
}

impl std::fmt::Debug for Heartbeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Heartbeat").field("lit", &self.lit).finish_non_exhaustive()
    }
}

impl Heartbeat {
    /// Starts with the LED off
    pub fn new(led: Box<dyn StatusLed>) -> Self {
        Self { led, lit: false }
    }

    /// Flip the LED. A failed write is logged and the state still advances.
    pub fn toggle(&mut self) {
        self.lit = !self.lit;
        if let Err(e) = self.led.set(self.lit) {
            debug!("Status LED write failed: {}", e);
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
