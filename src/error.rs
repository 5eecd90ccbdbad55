//! # Error Types
//!
//! Custom error types for Motion Remote using `thiserror`.

use thiserror::Error;

/// Main error type for Motion Remote
#[derive(Debug, Error)]
pub enum MotionRemoteError {
    /// Bus transaction failed or returned fewer bytes than requested
    #[error("Bus read error: {0}")]
    BusRead(String),

    /// Register write failed
    #[error("Bus write error: {0}")]
    BusWrite(String),

    /// A single network association attempt failed
    #[error("Network association error: {0}")]
    Association(String),

    /// Network association retry budget exhausted
    #[error("Network unavailable after {attempts} association attempts")]
    NetworkUnavailable { attempts: u32 },

    /// Datagram or console write failed
    #[error("Transport send error: {0}")]
    TransportSend(String),

    /// Destination could not be resolved or the console could not be opened
    #[error("Transport setup error: {0}")]
    TransportSetup(String),

    /// Gyroscope calibration could not run
    #[error("Calibration error: {0}")]
    Calibration(String),

    /// Packet layout or decoding errors
    #[error("Packet error: {0}")]
    Packet(String),

    /// GPIO or ADC read errors
    #[error("Input error: {0}")]
    Input(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MotionRemoteError {
    /// Whether the control loop can drop the current frame and keep running.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MotionRemoteError::BusRead(_) | MotionRemoteError::TransportSend(_)
        )
    }
}

/// Result type alias for Motion Remote
pub type Result<T> = std::result::Result<T, MotionRemoteError>;
