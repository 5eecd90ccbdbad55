//! # Motion Remote Library
//!
//! Turn an MPU-6050 and a few buttons into a wireless motion controller.
//!
//! This library provides the sensor driver, calibration, input sampling, packet
//! encoding and transports for the controller side, plus the decoder used by
//! the PC-side listener.

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod packet;
pub mod pipeline;
pub mod receiver;
pub mod sensor;
pub mod transport;
