//! # Transport Module
//!
//! Delivers each frame to the PC or a console.
//!
//! This module handles:
//! - UDP delivery of encoded packets, one datagram per frame
//! - Human-readable console lines on stdout or a serial port
//! - Wi-Fi association with bounded retries before streaming starts

pub mod console;
pub mod network;
pub mod udp;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use crate::config::{TransportConfig, TransportMode};
use crate::error::Result;
use crate::input::InputState;
use crate::sensor::sample::{PhysicalSample, RawSample};
use console::ConsoleSink;
use udp::UdpSink;

/// Everything produced by one loop iteration
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub raw: RawSample,
    pub sample: PhysicalSample,
    pub input: InputState,
    /// Encoded packet, opaque to the transport
    pub packet: Bytes,
}

/// Destination for frames
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetrySink: Send {
    /// Deliver one frame
    async fn publish(&mut self, frame: &Frame) -> Result<()>;

    /// Where frames go, for log messages
    fn describe(&self) -> String;
}

/// Build the sink selected by the transport configuration
///
/// # Errors
///
/// Returns error if the destination cannot be resolved or the serial console
/// cannot be opened.
pub async fn build_sink(config: &TransportConfig) -> Result<Box<dyn TelemetrySink>> {
    let sink: Box<dyn TelemetrySink> = match config.mode {
        TransportMode::Udp => {
            Box::new(UdpSink::connect(&config.dest_host, config.dest_port).await?)
        }
        TransportMode::Console if config.console_device.is_empty() => {
            Box::new(ConsoleSink::stdout())
        }
        TransportMode::Console => Box::new(ConsoleSink::open_serial(
            &config.console_device,
            config.console_baud_rate,
        )?),
    };

    info!("Streaming frames to {}", sink.describe());
    Ok(sink)
}
