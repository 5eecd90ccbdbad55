//! Human-readable console output.
//!
//! Writes one line per frame, either to stdout or to a serial console.

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_serial::SerialPortBuilderExt;
use tracing::info;

use super::{Frame, TelemetrySink};
use crate::error::{MotionRemoteError, Result};

/// Writes formatted frames to a byte stream
pub struct ConsoleSink {
    writer: Box<dyn AsyncWrite + Unpin + Send>,
    description: String,
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl ConsoleSink {
    /// Console on the process's standard output
    pub fn stdout() -> Self {
        Self::from_writer(tokio::io::stdout(), "stdout")
    }

    /// Console on a serial port (8N1, no flow control)
    ///
    /// # Errors
    ///
    /// Returns `TransportSetup` if the port cannot be opened.
    pub fn open_serial(path: &str, baud_rate: u32) -> Result<Self> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| {
                MotionRemoteError::TransportSetup(format!("Failed to open {}: {}", path, e))
            })?;

        info!("Opened serial console at {} ({} baud)", path, baud_rate);
        Ok(Self::from_writer(port, path))
    }

    /// Console on any async writer
    pub fn from_writer<W>(writer: W, description: &str) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        Self {
            writer: Box::new(writer),
            description: description.to_string(),
        }
    }
}

/// Format a frame as a single console line (without trailing newline)
///
/// # Examples
///
/// ```
/// use motion_remote::transport::console::format_frame;
/// use motion_remote::transport::Frame;
///
/// let frame = Frame {
///     raw: Default::default(),
///     sample: Default::default(),
///     input: Default::default(),
///     packet: Default::default(),
/// };
/// assert!(format_frame(&frame).starts_with("Accel: 0.000,0.000,0.000 | Gyro:"));
/// ```
#[must_use]
pub fn format_frame(frame: &Frame) -> String {
    let s = &frame.sample;
    format!(
        concat!(
            "Accel: {:.3},{:.3},{:.3} | Gyro: {:.2},{:.2},{:.2} | Temp: {:.1}",
            " | Buttons: {:08b} | Joy: {:.2},{:.2}"
        ),
        s.ax,
        s.ay,
        s.az,
        s.gx,
        s.gy,
        s.gz,
        frame.raw.temperature_celsius(),
        frame.input.buttons,
        frame.input.joystick[0],
        frame.input.joystick[1],
    )
}

#[async_trait]
impl TelemetrySink for ConsoleSink {
    async fn publish(&mut self, frame: &Frame) -> Result<()> {
        let mut line = format_frame(frame);
        line.push('\n');

        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| {
                MotionRemoteError::TransportSend(format!("Failed to write line: {}", e))
            })?;

        self.writer
            .flush()
            .await
            .map_err(|e| {
                MotionRemoteError::TransportSend(format!("Failed to flush console: {}", e))
            })?;

        Ok(())
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputState;
    use crate::sensor::sample::{PhysicalSample, RawSample};
    use bytes::Bytes;
    use tokio::io::AsyncReadExt;

    fn frame() -> Frame {
        Frame {
            raw: RawSample {
                temp: 340,
                ..Default::default()
            },
            sample: PhysicalSample {
                ax: 1.0,
                ay: -0.25,
                az: 0.0,
                gx: 12.5,
                gy: 0.0,
                gz: -3.0,
            },
            input: InputState {
                buttons: 0b0000_1001,
                joystick: [0.5, -1.0],
            },
            packet: Bytes::from_static(&[1, 2, 3]),
        }
    }

    #[test]
    fn test_format_frame() {
        assert_eq!(
            format_frame(&frame()),
            concat!(
                "Accel: 1.000,-0.250,0.000 | Gyro: 12.50,0.00,-3.00 | Temp: 37.5",
                " | Buttons: 00001001 | Joy: 0.50,-1.00"
            )
        );
    }

    #[tokio::test]
    async fn test_publish_writes_line() {
        let (writer, mut reader) = tokio::io::duplex(1024);
        let mut sink = ConsoleSink::from_writer(writer, "test");

        sink.publish(&frame()).await.unwrap();
        drop(sink);

        let mut output = String::new();
        reader.read_to_string(&mut output).await.unwrap();
        assert_eq!(output, format!("{}\n", format_frame(&frame())));
    }

    #[tokio::test]
    async fn test_publish_to_closed_writer_fails() {
        let (writer, reader) = tokio::io::duplex(1024);
        drop(reader);
        let mut sink = ConsoleSink::from_writer(writer, "closed");

        let result = sink.publish(&frame()).await;
        assert!(matches!(result, Err(MotionRemoteError::TransportSend(_))));
    }

    #[test]
    fn test_open_serial_missing_device() {
        let result = ConsoleSink::open_serial("/dev/nonexistent_serial_device_12345", 115200);
        match result {
            Err(MotionRemoteError::TransportSetup(msg)) => {
                assert!(msg.contains("/dev/nonexistent_serial_device_12345"));
            }
            other => panic!("Expected TransportSetup error, got: {:?}", other),
        }
    }
}
