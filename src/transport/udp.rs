//! UDP delivery of encoded packets.
//!
//! Each frame becomes exactly one datagram with no header, sequence number or
//! framing. The receiver identifies the layout by size alone.

use async_trait::async_trait;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::{lookup_host, UdpSocket};
use tracing::debug;

use super::{Frame, TelemetrySink};
use crate::error::{MotionRemoteError, Result};

/// Sends packets to a fixed destination
#[derive(Debug)]
pub struct UdpSink {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl UdpSink {
    /// Resolve the destination and open a connected socket
    ///
    /// # Errors
    ///
    /// Returns `TransportSetup` if the host cannot be resolved, or `Io` if the
    /// socket cannot be bound.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let destination = lookup_host((host, port))
            .await
            .map_err(|e| {
                MotionRemoteError::TransportSetup(format!("Failed to resolve {}: {}", host, e))
            })?
            .next()
            .ok_or_else(|| {
                MotionRemoteError::TransportSetup(format!("No address found for {}", host))
            })?;

        let local = if destination.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(local).await?;
        socket.connect(destination).await?;
        debug!("UDP socket {} connected to {}", socket.local_addr()?, destination);

        Ok(Self {
            socket,
            destination,
        })
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }
}

#[async_trait]
impl TelemetrySink for UdpSink {
    async fn publish(&mut self, frame: &Frame) -> Result<()> {
        let sent = self.socket.send(&frame.packet).await.map_err(|e| {
            MotionRemoteError::TransportSend(format!(
                "Failed to send to {}: {}",
                self.destination, e
            ))
        })?;

        if sent != frame.packet.len() {
            return Err(MotionRemoteError::TransportSend(format!(
                "Short send to {}: {} of {} bytes",
                self.destination,
                sent,
                frame.packet.len()
            )));
        }

        Ok(())
    }

    fn describe(&self) -> String {
        format!("udp://{}", self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputState;
    use crate::packet::encoder::encode_packet;
    use crate::packet::layout::PacketLayout;
    use crate::sensor::sample::{PhysicalSample, RawSample};
    use tokio_test::assert_ok;

    fn frame() -> Frame {
        let sample = PhysicalSample {
            ax: 1.0,
            gz: -2.5,
            ..Default::default()
        };
        let input = InputState {
            buttons: 0b11,
            joystick: [0.5, 0.0],
        };
        Frame {
            raw: RawSample::default(),
            sample,
            input,
            packet: encode_packet(&PacketLayout::imu_buttons_joystick(), &sample, &input),
        }
    }

    #[tokio::test]
    async fn test_publish_sends_one_datagram() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = receiver.local_addr().unwrap().port();

        let mut sink = assert_ok!(UdpSink::connect("127.0.0.1", port).await);
        let frame = frame();
        assert_ok!(sink.publish(&frame).await);

        let mut buf = [0u8; 64];
        let (len, _) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(len, 29);
        assert_eq!(&buf[..len], &frame.packet[..]);
    }

    #[tokio::test]
    async fn test_each_frame_is_separate_datagram() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = receiver.local_addr().unwrap().port();

        let mut sink = UdpSink::connect("127.0.0.1", port).await.unwrap();
        sink.publish(&frame()).await.unwrap();
        sink.publish(&frame()).await.unwrap();

        let mut buf = [0u8; 64];
        for _ in 0..2 {
            let (len, _) = receiver.recv_from(&mut buf).await.unwrap();
            assert_eq!(len, 29);
        }
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_setup_error() {
        let err = UdpSink::connect("host.invalid", 5005).await.unwrap_err();
        assert!(matches!(err, MotionRemoteError::TransportSetup(_)));
        assert!(!err.is_recoverable());
    }

    #[tokio::test]
    async fn test_describe() {
        let sink = UdpSink::connect("127.0.0.1", 6000).await.unwrap();
        assert_eq!(sink.describe(), "udp://127.0.0.1:6000");
        assert_eq!(sink.destination().port(), 6000);
    }
}
