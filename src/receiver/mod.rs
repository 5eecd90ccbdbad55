//! # Receiver Module
//!
//! PC-side listener. Decodes each datagram with the sender's layout and turns
//! it into a [`PacketRecord`] carrying button edges.

pub mod record;

use chrono::Utc;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::error::Result;
use crate::packet::decoder::decode_packet;
use crate::packet::layout::PacketLayout;
pub use record::{button_edges, ButtonEdges, PacketRecord};

/// Largest datagram accepted; anything longer is malformed for every layout
const MAX_DATAGRAM: usize = 1024;

/// Decodes packets and tracks the previous button mask
#[derive(Debug, Clone)]
pub struct PacketTracker {
    layout: PacketLayout,
    last_buttons: u8,
}

impl PacketTracker {
    pub fn new(layout: PacketLayout) -> Self {
        Self {
            layout,
            last_buttons: 0,
        }
    }

    /// Decode one datagram.
    ///
    /// Button state only advances on a successful decode.
    ///
    /// # Errors
    ///
    /// Returns `Packet` if the payload length does not match the layout.
    pub fn process_datagram(&mut self, data: &[u8], peer: SocketAddr) -> Result<PacketRecord> {
        let decoded = decode_packet(&self.layout, data)?;
        let edges = button_edges(self.last_buttons, decoded.input.buttons);
        self.last_buttons = decoded.input.buttons;

        Ok(PacketRecord {
            timestamp: Utc::now(),
            peer,
            sample: decoded.sample,
            input: decoded.input,
            edges,
        })
    }

    pub fn layout(&self) -> &PacketLayout {
        &self.layout
    }

    pub fn last_buttons(&self) -> u8 {
        self.last_buttons
    }
}

/// UDP listener bound to the configured address
#[derive(Debug)]
pub struct Receiver {
    socket: UdpSocket,
    tracker: PacketTracker,
    buf: Vec<u8>,
}

impl Receiver {
    /// Bind the listening socket
    ///
    /// # Errors
    ///
    /// Returns `Io` if the address cannot be bound.
    pub async fn bind(addr: SocketAddr, layout: PacketLayout) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        info!(
            "Listening on {} for '{}' packets ({} bytes)",
            socket.local_addr()?,
            layout.name(),
            layout.size()
        );

        Ok(Self {
            socket,
            tracker: PacketTracker::new(layout),
            buf: vec![0u8; MAX_DATAGRAM],
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Wait for the next well-formed packet.
    ///
    /// Datagrams of the wrong length are skipped.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the socket fails.
    pub async fn next_record(&mut self) -> Result<PacketRecord> {
        loop {
            let (len, peer) = self.socket.recv_from(&mut self.buf).await?;
            match self.tracker.process_datagram(&self.buf[..len], peer) {
                Ok(record) => return Ok(record),
                Err(e) => debug!("Skipping datagram from {}: {}", peer, e),
            }
        }
    }
}
