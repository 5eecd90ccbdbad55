//! JSON Lines records emitted by the listener.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::SocketAddr;

use crate::error::{MotionRemoteError, Result};
use crate::input::InputState;
use crate::sensor::sample::PhysicalSample;

/// Buttons that changed state since the previous packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ButtonEdges {
    /// Bits that went from released to pressed
    pub pressed: u8,
    /// Bits that went from pressed to released
    pub released: u8,
}

impl ButtonEdges {
    pub fn is_empty(&self) -> bool {
        self.pressed == 0 && self.released == 0
    }
}

/// Rising and falling edges between two button masks
#[must_use]
pub fn button_edges(previous: u8, current: u8) -> ButtonEdges {
    ButtonEdges {
        pressed: current & !previous,
        released: previous & !current,
    }
}

/// One decoded packet
#[derive(Debug, Clone, Serialize)]
pub struct PacketRecord {
    pub timestamp: DateTime<Utc>,
    pub peer: SocketAddr,
    pub sample: PhysicalSample,
    pub input: InputState,
    pub edges: ButtonEdges,
}

impl PacketRecord {
    /// Serialize as a single JSON line (no trailing newline)
    ///
    /// # Errors
    ///
    /// Returns `Packet` if serialization fails.
    pub fn to_json_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| MotionRemoteError::Packet(format!("Failed to serialize record: {}", e)))
    }
}
