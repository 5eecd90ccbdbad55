//! # Packet Module
//!
//! Fixed binary layout sent to the PC, one UDP datagram per loop iteration.
//!
//! This module handles:
//! - Declarative field layouts (presets and custom field lists)
//! - Encoding samples as little-endian floats plus a button mask byte
//! - Decoding packets on the receiving side

pub mod decoder;
pub mod encoder;
pub mod layout;
