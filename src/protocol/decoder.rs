//! Packet decoder
//!
//! One line in, one typed update against the mirror out. The first
//! colon-separated field is the packet type, the rest are positional
//! arguments.

use serde::Serialize;

use crate::error::{Result, StudioError};
use crate::state::DeviceState;

/// A single inbound line, split into its fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Packet {
    /// Type tag, matched case-sensitively
    #[serde(rename = "type")]
    pub packet_type: String,
    /// All colon-separated parts, type tag included at index 0
    pub parts: Vec<String>,
    /// The line as received
    pub raw: String,
}

impl Packet {
    /// Split a line into its type tag and fields
    pub fn parse(line: &str) -> Self {
        let parts: Vec<String> = line.trim().split(':').map(str::to_string).collect();
        Self {
            packet_type: parts.first().cloned().unwrap_or_default(),
            parts,
            raw: line.to_string(),
        }
    }

    /// Positional arguments after the type tag
    pub fn fields(&self) -> Vec<&str> {
        self.parts.iter().skip(1).map(String::as_str).collect()
    }
}

/// Outcome of decoding one line
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The packet was applied to the mirror
    Applied(Packet),
    /// Unknown type tag; the mirror was not touched
    Unrecognized(Packet),
}

impl Decoded {
    pub fn packet(&self) -> &Packet {
        match self {
            Decoded::Applied(packet) | Decoded::Unrecognized(packet) => packet,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Decoded::Applied(_))
    }

    /// Turn an unrecognized packet into [`StudioError::UnrecognizedPacket`]
    pub fn into_result(self) -> Result<Packet> {
        match self {
            Decoded::Applied(packet) => Ok(packet),
            Decoded::Unrecognized(packet) => {
                Err(StudioError::UnrecognizedPacket(packet.packet_type))
            },
        }
    }
}

/// Decode one line and apply it to `state`.
pub fn decode(line: &str, state: &mut DeviceState) -> Decoded {
    let packet = Packet::parse(line);
    if state.apply(&packet.packet_type, &packet.fields()) {
        Decoded::Applied(packet)
    } else {
        Decoded::Unrecognized(packet)
    }
}
