//! Wire protocol: newline-terminated ASCII lines, colon-separated fields
//!
//! - [`framing`] turns the TCP byte stream into lines
//! - [`decoder`] turns a line into an update of the mirrored state
//! - [`commands`] turns a control operation into an outgoing line

pub mod commands;
pub mod decoder;
pub mod framing;

pub use commands::Command;
pub use decoder::{decode, Decoded, Packet};
pub use framing::LineFramer;

/// TCP port the switcher listens on
pub const DEFAULT_PORT: u16 = 9923;

/// Line terminator for outgoing commands
pub const LINE_TERMINATOR: &str = "\n";
