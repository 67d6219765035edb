//! Error types for the studio client
//!
//! Argument and range errors are returned synchronously to the caller of a
//! command. Transport failures are never returned; they are recovered by the
//! reconnect loop and delivered as [`crate::StudioEvent::Error`].

use thiserror::Error;

/// The canonical error type for the studio client.
#[derive(Debug, Error)]
pub enum StudioError {
    // ── Caller errors ────────────────────────────────────────────
    /// A command argument is missing or is not a valid 1-based index.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A level, gain or increment lies outside its documented domain.
    #[error("{what} must be between {min} and {max} (got {value})")]
    OutOfRange {
        what: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    // ── Device errors ────────────────────────────────────────────
    /// The device sent a packet whose type tag is not in the catalog.
    #[error("unrecognized packet type: {0}")]
    UnrecognizedPacket(String),

    // ── Connection errors ────────────────────────────────────────
    /// The TCP layer reported an error. Carried by `StudioEvent::Error`.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

impl StudioError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        StudioError::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = StudioError::OutOfRange {
            what: "audio level",
            min: -60.0,
            max: 10.0,
            value: 10.5,
        };
        assert_eq!(
            err.to_string(),
            "audio level must be between -60 and 10 (got 10.5)"
        );
    }

    #[test]
    fn test_io_error_converts_to_transport() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err: StudioError = io.into();
        assert!(matches!(err, StudioError::Transport(_)));
    }
}
