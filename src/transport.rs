//! TCP transport to the switcher
//!
//! A single task owns the socket and runs the connection state machine:
//!
//! ```text
//!  Disconnected ──connect()──▶ Connecting ──ok──▶ Connected
//!       ▲                          │                  │
//!       └──────── error ───────────┘◀── error/close ──┘
//!       │
//!       └── after the reconnect delay, back to Connecting
//! ```
//!
//! There is no terminal state; the task retries until it is shut down.

mod actor;
mod commands;
mod handle;


use serde::Serialize;

pub use handle::StudioClient;

/// Connection lifecycle as seen by callers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        f.write_str(name)
    }
}
