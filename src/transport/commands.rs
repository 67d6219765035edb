//! Messages from client handles to the transport task

/// Commands for the transport actor
///
/// All commands are fire-and-forget; outcomes are observable through
/// [`crate::StudioEvent`]s and the mirrored connection state.
#[derive(Debug)]
pub(crate) enum TransportCommand {
    /// Open the connection unless one is live or being established
    Connect,
    /// Write one encoded line; dropped unless connected
    Write(String),
    /// Cancel the reconnect timer, drop the socket and stop the task
    Shutdown,
}
