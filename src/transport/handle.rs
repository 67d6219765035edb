//! StudioClient - public API for the transport actor
//!
//! Control operations encode a [`Command`] and hand the line to the transport
//! task. They fail only on bad arguments; connectivity problems are reported
//! through events and never returned to the caller.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use super::actor::TransportActor;
use super::commands::TransportCommand;
use super::ConnectionState;
use crate::config::StudioConfig;
use crate::error::Result;
use crate::mirror::StudioMirror;
use crate::notifier::StudioEvent;
use crate::protocol::{Command, Packet};
use crate::state::DeviceState;

/// Handle to one switcher connection
///
/// Cheap to clone; all clones share the same socket and mirror. The transport
/// task stops when [`StudioClient::shutdown`] is called or every clone is
/// dropped.
#[derive(Clone)]
pub struct StudioClient {
    cmd_tx: mpsc::UnboundedSender<TransportCommand>,
    mirror: Arc<StudioMirror>,
    config: Arc<StudioConfig>,
}

impl StudioClient {
    /// Spawn the transport task without connecting
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: StudioConfig) -> Self {
        let mirror = Arc::new(StudioMirror::new());
        let cmd_tx = TransportActor::spawn(config.clone(), Arc::clone(&mirror));
        Self {
            cmd_tx,
            mirror,
            config: Arc::new(config),
        }
    }

    /// Spawn the transport task and start connecting to `host` on the
    /// default port
    pub fn connect_to(host: impl Into<String>) -> Self {
        let client = Self::new(StudioConfig::with_host(host));
        client.connect();
        client
    }

    // =========================================================================
    // Connection
    // =========================================================================

    /// Open the connection; no-op while connected or connecting
    pub fn connect(&self) {
        let _ = self.cmd_tx.send(TransportCommand::Connect);
    }

    /// Cancel any pending reconnect, close the socket and stop the task
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(TransportCommand::Shutdown);
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.mirror.connection_state()
    }

    pub fn is_connected(&self) -> bool {
        self.mirror.is_connected()
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    // =========================================================================
    // Control operations
    // =========================================================================

    /// Encode `command` and write it if connected
    ///
    /// Writes while disconnected are silently discarded.
    pub fn send(&self, command: Command) -> Result<()> {
        let line = command.encode()?;
        let _ = self.cmd_tx.send(TransportCommand::Write(line));
        Ok(())
    }

    /// Run a control operation by name with JSON parameters
    ///
    /// ```ignore
    /// client.execute("setPreview", &[json!(3)])?; // writes "SPrI:2"
    /// ```
    pub fn execute(&self, action: &str, params: &[Value]) -> Result<()> {
        self.send(Command::from_action(action, params)?)
    }

    pub fn cut(&self) -> Result<()> {
        self.send(Command::Cut)
    }

    pub fn auto(&self) -> Result<()> {
        self.send(Command::Auto)
    }

    pub fn set_fade_to_black(&self, on: bool) -> Result<()> {
        self.send(Command::FadeToBlack(on))
    }

    pub fn set_preview(&self, input: u32) -> Result<()> {
        self.send(Command::SetPreview(input))
    }

    pub fn set_program(&self, input: u32) -> Result<()> {
        self.send(Command::SetProgram(input))
    }

    pub fn start_stream(&self) -> Result<()> {
        self.send(Command::StartStream)
    }

    pub fn stop_stream(&self) -> Result<()> {
        self.send(Command::StopStream)
    }

    pub fn start_record(&self) -> Result<()> {
        self.send(Command::StartRecord)
    }

    pub fn stop_record(&self) -> Result<()> {
        self.send(Command::StopRecord)
    }

    pub fn push_graphic(&self, graphic: u32) -> Result<()> {
        self.send(Command::PushGraphic(graphic))
    }

    pub fn pull_graphic(&self, graphic: u32) -> Result<()> {
        self.send(Command::PullGraphic(graphic))
    }

    pub fn preview_show_graphic(&self, graphic: u32) -> Result<()> {
        self.send(Command::PreviewShowGraphic(graphic))
    }

    pub fn preview_hide_graphic(&self, graphic: u32) -> Result<()> {
        self.send(Command::PreviewHideGraphic(graphic))
    }

    pub fn play_media_full(&self, input: u32) -> Result<()> {
        self.send(Command::PlayMediaFull(input))
    }

    pub fn play_media_in_out(&self, input: u32) -> Result<()> {
        self.send(Command::PlayMediaInOut(input))
    }

    pub fn pause_media(&self, input: u32) -> Result<()> {
        self.send(Command::PauseMedia(input))
    }

    pub fn set_input_level(&self, input: u32, level: f64) -> Result<()> {
        self.send(Command::SetInputLevel { input, level })
    }

    pub fn increment_input_level(&self, input: u32, delta: f64) -> Result<()> {
        self.send(Command::IncrementInputLevel { input, delta })
    }

    pub fn set_input_gain(&self, input: u32, gain: f64) -> Result<()> {
        self.send(Command::SetInputGain { input, gain })
    }

    pub fn set_input_mute(&self, input: u32, mute: bool) -> Result<()> {
        self.send(Command::SetInputMute { input, mute })
    }

    pub fn set_input_solo(&self, input: u32, solo: bool) -> Result<()> {
        self.send(Command::SetInputSolo { input, solo })
    }

    pub fn set_input_program_lock(&self, input: u32, locked: bool) -> Result<()> {
        self.send(Command::SetInputProgramLock { input, locked })
    }

    pub fn set_stream_level(&self, level: f64) -> Result<()> {
        self.send(Command::SetStreamLevel(level))
    }

    pub fn increment_stream_level(&self, delta: f64) -> Result<()> {
        self.send(Command::IncrementStreamLevel(delta))
    }

    pub fn set_stream_mute(&self, mute: bool) -> Result<()> {
        self.send(Command::SetStreamMute(mute))
    }

    pub fn set_stream_solo(&self, solo: bool) -> Result<()> {
        self.send(Command::SetStreamSolo(solo))
    }

    pub fn set_record_level(&self, level: f64) -> Result<()> {
        self.send(Command::SetRecordLevel(level))
    }

    pub fn increment_record_level(&self, delta: f64) -> Result<()> {
        self.send(Command::IncrementRecordLevel(delta))
    }

    pub fn set_record_mute(&self, mute: bool) -> Result<()> {
        self.send(Command::SetRecordMute(mute))
    }

    pub fn set_record_solo(&self, solo: bool) -> Result<()> {
        self.send(Command::SetRecordSolo(solo))
    }

    // =========================================================================
    // Mirror
    // =========================================================================

    pub fn snapshot(&self) -> DeviceState {
        self.mirror.snapshot()
    }

    pub fn snapshot_json(&self) -> serde_json::Result<Value> {
        self.mirror.snapshot_json()
    }

    pub fn latest_packet(&self) -> Option<Packet> {
        self.mirror.latest_packet()
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&StudioEvent) + Send + Sync + 'static,
    {
        self.mirror.subscribe(callback);
    }

    pub fn subscribe_channel(&self) -> mpsc::UnboundedReceiver<StudioEvent> {
        self.mirror.subscribe_channel()
    }

    /// Shared mirror, for observers that outlive this handle
    pub fn mirror(&self) -> Arc<StudioMirror> {
        Arc::clone(&self.mirror)
    }
}

impl std::fmt::Debug for StudioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioClient")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("state", &self.connection_state())
            .finish()
    }
}
