//! Shared mirror of the switcher
//!
//! Holds the device state, the latest packet, the connection state and the
//! observers. The transport task is the only writer; any number of client
//! handles read from it, including from inside event callbacks.

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{trace, warn};

use crate::notifier::{Notifier, StudioEvent};
use crate::protocol::{decoder, Packet};
use crate::state::DeviceState;
use crate::transport::ConnectionState;

#[derive(Debug, Default)]
pub struct StudioMirror {
    state: RwLock<DeviceState>,
    latest_packet: RwLock<Option<Packet>>,
    connection: RwLock<ConnectionState>,
    notifier: Notifier,
}

impl StudioMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one inbound line into the mirror.
    ///
    /// Emits `update` with the packet type when the line was recognized.
    /// Unknown packet types are logged and otherwise ignored. Returns whether
    /// the line was recognized.
    pub fn decode(&self, line: &str) -> bool {
        // the write guard is released before observers run
        let decoded = decoder::decode(line, &mut self.state.write());
        *self.latest_packet.write() = Some(decoded.packet().clone());

        match decoded.into_result() {
            Ok(packet) => {
                trace!(packet = %packet.raw, "studio: applied packet");
                self.emit(StudioEvent::Update(packet.packet_type));
                true
            },
            Err(e) => {
                warn!(raw = line, "studio: {}", e);
                false
            },
        }
    }

    /// Copy of the full device state
    pub fn snapshot(&self) -> DeviceState {
        self.state.read().clone()
    }

    /// Device state as a JSON document
    pub fn snapshot_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&*self.state.read())
    }

    /// The most recently received packet, recognized or not
    pub fn latest_packet(&self) -> Option<Packet> {
        self.latest_packet.read().clone()
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.connection.read()
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    /// Register a callback invoked for every event
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&StudioEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(callback);
    }

    /// Register a channel that receives a copy of every event
    pub fn subscribe_channel(&self) -> mpsc::UnboundedReceiver<StudioEvent> {
        self.notifier.subscribe_channel()
    }

    pub(crate) fn set_connection_state(&self, state: ConnectionState) {
        *self.connection.write() = state;
    }

    pub(crate) fn emit(&self, event: StudioEvent) {
        self.notifier.emit(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{GraphicStatus, OutputStatus, TBarStatus};
    use std::sync::Arc;

    fn updates(rx: &mut mpsc::UnboundedReceiver<StudioEvent>) -> Vec<String> {
        std::iter::from_fn(|| rx.try_recv().ok())
            .map(|event| match event {
                StudioEvent::Update(packet_type) => packet_type,
                other => panic!("unexpected event {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_every_catalog_packet_emits_one_update() {
        let mirror = StudioMirror::new();
        mirror.decode("ILC:0:Cam:0:0:0:0:0:Camera");
        mirror.decode("ILC:1:Clip:0:0:0:0:0:Media");
        let mut rx = mirror.subscribe_channel();

        let lines = [
            "ILCC:2",
            "ILC:0:Cam:0:0:0:0:0:Camera",
            "ILC:1:Clip:0:0:0:0:0:Media",
            "PmIS:0",
            "PwIS:1",
            "SVC:-1000",
            "SMC:1",
            "SSC:0",
            "RVC:-2000",
            "RMC:0",
            "RSC:1",
            "AVC:0:-3000",
            "AGC:0:1000",
            "AOC:0:1",
            "AMC:0:1",
            "ASC:0:0",
            "FIn",
            "FOut",
            "StrStopped",
            "StrStarting",
            "StrStarted",
            "StrStopping",
            "RecStopped",
            "RecStarting",
            "RecStarted",
            "RecStopping",
            "GMOn:0",
            "GMOff:0",
            "GMPvH:0",
            "GMPvS:0",
            "GMOH:0",
            "GMOS:0",
            "GPA:0:1",
            "MPause:1",
            "MFP:1",
            "MIOP:1",
            "TrAStart",
            "TrAStop",
            "TrASp:250",
            "TrMSp:750",
            "Cut",
        ];

        for line in lines {
            assert!(mirror.decode(line), "{} should be recognized", line);
            let packet_type = line.split(':').next().unwrap();
            assert_eq!(updates(&mut rx), vec![packet_type.to_string()]);
        }

        let state = mirror.snapshot();
        assert_eq!(state.input_count, Some(2));
        assert_eq!(state.program, Some(0));
        assert_eq!(state.preview, Some(1));
        assert_eq!(state.fade_to_black, Some(true));
        assert_eq!(state.stream.status, OutputStatus::Stopping);
        assert_eq!(state.record.status, OutputStatus::Stopping);
        assert_eq!(state.graphics[&0].status, Some(GraphicStatus::Off));
        assert_eq!(state.t_bar.status, Some(TBarStatus::Manual));
        assert_eq!(state.t_bar.percent, Some(75.0));
    }

    #[test]
    fn test_unrecognized_packet_is_silent() {
        let mirror = StudioMirror::new();
        mirror.decode("PmIS:3");
        let before = mirror.snapshot();
        let mut rx = mirror.subscribe_channel();

        assert!(!mirror.decode("Mystery:1:2"));
        assert!(rx.try_recv().is_err());
        assert_eq!(mirror.snapshot(), before);

        let latest = mirror.latest_packet().unwrap();
        assert_eq!(latest.packet_type, "Mystery");
        assert_eq!(latest.parts, vec!["Mystery", "1", "2"]);
    }

    #[test]
    fn test_audio_update_for_missing_input_leaves_state() {
        let mirror = StudioMirror::new();
        let before = mirror.snapshot();
        assert!(mirror.decode("AMC:0:1"));
        assert_eq!(mirror.snapshot(), before);
        assert!(mirror.snapshot().inputs.is_empty());
    }

    #[test]
    fn test_snapshot_readable_from_callback() {
        let mirror = Arc::new(StudioMirror::new());
        let reader = Arc::clone(&mirror);
        let seen = Arc::new(parking_lot::Mutex::new(None));
        let sink = Arc::clone(&seen);
        mirror.subscribe(move |_| *sink.lock() = reader.snapshot().program);

        mirror.decode("PmIS:4");
        assert_eq!(*seen.lock(), Some(4));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mirror = StudioMirror::new();
        mirror.decode("ILCC:1");
        mirror.decode("ILC:0:\"Main\":-6000:1000:1:0:0:Camera");
        mirror.decode("GMOn:2");
        mirror.decode("StrStarted");

        let json = mirror.snapshot_json().unwrap();
        assert_eq!(json["inputCount"], 1);
        assert_eq!(json["inputs"]["0"]["name"], "Main");
        assert_eq!(json["inputs"]["0"]["number"], 1);
        assert_eq!(json["inputs"]["0"]["type"], "Camera");
        assert_eq!(json["inputs"]["0"]["audio"]["level"], -6.0);
        assert_eq!(json["inputs"]["0"]["audio"]["mute"], true);
        assert_eq!(json["inputs"]["0"]["audio"]["programLock"], false);
        assert_eq!(json["graphics"]["2"]["status"], "On");
        assert_eq!(json["stream"]["status"], "Started");
        assert_eq!(json["record"]["status"], "Stopped");
        assert!(json["program"].is_null());
        assert!(json["fadeToBlack"].is_null());
        assert!(json.get("tBar").is_some());
    }

    #[test]
    fn test_initial_connection_state() {
        let mirror = StudioMirror::new();
        assert_eq!(mirror.connection_state(), ConnectionState::Disconnected);
        assert!(!mirror.is_connected());
    }
}
