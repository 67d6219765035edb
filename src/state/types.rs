//! Device state type definitions
//!
//! Mirrors what the switcher reports about itself. Every field starts unset
//! and is only filled in by packets from the device.

use serde::Serialize;
use std::collections::BTreeMap;

/// Mirrored snapshot of the remote switcher
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceState {
    /// Configured input count, authoritative once `ILCC` has been seen
    pub input_count: Option<u32>,
    /// Inputs keyed by zero-based device index (sparse)
    pub inputs: BTreeMap<u32, Input>,
    /// Zero-based index of the input on the program bus
    pub program: Option<u32>,
    /// Zero-based index of the input on the preview bus
    pub preview: Option<u32>,
    pub stream: OutputBus,
    pub record: OutputBus,
    pub fade_to_black: Option<bool>,
    /// Graphics layers keyed by zero-based index, created on first reference
    pub graphics: BTreeMap<u32, Graphic>,
    pub t_bar: TBar,
}

/// One configured video source
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// 1-based input number (index + 1)
    pub number: u32,
    /// Display name with quote characters stripped
    pub name: String,
    /// Device-reported source tag
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub audio: InputAudio,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_status: Option<MediaStatus>,
}

/// Per-input audio mixer strip
///
/// Levels and gains are device thousandths divided by 1000; a field the
/// device sent as non-numeric is stored as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputAudio {
    pub level: f64,
    pub gain: f64,
    pub mute: bool,
    pub solo: bool,
    pub program_lock: bool,
    /// Audio follows program (set by `AOC` with any non-zero value)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<bool>,
}

/// Stream or record output: its audio bus and its run status
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputBus {
    pub audio: BusAudio,
    pub status: OutputStatus,
}

/// Master audio bus of an output
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusAudio {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mute: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solo: Option<bool>,
}

/// Run status of the stream or record output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum OutputStatus {
    #[default]
    Stopped,
    Starting,
    Started,
    Stopping,
}

impl OutputStatus {
    /// Parse the suffix of a `Str*`/`Rec*` packet type
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "Stopped" => Some(OutputStatus::Stopped),
            "Starting" => Some(OutputStatus::Starting),
            "Started" => Some(OutputStatus::Started),
            "Stopping" => Some(OutputStatus::Stopping),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputStatus::Stopped => write!(f, "Stopped"),
            OutputStatus::Starting => write!(f, "Starting"),
            OutputStatus::Started => write!(f, "Started"),
            OutputStatus::Stopping => write!(f, "Stopping"),
        }
    }
}

/// Media playback status of a clip input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaStatus {
    Paused,
    PlayFull,
    PlayInOut,
}

/// Graphics overlay layer
///
/// Entries are created empty when first referenced, so every field can
/// still be unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Graphic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GraphicStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_push: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GraphicStatus {
    On,
    Off,
}

/// Transition bar
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TBar {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TBarStatus>,
    /// Transition progress, 0-100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TBarStatus {
    Start,
    Stop,
    Automatic,
    Manual,
}
