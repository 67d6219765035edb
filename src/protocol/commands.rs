//! Command encoder
//!
//! Every controllable switcher function is one [`Command`]. Input and graphic
//! numbers are 1-based on this side and converted to the device's 0-based
//! index when the line is built. Audio values go through [`crate::codec`].
//!
//! Commands are fire-and-forget: encoding never touches the mirror, the
//! device reports the resulting state on its own.

use serde_json::Value;

use crate::codec::{to_gain_code, to_increment_code, to_level_code};
use crate::error::{Result, StudioError};

/// A control operation on the switcher
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Hard cut preview to program
    Cut,
    /// Automatic transition preview to program
    Auto,
    /// Fade to black (`true`) or back in (`false`)
    FadeToBlack(bool),
    SetPreview(u32),
    SetProgram(u32),
    StartStream,
    StopStream,
    StartRecord,
    StopRecord,
    /// Take a graphics layer on air
    PushGraphic(u32),
    /// Take a graphics layer off air
    PullGraphic(u32),
    PreviewShowGraphic(u32),
    PreviewHideGraphic(u32),
    PlayMediaFull(u32),
    PlayMediaInOut(u32),
    PauseMedia(u32),
    SetInputLevel { input: u32, level: f64 },
    IncrementInputLevel { input: u32, delta: f64 },
    SetInputGain { input: u32, gain: f64 },
    SetInputMute { input: u32, mute: bool },
    SetInputSolo { input: u32, solo: bool },
    SetInputProgramLock { input: u32, locked: bool },
    SetStreamLevel(f64),
    IncrementStreamLevel(f64),
    SetStreamMute(bool),
    SetStreamSolo(bool),
    SetRecordLevel(f64),
    IncrementRecordLevel(f64),
    SetRecordMute(bool),
    SetRecordSolo(bool),
}

impl Command {
    /// Build the outgoing line (without terminator).
    ///
    /// Fails with [`StudioError::InvalidArgument`] for a zero input/graphic
    /// number and propagates codec errors for audio values unchanged.
    pub fn encode(&self) -> Result<String> {
        let line = match *self {
            Command::Cut => "RCut".to_string(),
            Command::Auto => "RAuto".to_string(),
            Command::FadeToBlack(out) => format!("RF{}", if out { "Out" } else { "In" }),
            Command::SetPreview(input) => format!("SPrI:{}", input_index(input)?),
            Command::SetProgram(input) => format!("SPmI:{}", input_index(input)?),
            Command::StartStream => "StrStart".to_string(),
            Command::StopStream => "StrStop".to_string(),
            Command::StartRecord => "RecStart".to_string(),
            Command::StopRecord => "RecStop".to_string(),
            Command::PushGraphic(graphic) => format!("RGMOS:{}", graphic_index(graphic)?),
            Command::PullGraphic(graphic) => format!("RGMOH:{}", graphic_index(graphic)?),
            Command::PreviewShowGraphic(graphic) => format!("RGPvS:{}", graphic_index(graphic)?),
            Command::PreviewHideGraphic(graphic) => {
                format!("RGMPvH:{}", graphic_index(graphic)?)
            },
            Command::PlayMediaFull(input) => format!("RMFP:{}", input_index(input)?),
            Command::PlayMediaInOut(input) => format!("RMIOP:{}", input_index(input)?),
            Command::PauseMedia(input) => format!("RMPause:{}", input_index(input)?),
            Command::SetInputLevel { input, level } => {
                format!("SIVL:{}:{}", input_index(input)?, to_level_code(level)?)
            },
            Command::IncrementInputLevel { input, delta } => {
                format!("IVL:{}:{}", input_index(input)?, to_increment_code(delta)?)
            },
            Command::SetInputGain { input, gain } => {
                format!("SIGL:{}:{}", input_index(input)?, to_gain_code(gain)?)
            },
            Command::SetInputMute { input, mute } => {
                format!("IAM:{}:{}", input_index(input)?, bit(mute))
            },
            Command::SetInputSolo { input, solo } => {
                format!("IAH:{}:{}", input_index(input)?, bit(solo))
            },
            Command::SetInputProgramLock { input, locked } => {
                format!("IAP:{}:{}", input_index(input)?, bit(locked))
            },
            Command::SetStreamLevel(level) => format!("SSVL:{}", to_level_code(level)?),
            Command::IncrementStreamLevel(delta) => format!("SVL:{}", to_increment_code(delta)?),
            Command::SetStreamMute(mute) => format!("SM:{}", bit(mute)),
            Command::SetStreamSolo(solo) => format!("SH:{}", bit(solo)),
            Command::SetRecordLevel(level) => format!("SRVL:{}", to_level_code(level)?),
            Command::IncrementRecordLevel(delta) => format!("RVL:{}", to_increment_code(delta)?),
            Command::SetRecordMute(mute) => format!("RM:{}", bit(mute)),
            Command::SetRecordSolo(solo) => format!("RH:{}", bit(solo)),
        };
        Ok(line)
    }

    /// Build a command from an action name and loosely typed parameters.
    ///
    /// Action names are camelCase (`"setPreview"`, `"muteInput"`, ...).
    /// Index parameters must be whole numbers of at least 1; anything else,
    /// including a missing parameter, is an [`StudioError::InvalidArgument`].
    pub fn from_action(action: &str, params: &[Value]) -> Result<Self> {
        let command = match action {
            "cut" => Command::Cut,
            "auto" => Command::Auto,
            "setFadeToBlack" => Command::FadeToBlack(bool_param(params, 0, "fade to black")?),
            "fadeToBlack" => Command::FadeToBlack(true),
            "fadeFromBlack" => Command::FadeToBlack(false),
            "setPreview" => Command::SetPreview(number_param(params, 0, "input number")?),
            "setProgram" => Command::SetProgram(number_param(params, 0, "input number")?),
            "startStream" => Command::StartStream,
            "stopStream" => Command::StopStream,
            "startRecord" => Command::StartRecord,
            "stopRecord" => Command::StopRecord,
            "pushGraphic" => Command::PushGraphic(number_param(params, 0, "graphic number")?),
            "pullGraphic" => Command::PullGraphic(number_param(params, 0, "graphic number")?),
            "previewShowGraphic" => {
                Command::PreviewShowGraphic(number_param(params, 0, "graphic number")?)
            },
            "previewHideGraphic" => {
                Command::PreviewHideGraphic(number_param(params, 0, "graphic number")?)
            },
            "playMediaFull" => Command::PlayMediaFull(number_param(params, 0, "input number")?),
            "playMediaInOut" => Command::PlayMediaInOut(number_param(params, 0, "input number")?),
            "pauseMedia" => Command::PauseMedia(number_param(params, 0, "input number")?),
            "setInputLevel" => Command::SetInputLevel {
                input: number_param(params, 0, "input number")?,
                level: float_param(params, 1, "audio level")?,
            },
            "incrementInputLevel" => Command::IncrementInputLevel {
                input: number_param(params, 0, "input number")?,
                delta: float_param(params, 1, "increment")?,
            },
            "setInputGain" => Command::SetInputGain {
                input: number_param(params, 0, "input number")?,
                gain: float_param(params, 1, "gain")?,
            },
            "muteInput" | "unmuteInput" => Command::SetInputMute {
                input: number_param(params, 0, "input number")?,
                mute: action == "muteInput",
            },
            "soloInput" | "unsoloInput" => Command::SetInputSolo {
                input: number_param(params, 0, "input number")?,
                solo: action == "soloInput",
            },
            "lockInputProgram" | "unlockInputProgram" => Command::SetInputProgramLock {
                input: number_param(params, 0, "input number")?,
                locked: action == "lockInputProgram",
            },
            "setStreamLevel" => Command::SetStreamLevel(float_param(params, 0, "audio level")?),
            "incrementStreamLevel" => {
                Command::IncrementStreamLevel(float_param(params, 0, "increment")?)
            },
            "muteStream" => Command::SetStreamMute(true),
            "unmuteStream" => Command::SetStreamMute(false),
            "soloStream" => Command::SetStreamSolo(true),
            "unsoloStream" => Command::SetStreamSolo(false),
            "setRecordLevel" => Command::SetRecordLevel(float_param(params, 0, "audio level")?),
            "incrementRecordLevel" => {
                Command::IncrementRecordLevel(float_param(params, 0, "increment")?)
            },
            "muteRecord" => Command::SetRecordMute(true),
            "unmuteRecord" => Command::SetRecordMute(false),
            "soloRecord" => Command::SetRecordSolo(true),
            "unsoloRecord" => Command::SetRecordSolo(false),
            other => {
                return Err(StudioError::invalid(format!("unknown action '{}'", other)));
            },
        };
        Ok(command)
    }
}

fn input_index(number: u32) -> Result<u32> {
    device_index(number, "input number")
}

fn graphic_index(number: u32) -> Result<u32> {
    device_index(number, "graphic number")
}

/// 1-based external number to 0-based device index
fn device_index(number: u32, what: &str) -> Result<u32> {
    number
        .checked_sub(1)
        .ok_or_else(|| StudioError::invalid(format!("{} must be 1 or greater", what)))
}

fn bit(flag: bool) -> u8 {
    u8::from(flag)
}

fn number_param(params: &[Value], position: usize, what: &str) -> Result<u32> {
    let not_integer = || StudioError::invalid(format!("{} must be an integer", what));
    let value = params.get(position).ok_or_else(not_integer)?;

    if let Some(n) = value.as_u64() {
        return u32::try_from(n).map_err(|_| not_integer());
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        _ => Err(not_integer()),
    }
}

fn float_param(params: &[Value], position: usize, what: &str) -> Result<f64> {
    params
        .get(position)
        .and_then(Value::as_f64)
        .ok_or_else(|| StudioError::invalid(format!("{} must be a number", what)))
}

fn bool_param(params: &[Value], position: usize, what: &str) -> Result<bool> {
    params
        .get(position)
        .and_then(Value::as_bool)
        .ok_or_else(|| StudioError::invalid(format!("{} must be a boolean", what)))
}
