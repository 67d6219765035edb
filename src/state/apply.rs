//! Device state mutation contract
//!
//! [`DeviceState::apply`] maps one inbound packet type onto exactly the
//! fields it describes. Nothing else in the crate writes to the mirror.

use tracing::trace;

use super::fields::Fields;
use super::types::{
    BusAudio, DeviceState, Graphic, GraphicStatus, Input, InputAudio, MediaStatus, OutputStatus,
    TBarStatus,
};

/// Per-input audio field addressed by the `A?C` packet family
#[derive(Debug, Clone, Copy)]
enum InputAudioField {
    Level,
    Gain,
    ProgramLock,
    Mute,
    Solo,
}

/// Output bus addressed by the `S??`/`R??` packet families
#[derive(Debug, Clone, Copy)]
enum Bus {
    Stream,
    Record,
}

impl DeviceState {
    /// Apply one packet to the mirror.
    ///
    /// `fields` are the positional arguments after the type tag. Returns
    /// `false` when `packet_type` is not part of the protocol, in which case
    /// nothing was touched.
    pub fn apply(&mut self, packet_type: &str, fields: &[&str]) -> bool {
        let fields = Fields::new(fields);

        match packet_type {
            "ILCC" => {
                // the input list may have been reshuffled; nothing we knew still holds
                self.inputs.clear();
                self.input_count = fields.index(1);
            },
            "ILC" => self.apply_input_description(&fields),
            "PmIS" => self.program = fields.index(1),
            "PwIS" => self.preview = fields.index(1),

            "SVC" => self.bus_audio(Bus::Stream).level = Some(fields.thousandths(1)),
            "SMC" => self.bus_audio(Bus::Stream).mute = Some(fields.flag(1)),
            "SSC" => self.bus_audio(Bus::Stream).solo = Some(fields.flag(1)),
            "RVC" => self.bus_audio(Bus::Record).level = Some(fields.thousandths(1)),
            "RMC" => self.bus_audio(Bus::Record).mute = Some(fields.flag(1)),
            "RSC" => self.bus_audio(Bus::Record).solo = Some(fields.flag(1)),

            "AVC" => self.apply_input_audio(&fields, InputAudioField::Level),
            "AGC" => self.apply_input_audio(&fields, InputAudioField::Gain),
            "AOC" => self.apply_input_audio(&fields, InputAudioField::ProgramLock),
            "AMC" => self.apply_input_audio(&fields, InputAudioField::Mute),
            "ASC" => self.apply_input_audio(&fields, InputAudioField::Solo),

            "FIn" => self.fade_to_black = Some(false),
            "FOut" => self.fade_to_black = Some(true),

            "StrStopped" | "StrStarting" | "StrStarted" | "StrStopping" => {
                if let Some(status) = OutputStatus::from_suffix(&packet_type[3..]) {
                    self.stream.status = status;
                }
            },
            "RecStopped" | "RecStarting" | "RecStarted" | "RecStopping" => {
                if let Some(status) = OutputStatus::from_suffix(&packet_type[3..]) {
                    self.record.status = status;
                }
            },

            "GMOn" | "GMOff" => {
                let status = if packet_type == "GMOn" {
                    GraphicStatus::On
                } else {
                    GraphicStatus::Off
                };
                if let Some(graphic) = self.graphic(&fields) {
                    graphic.status = Some(status);
                }
            },
            "GMPvH" | "GMPvS" => {
                if let Some(graphic) = self.graphic(&fields) {
                    graphic.preview = Some(packet_type == "GMPvS");
                }
            },
            "GMOH" | "GMOS" => {
                if let Some(graphic) = self.graphic(&fields) {
                    graphic.pushed = Some(packet_type == "GMOS");
                }
            },
            "GPA" => {
                let can_push = fields.flag(2);
                if let Some(graphic) = self.graphic(&fields) {
                    graphic.can_push = Some(can_push);
                }
            },

            "MPause" | "MFP" | "MIOP" => {
                let status = match packet_type {
                    "MPause" => MediaStatus::Paused,
                    "MFP" => MediaStatus::PlayFull,
                    _ => MediaStatus::PlayInOut,
                };
                if let Some(input) = self.existing_input(&fields) {
                    input.media_status = Some(status);
                }
            },

            "TrAStart" => self.t_bar.status = Some(TBarStatus::Start),
            "TrAStop" => {
                self.t_bar.status = Some(TBarStatus::Stop);
                self.t_bar.percent = Some(0.0);
            },
            "TrASp" | "TrMSp" => {
                let percent = fields.int(1).map(|v| v as f64 / 10.0).unwrap_or(f64::NAN);
                self.t_bar.status = Some(if percent == 0.0 {
                    TBarStatus::Stop
                } else if packet_type == "TrASp" {
                    TBarStatus::Automatic
                } else {
                    TBarStatus::Manual
                });
                self.t_bar.percent = Some(percent);
            },

            // informational only
            "Cut" => {},

            _ => return false,
        }

        true
    }

    fn apply_input_description(&mut self, fields: &Fields<'_>) {
        let Some(index) = fields.index(1) else {
            trace!(field = ?fields.text(1), "ILC without a usable index");
            return;
        };

        let input = Input {
            number: index.saturating_add(1),
            name: fields.text(2).unwrap_or_default().replace('"', ""),
            input_type: fields.text(8).map(str::to_string),
            audio: InputAudio {
                level: fields.float_thousandths(3),
                gain: fields.float_thousandths(4),
                mute: fields.flag(5),
                solo: fields.flag(6),
                program_lock: fields.flag(7),
                program: None,
            },
            media_status: None,
        };
        self.inputs.insert(index, input);
    }

    fn apply_input_audio(&mut self, fields: &Fields<'_>, field: InputAudioField) {
        // updates for inputs we have not been told about are dropped
        let Some(input) = self.existing_input(fields) else {
            return;
        };
        let audio = &mut input.audio;

        match field {
            InputAudioField::Level => audio.level = fields.thousandths(2),
            InputAudioField::Gain => audio.gain = fields.thousandths(2),
            InputAudioField::ProgramLock => {
                audio.program = Some(fields.text(2) != Some("0"));
                audio.program_lock = fields.flag(2);
            },
            InputAudioField::Mute => audio.mute = fields.flag(2),
            InputAudioField::Solo => audio.solo = fields.flag(2),
        }
    }

    fn existing_input(&mut self, fields: &Fields<'_>) -> Option<&mut Input> {
        fields.index(1).and_then(|index| self.inputs.get_mut(&index))
    }

    fn graphic(&mut self, fields: &Fields<'_>) -> Option<&mut Graphic> {
        fields
            .index(1)
            .map(|index| self.graphics.entry(index).or_default())
    }

    fn bus_audio(&mut self, bus: Bus) -> &mut BusAudio {
        match bus {
            Bus::Stream => &mut self.stream.audio,
            Bus::Record => &mut self.record.audio,
        }
    }
}
