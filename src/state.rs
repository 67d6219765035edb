//! Device state module - the mirrored model of the remote switcher
//!
//! The mirror starts empty and is only ever changed by packets received from
//! the device, one packet at a time, through [`DeviceState::apply`]. Commands
//! sent to the switcher never touch it directly.

mod apply;
mod fields;
mod types;

pub use types::{
    BusAudio, DeviceState, Graphic, GraphicStatus, Input, InputAudio, MediaStatus, OutputBus,
    OutputStatus, TBar, TBarStatus,
};
