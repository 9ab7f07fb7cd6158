mod reader;
mod slots;

pub use reader::*;
pub use slots::PlayerSlots;

use gilrs::GamepadId;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ControllerInfo {
    pub name: String,
    pub has_force_feedback: bool,
    /// evdev node to open haptics from, when one could be found
    pub device_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    Connected {
        gamepad: GamepadId,
        info: ControllerInfo,
    },
    Disconnected {
        gamepad: GamepadId,
    },
}
