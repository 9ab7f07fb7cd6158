use super::{ControllerEvent, ControllerInfo};
use gilrs::{EventType, Gamepad, Gilrs};
use std::path::PathBuf;

/// Watches gilrs for controllers coming and going
pub struct InputReader {
    gilrs: Gilrs,
    #[cfg(target_os = "linux")]
    udev: libudev::Context,
}

impl InputReader {
    pub fn new() -> anyhow::Result<Self> {
        let gilrs = Gilrs::new().map_err(|e| anyhow::anyhow!("Failed to initialize gilrs: {}", e))?;

        Ok(Self {
            gilrs,
            #[cfg(target_os = "linux")]
            udev: libudev::Context::new()?,
        })
    }

    /// Connected events for every controller already present
    pub fn connected(&self) -> Vec<ControllerEvent> {
        self.gilrs
            .gamepads()
            .map(|(gamepad, pad)| ControllerEvent::Connected {
                gamepad,
                info: self.describe(&pad),
            })
            .collect()
    }

    pub fn poll(&mut self) -> Vec<ControllerEvent> {
        let mut events = Vec::new();

        while let Some(event) = self.gilrs.next_event() {
            match event.event {
                EventType::Connected => {
                    let info = self.describe(&self.gilrs.gamepad(event.id));
                    events.push(ControllerEvent::Connected {
                        gamepad: event.id,
                        info,
                    });
                }
                EventType::Disconnected => {
                    events.push(ControllerEvent::Disconnected { gamepad: event.id });
                }
                _ => {}
            }
        }

        events
    }

    fn describe(&self, gamepad: &Gamepad) -> ControllerInfo {
        let info = ControllerInfo {
            name: gamepad.name().to_string(),
            has_force_feedback: gamepad.is_ff_supported(),
            device_path: self.find_device_path(gamepad),
        };

        log::info!(
            "Found controller: {} ({:?}) - FF: {}",
            info.name,
            gamepad.id(),
            info.has_force_feedback
        );

        info
    }

    #[cfg(target_os = "linux")]
    fn find_device_path(&self, gamepad: &Gamepad) -> Option<PathBuf> {
        log::debug!(
            "Searching for device path for: {} (Vendor: {:?}, Product: {:?})",
            gamepad.name(),
            gamepad.vendor_id(),
            gamepad.product_id()
        );
        let mut enumerator = libudev::Enumerator::new(&self.udev).ok()?;
        enumerator.match_subsystem("input").ok()?;

        for device in enumerator.scan_devices().ok()? {
            let vendor_id = device
                .property_value("ID_VENDOR_ID")
                .and_then(|s| s.to_str())
                .and_then(|s| u16::from_str_radix(s, 16).ok());

            let product_id = device
                .property_value("ID_PRODUCT_ID")
                .or(device.property_value("ID_MODEL_ID"))
                .and_then(|s| s.to_str())
                .and_then(|s| u16::from_str_radix(s, 16).ok());

            if vendor_id == gamepad.vendor_id() && product_id == gamepad.product_id() {
                if let Some(devnode) = device.devnode() {
                    if devnode.to_string_lossy().contains("event") {
                        log::debug!("Matched {} to {}", gamepad.name(), devnode.display());
                        return Some(devnode.to_path_buf());
                    }
                }
            }
        }

        log::warn!("Device path not found for: {}", gamepad.name());
        None
    }

    #[cfg(not(target_os = "linux"))]
    fn find_device_path(&self, _gamepad: &Gamepad) -> Option<PathBuf> {
        None
    }
}
