use super::{HapticDevice, HapticSubsystem};
use crate::effect::{EffectDefinition, Waveform};
use evdev::{
    Device, EventType, FFEffect, FFEffectCode, FFEffectData, FFEffectKind, FFEnvelope, FFReplay,
    FFTrigger, FFWaveform, InputEvent,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const INPUT_DIR: &str = "/dev/input";
const FULL_GAIN: i32 = 0xFFFF;

/// Linux force feedback through evdev event nodes
#[derive(Debug, Default)]
pub struct EvdevSubsystem {
    initialized: bool,
}

impl EvdevSubsystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HapticSubsystem for EvdevSubsystem {
    type Source = PathBuf;
    type Device = EvdevDevice;

    fn init(&mut self) -> anyhow::Result<()> {
        if !Path::new(INPUT_DIR).is_dir() {
            return Err(anyhow::anyhow!("{} is not available", INPUT_DIR));
        }
        self.initialized = true;
        Ok(())
    }

    fn open(&mut self, source: &PathBuf) -> anyhow::Result<EvdevDevice> {
        if !self.initialized {
            return Err(anyhow::anyhow!("Haptics subsystem not initialized"));
        }
        EvdevDevice::open(source)
    }
}

pub struct EvdevDevice {
    device: Device,
    name: String,
    uploaded: BTreeSet<u16>,
}

impl EvdevDevice {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let device = Device::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open device {}: {}", path.display(), e))?;

        let ff_types: Vec<_> = device
            .supported_ff()
            .map(|ff| ff.iter().collect())
            .unwrap_or_default();
        if ff_types.is_empty() {
            return Err(anyhow::anyhow!(
                "Device {} does not support force feedback",
                path.display()
            ));
        }
        log::debug!("Device supports {} FF effect types: {:?}", ff_types.len(), ff_types);

        let name = device.name().unwrap_or("Unknown").to_string();
        log::info!("Opened force feedback device: {} at {}", name, path.display());

        Ok(Self {
            device,
            name,
            uploaded: BTreeSet::new(),
        })
    }

    fn write_ff(&mut self, code: u16, value: i32) -> anyhow::Result<()> {
        let event = InputEvent::new(EventType::FORCEFEEDBACK.0, code, value);
        self.device
            .send_events(&[event])
            .map_err(|e| anyhow::anyhow!("Failed to write FF event to {}: {}", self.name, e))
    }
}

impl HapticDevice for EvdevDevice {
    type Effect = FFEffect;

    fn name(&self) -> &str {
        &self.name
    }

    fn new_effect(&mut self, definition: &EffectDefinition) -> anyhow::Result<FFEffect> {
        let effect = self
            .device
            .upload_ff_effect(effect_data(definition))
            .map_err(|e| anyhow::anyhow!("Failed to upload {} effect: {}", definition.kind_name(), e))?;
        log::debug!("Uploaded {} effect with ID: {}", definition.kind_name(), effect.id());
        self.uploaded.insert(effect.id());
        Ok(effect)
    }

    fn update_effect(
        &mut self,
        effect: &mut FFEffect,
        definition: &EffectDefinition,
    ) -> anyhow::Result<()> {
        effect
            .update(effect_data(definition))
            .map_err(|e| anyhow::anyhow!("Failed to update effect {}: {}", effect.id(), e))
    }

    fn destroy_effect(&mut self, effect: FFEffect) {
        self.uploaded.remove(&effect.id());
        // Effect is erased from the device when dropped
        drop(effect);
    }

    fn run_effect(&mut self, effect: &mut FFEffect, iterations: u32) -> anyhow::Result<()> {
        let count = i32::try_from(iterations).unwrap_or(i32::MAX);
        effect
            .play(count)
            .map_err(|e| anyhow::anyhow!("Failed to play effect {}: {}", effect.id(), e))
    }

    fn stop_effect(&mut self, effect: &mut FFEffect) -> anyhow::Result<()> {
        effect
            .stop()
            .map_err(|e| anyhow::anyhow!("Failed to stop effect {}: {}", effect.id(), e))
    }

    // The kernel has no pause request; muting the device gain is the closest equivalent.
    fn pause(&mut self) -> anyhow::Result<()> {
        self.write_ff(FFEffectCode::FF_GAIN.0, 0)
    }

    fn unpause(&mut self) -> anyhow::Result<()> {
        self.write_ff(FFEffectCode::FF_GAIN.0, FULL_GAIN)
    }

    fn stop_all(&mut self) -> anyhow::Result<()> {
        let ids: Vec<u16> = self.uploaded.iter().copied().collect();
        for id in ids {
            self.write_ff(id, 0)?;
        }
        Ok(())
    }

    fn close(mut self) {
        if let Err(e) = self.stop_all() {
            log::warn!("Failed to stop effects on {} before closing: {}", self.name, e);
        }
        log::info!("Closed force feedback device: {}", self.name);
    }
}

/// Convert polar hundredths of a degree (0 = north) into the kernel's
/// direction, where 0 points south and 0x4000 west.
fn kernel_direction(hundredths: u16) -> u16 {
    let degrees = (18000 + u32::from(hundredths)) % 36000;
    (degrees * 0x8000 / 18000) as u16
}

fn effect_data(definition: &EffectDefinition) -> FFEffectData {
    match *definition {
        EffectDefinition::Periodic {
            waveform,
            direction,
            period,
            magnitude,
            length,
            attack_length,
            attack_level,
            fade_length,
            fade_level,
        } => FFEffectData {
            direction: kernel_direction(direction),
            trigger: FFTrigger::default(),
            replay: FFReplay { length, delay: 0 },
            kind: FFEffectKind::Periodic {
                waveform: match waveform {
                    Waveform::Sine => FFWaveform::Sine,
                    Waveform::Triangle => FFWaveform::Triangle,
                },
                period,
                magnitude,
                offset: 0,
                phase: 0,
                envelope: FFEnvelope {
                    attack_length,
                    attack_level,
                    fade_length,
                    fade_level,
                },
            },
        },
        EffectDefinition::LeftRight {
            length,
            large_magnitude,
            small_magnitude,
        } => FFEffectData {
            direction: 0,
            trigger: FFTrigger::default(),
            replay: FFReplay { length, delay: 0 },
            kind: FFEffectKind::Rumble {
                strong_magnitude: large_magnitude,
                weak_magnitude: small_magnitude,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{effect_data, kernel_direction};
    use crate::effect::presets;
    use evdev::{FFEffectKind, FFWaveform};

    #[test]
    fn direction_works() {
        let tests = [(0, 0x8000), (9000, 0xC000), (18000, 0), (27000, 0x4000)];

        for (polar, expected) in tests.into_iter() {
            let mapped = kernel_direction(polar);
            assert_eq!(
                mapped, expected,
                "expected f({polar}) = {expected:#x}, was {mapped:#x}",
            );
        }
    }

    #[test]
    fn periodic_maps_envelope() {
        let data = effect_data(&presets::EXPLODE);
        assert_eq!(data.replay.length, 600);

        match data.kind {
            FFEffectKind::Periodic {
                waveform,
                period,
                magnitude,
                envelope,
                ..
            } => {
                assert!(matches!(waveform, FFWaveform::Sine));
                assert_eq!(period, 80);
                assert_eq!(magnitude, 20000);
                assert_eq!(envelope.fade_length, 550);
                assert_eq!(envelope.attack_length, 0);
            }
            _ => panic!("explode should map to a periodic effect"),
        }
    }

    #[test]
    fn left_right_maps_to_rumble() {
        let data = effect_data(&presets::LEFTRIGHT2);
        assert_eq!(data.replay.length, 700);

        match data.kind {
            FFEffectKind::Rumble {
                strong_magnitude,
                weak_magnitude,
            } => {
                assert_eq!(strong_magnitude, 0);
                assert_eq!(weak_magnitude, 32767);
            }
            _ => panic!("left/right should map to a rumble effect"),
        }
    }
}
