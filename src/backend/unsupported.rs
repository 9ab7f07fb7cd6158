use super::{HapticDevice, HapticSubsystem};
use crate::effect::EffectDefinition;
use std::convert::Infallible;
use std::path::PathBuf;

/// Placeholder for platforms without a haptics backend. `init` always fails
/// so hosts fall back to running without haptics.
#[derive(Debug, Default)]
pub struct UnsupportedSubsystem;

impl UnsupportedSubsystem {
    pub fn new() -> Self {
        Self
    }
}

impl HapticSubsystem for UnsupportedSubsystem {
    type Source = PathBuf;
    type Device = NoDevice;

    fn init(&mut self) -> anyhow::Result<()> {
        Err(anyhow::anyhow!(
            "No haptics backend for {}",
            std::env::consts::OS
        ))
    }

    fn open(&mut self, source: &PathBuf) -> anyhow::Result<NoDevice> {
        Err(anyhow::anyhow!(
            "Cannot open {}: no haptics backend",
            source.display()
        ))
    }
}

/// Uninhabited; no device can be opened without a backend
pub enum NoDevice {}

impl HapticDevice for NoDevice {
    type Effect = Infallible;

    fn name(&self) -> &str {
        match *self {}
    }

    fn new_effect(&mut self, _definition: &EffectDefinition) -> anyhow::Result<Infallible> {
        match *self {}
    }

    fn update_effect(
        &mut self,
        _effect: &mut Infallible,
        _definition: &EffectDefinition,
    ) -> anyhow::Result<()> {
        match *self {}
    }

    fn destroy_effect(&mut self, _effect: Infallible) {
        match *self {}
    }

    fn run_effect(&mut self, _effect: &mut Infallible, _iterations: u32) -> anyhow::Result<()> {
        match *self {}
    }

    fn stop_effect(&mut self, _effect: &mut Infallible) -> anyhow::Result<()> {
        match *self {}
    }

    fn pause(&mut self) -> anyhow::Result<()> {
        match *self {}
    }

    fn unpause(&mut self) -> anyhow::Result<()> {
        match *self {}
    }

    fn stop_all(&mut self) -> anyhow::Result<()> {
        match *self {}
    }

    fn close(self) {
        match self {}
    }
}
