#[cfg(target_os = "linux")]
mod linux;
#[cfg(test)]
pub(crate) mod mock;
#[cfg(not(target_os = "linux"))]
mod unsupported;

#[cfg(target_os = "linux")]
pub use linux::{EvdevDevice, EvdevSubsystem as PlatformSubsystem};
#[cfg(not(target_os = "linux"))]
pub use unsupported::UnsupportedSubsystem as PlatformSubsystem;

use crate::effect::EffectDefinition;

/// Entry point to the platform haptics API
pub trait HapticSubsystem {
    /// What the host hands over to identify a physical device
    type Source;
    type Device: HapticDevice;

    /// Start the subsystem. Called once before any device is opened.
    fn init(&mut self) -> anyhow::Result<()>;

    fn open(&mut self, source: &Self::Source) -> anyhow::Result<Self::Device>;
}

/// An opened force feedback device
pub trait HapticDevice {
    /// Device-side instance of an uploaded effect
    type Effect;

    fn name(&self) -> &str;

    /// Upload an effect to the device
    fn new_effect(&mut self, definition: &EffectDefinition) -> anyhow::Result<Self::Effect>;

    /// Replace the parameters of an uploaded effect in place
    fn update_effect(
        &mut self,
        effect: &mut Self::Effect,
        definition: &EffectDefinition,
    ) -> anyhow::Result<()>;

    /// Erase an uploaded effect from the device
    fn destroy_effect(&mut self, effect: Self::Effect);

    fn run_effect(&mut self, effect: &mut Self::Effect, iterations: u32) -> anyhow::Result<()>;

    fn stop_effect(&mut self, effect: &mut Self::Effect) -> anyhow::Result<()>;

    fn pause(&mut self) -> anyhow::Result<()>;

    fn unpause(&mut self) -> anyhow::Result<()>;

    /// Stop every effect playing on the device
    fn stop_all(&mut self) -> anyhow::Result<()>;

    /// Release the device
    fn close(self);
}
