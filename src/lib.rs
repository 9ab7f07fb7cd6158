//! Per-player force feedback for game controllers.
//!
//! [`HapticsRegistry`] keeps a catalog of up to [`MAX_EFFECTS`] effect
//! definitions and binds them to the haptic devices of up to four players as
//! controllers come and go. The platform API sits behind
//! [`backend::HapticSubsystem`].

pub mod backend;
pub mod config;
pub mod effect;
pub mod error;
pub mod player;
pub mod registry;
pub mod settings;

pub use effect::{EffectDefinition, Waveform, MAX_EFFECTS};
pub use error::HapticsError;
pub use player::{Gain, Player};
pub use registry::HapticsRegistry;
pub use settings::{ConfigReader, ConfigWriter};
